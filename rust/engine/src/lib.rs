//! # clockpatience-engine: Clock Patience Game Core
//!
//! A deterministic engine for the Clock Patience solitaire played as a
//! yes/no fortune: 52 cards are riffled, dealt onto thirteen piles arranged
//! like a clock face, and played from the center pile following each card's
//! rank. Rendering, sound and input devices live outside this crate; the
//! engine consumes abstract input events and frame time and exposes
//! snapshots and feedback notifications.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card identifiers, rank parsing, pile indices and the validated card set
//! - [`deck`] - Seeded deck with base permutation and riffle planning (ChaCha20 RNG)
//! - [`animation`] - Pure step-timeline advancement shared by shuffle and deal
//! - [`shuffle`] - Shuffle request handling and its Gather/Split/Merge animation
//! - [`deal`] - Deal plan and the card-by-card deal animation
//! - [`rules`] - The clock-patience rule engine: reveals, moves, win and loss
//! - [`autoplay`] - Timer-driven controller for the automatic mode
//! - [`game`] - The `Session` state machine tying everything together
//! - [`layout`] - Table geometry for hit-testing piles and buttons
//! - [`input`] / [`feedback`] - Events in, notifications out
//! - [`config`] - Session timing and auto-play strategy
//! - [`logger`] - Round history as JSON lines
//! - [`errors`] - Error types for card-set loading
//!
//! ## Quick Start
//!
//! ```rust
//! use clockpatience_engine::cards::{rank_of, target_pile_index, Rank};
//!
//! assert_eq!(rank_of("10H"), 10);
//! assert_eq!(rank_of("QH"), 12);
//!
//! // Kings go back to the center pile
//! assert_eq!(target_pile_index(Rank::KING).get(), 12);
//! assert_eq!(target_pile_index(Rank::ACE).get(), 0);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Every shuffle is reproducible from the session seed:
//!
//! ```rust
//! use clockpatience_engine::cards::CardSet;
//! use clockpatience_engine::deck::Deck;
//!
//! let set = CardSet::standard();
//! let mut a = Deck::new_with_seed(42, &set);
//! let mut b = Deck::new_with_seed(42, &set);
//! a.pre_shuffle();
//! b.pre_shuffle();
//! assert_eq!(a.riffle_plan(), b.riffle_plan());
//! ```

pub mod animation;
pub mod autoplay;
pub mod cards;
pub mod config;
pub mod deal;
pub mod deck;
pub mod errors;
pub mod feedback;
pub mod game;
pub mod input;
pub mod layout;
pub mod logger;
pub mod rules;
pub mod shuffle;
