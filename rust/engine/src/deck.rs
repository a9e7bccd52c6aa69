use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardSet};

/// Largest run of cards dropped from one half in a single riffle step.
pub const MAX_RIFFLE_RUN: usize = 3;

/// The undealt cards of a round, front first, plus the seeded RNG that orders them.
///
/// # Examples
///
/// ```
/// use clockpatience_engine::cards::CardSet;
/// use clockpatience_engine::deck::Deck;
///
/// let set = CardSet::standard();
/// let mut deck = Deck::new_with_seed(42, &set);
/// deck.pre_shuffle();
/// let plan = deck.riffle_plan();
/// deck.set_order(plan.final_order());
/// assert_eq!(deck.remaining(), 52);
/// ```
#[derive(Debug)]
pub struct Deck {
    /// Card order; index 0 is dealt first
    cards: Vec<CardId>,
    rng: ChaCha20Rng,
    /// Set once the base permutation has been applied for the current round
    base_shuffled: bool,
}

impl Deck {
    pub fn new_with_seed(seed: u64, set: &CardSet) -> Self {
        // Keep load order until a shuffle is requested
        Self {
            cards: set.ids().collect(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            base_shuffled: false,
        }
    }

    /// Applies the one-off uniform permutation for this round.
    ///
    /// Returns `false` without touching the order when the base shuffle already
    /// happened since the last [`Deck::reset`].
    pub fn pre_shuffle(&mut self) -> bool {
        if self.base_shuffled {
            return false;
        }
        self.cards.shuffle(&mut self.rng);
        self.base_shuffled = true;
        true
    }

    /// Draws a riffle of the current order. The deck itself is left untouched;
    /// callers install [`RifflePlan::final_order`] once the shuffle completes.
    pub fn riffle_plan(&mut self) -> RifflePlan {
        riffle(&self.cards, &mut self.rng)
    }

    pub fn set_order(&mut self, order: Vec<CardId>) {
        self.cards = order;
    }

    pub fn is_base_shuffled(&self) -> bool {
        self.base_shuffled
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn take_front(&mut self) -> Option<CardId> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Reloads every card of the set in load order and clears the base-shuffle
    /// guard. The RNG keeps its stream so consecutive rounds differ.
    pub fn reset(&mut self, set: &CardSet) {
        self.cards = set.ids().collect();
        self.base_shuffled = false;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Which half of the split deck a riffle run came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A packet of consecutive cards dropped from one half.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RiffleRun {
    pub side: Side,
    pub cards: Vec<CardId>,
}

/// Complete timeline of a simulated riffle. Each run is one animation step and
/// the concatenation of all runs is the new deck order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RifflePlan {
    runs: Vec<RiffleRun>,
}

impl RifflePlan {
    pub fn runs(&self) -> &[RiffleRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn final_order(&self) -> Vec<CardId> {
        self.runs
            .iter()
            .flat_map(|run| run.cards.iter().copied())
            .collect()
    }
}

/// Splits `cards` at the midpoint and interleaves the halves in random runs of
/// 1..=3 cards, left half first in every round.
pub fn riffle<R: Rng>(cards: &[CardId], rng: &mut R) -> RifflePlan {
    let (left, right) = cards.split_at(cards.len() / 2);
    let mut left = left;
    let mut right = right;
    let mut runs = Vec::new();
    while !left.is_empty() || !right.is_empty() {
        if !left.is_empty() {
            let n = rng.random_range(1..=MAX_RIFFLE_RUN.min(left.len()));
            let (run, rest) = left.split_at(n);
            runs.push(RiffleRun {
                side: Side::Left,
                cards: run.to_vec(),
            });
            left = rest;
        }
        if !right.is_empty() {
            let n = rng.random_range(1..=MAX_RIFFLE_RUN.min(right.len()));
            let (run, rest) = right.split_at(n);
            runs.push(RiffleRun {
                side: Side::Right,
                cards: run.to_vec(),
            });
            right = rest;
        }
    }
    RifflePlan { runs }
}
