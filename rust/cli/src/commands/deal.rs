//! Deal command handler.
//!
//! Shuffles a fresh deck with the given seed, deals it onto the clock face and
//! prints the thirteen piles, bottom card first. The pile in play at the start
//! of a round (the center) is marked with `>`.

use clockpatience_engine::cards::CardSet;
use clockpatience_engine::config::SessionConfig;
use clockpatience_engine::game::{ModeChoice, Session};
use std::io::Write;

use crate::config::Config;
use crate::error::CliError;
use crate::ui;

/// Handle the deal command.
///
/// # Examples
///
/// ```ignore
/// // Internal command handler - not part of public API
/// let mut out = Vec::new();
/// handle_deal_command(Some(42), &Config::default(), &mut out).unwrap();
/// ```
pub fn handle_deal_command(
    seed: Option<u64>,
    config: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let seed = config.resolve_seed(seed);
    let mut session = Session::new(CardSet::standard(), seed, SessionConfig::default());
    session.choose(ModeChoice::Manual);
    if !session.request_shuffle() {
        return Err(CliError::Engine("shuffle refused".into()));
    }
    session.finish_animations();
    if !session.request_deal() {
        return Err(CliError::Engine("deal refused".into()));
    }
    session.finish_animations();

    writeln!(out, "Seed: {}", seed)?;
    ui::write_piles(out, session.cards(), session.table())?;
    Ok(())
}
