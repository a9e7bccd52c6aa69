//! Shuffle command handler.
//!
//! Runs one shuffle on a fresh deck and prints the riffle as the animation
//! would play it: one line per run, `L` or `R` for the half it drops from,
//! followed by the resulting deck order.

use clockpatience_engine::cards::CardSet;
use clockpatience_engine::config::SessionConfig;
use clockpatience_engine::deck::{Deck, Side};
use clockpatience_engine::shuffle::ShuffleEngine;
use std::io::Write;

use crate::config::Config;
use crate::error::CliError;

pub fn handle_shuffle_command(
    seed: Option<u64>,
    config: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let seed = config.resolve_seed(seed);
    let cards = CardSet::standard();
    let mut deck = Deck::new_with_seed(seed, &cards);
    let mut engine = ShuffleEngine::new();
    engine.request(&mut deck, &SessionConfig::default());
    let plan = engine
        .plan()
        .cloned()
        .ok_or_else(|| CliError::Engine("shuffle did not start".into()))?;
    engine.finish(&mut deck);

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Runs: {}", plan.len())?;
    for run in plan.runs() {
        let side = match run.side {
            Side::Left => 'L',
            Side::Right => 'R',
        };
        let names: Vec<&str> = run.cards.iter().map(|&c| cards.name(c)).collect();
        writeln!(out, "{} {}", side, names.join(" "))?;
    }
    let order: Vec<&str> = deck.cards().iter().map(|&c| cards.name(c)).collect();
    writeln!(out, "Order: {}", order.join(" "))?;
    Ok(())
}
