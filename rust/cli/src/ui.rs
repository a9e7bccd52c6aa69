//! UI helper functions for terminal output formatting.
//!
//! This module provides utility functions for consistent user interface output
//! across CLI commands: error messages, warnings and the pile listing.

use std::io::Write;

use clockpatience_engine::cards::{CardId, CardSet, PileIndex};
use clockpatience_engine::rules::Table;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Clock position label: `1`..`12` around the face, `C` for the center.
pub fn pile_label(pile: PileIndex) -> String {
    if pile == PileIndex::CENTER {
        "C".to_string()
    } else {
        (pile.get() + 1).to_string()
    }
}

/// One card as shown in listings; revealed cards are marked with `*`.
pub fn card_label(cards: &CardSet, table: &Table, card: CardId) -> String {
    if table.is_revealed(card) {
        format!("{}*", cards.name(card))
    } else {
        cards.name(card).to_string()
    }
}

/// Writes every pile, bottom card first, with `>` on the pile in play.
pub fn write_piles(out: &mut dyn Write, cards: &CardSet, table: &Table) -> std::io::Result<()> {
    for pile in PileIndex::all() {
        let marker = if pile == table.pointer() { '>' } else { ' ' };
        let listed: Vec<String> = table
            .pile(pile)
            .iter()
            .map(|&c| card_label(cards, table, c))
            .collect();
        writeln!(out, "{}{:>2}: {}", marker, pile_label(pile), listed.join(" "))?;
    }
    Ok(())
}
