use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid card identifier '{identifier}': rank {rank} is outside 1..=13")]
    InvalidRank { identifier: String, rank: u32 },
    #[error("Card set must contain exactly {expected} cards, found {found}")]
    WrongCardCount { expected: usize, found: usize },
    #[error("Duplicate card identifier '{0}'")]
    DuplicateIdentifier(String),
    #[error("Rank {rank} appears {count} times (expected 4)")]
    UnbalancedRank { rank: u8, count: usize },
    #[error("Pile index {0} is out of range (0..=12)")]
    InvalidPileIndex(usize),
}
