use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the automatic mode plays each card.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoStrategy {
    /// Reveal the current pile's top card and follow its rank
    #[default]
    Reveal,
    /// Move the current pile's highest unrevealed card onto its target pile
    Move,
}

impl AutoStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoStrategy::Reveal => "reveal",
            AutoStrategy::Move => "move",
        }
    }
}

impl fmt::Display for AutoStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reveal" => Ok(AutoStrategy::Reveal),
            "move" => Ok(AutoStrategy::Move),
            other => Err(format!("unknown auto strategy '{}'", other)),
        }
    }
}

/// Timing and behaviour knobs of a session. All durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between automatic plays
    pub auto_interval_ms: u64,
    /// Deck slides to the middle of the table before splitting
    pub shuffle_gather_ms: u64,
    /// Deck splits into two halves
    pub shuffle_split_ms: u64,
    /// Per card of every riffle run
    pub riffle_card_ms: u64,
    /// Per card flying from the deck to its pile
    pub deal_card_ms: u64,
    pub auto_strategy: AutoStrategy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_interval_ms: 2_500,
            shuffle_gather_ms: 500,
            shuffle_split_ms: 500,
            riffle_card_ms: 100,
            deal_card_ms: 100,
            auto_strategy: AutoStrategy::Reveal,
        }
    }
}

impl SessionConfig {
    pub fn auto_interval(&self) -> Duration {
        Duration::from_millis(self.auto_interval_ms)
    }

    pub fn shuffle_gather(&self) -> Duration {
        Duration::from_millis(self.shuffle_gather_ms)
    }

    pub fn shuffle_split(&self) -> Duration {
        Duration::from_millis(self.shuffle_split_ms)
    }

    pub fn riffle_card(&self) -> Duration {
        Duration::from_millis(self.riffle_card_ms)
    }

    pub fn deal_card(&self) -> Duration {
        Duration::from_millis(self.deal_card_ms)
    }
}
