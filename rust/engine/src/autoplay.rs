use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the automatic mode is in its shuffle, deal and play sequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AutoPhase {
    /// Waiting for the player to submit a question
    AwaitingQuestion,
    Shuffling,
    /// About to start the deal
    Dealing,
    /// Deal animation running
    AwaitingDeal,
    Playing,
    None,
}

/// What the session reports to the controller on each tick.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct AutoStatus {
    pub shuffle_pending: bool,
    pub deal_active: bool,
}

/// Operation the controller asks the session to perform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AutoAction {
    Shuffle,
    Deal,
    StartRound,
    Play,
}

/// Timer-driven sequencer for the automatic mode.
///
/// The controller owns no game state. Each tick it looks at its phase, the
/// session clock and an [`AutoStatus`], and returns at most one action.
#[derive(Debug, Clone)]
pub struct AutoPlay {
    phase: AutoPhase,
    shuffle_triggered: bool,
    last_action: Duration,
    interval: Duration,
}

impl AutoPlay {
    pub fn new(interval: Duration) -> Self {
        Self {
            phase: AutoPhase::None,
            shuffle_triggered: false,
            last_action: Duration::ZERO,
            interval,
        }
    }

    /// Arms the controller for a fresh automatic round.
    pub fn begin(&mut self, now: Duration) {
        self.phase = AutoPhase::AwaitingQuestion;
        self.shuffle_triggered = false;
        self.last_action = now;
    }

    /// Clears every transient field; the controller goes idle.
    pub fn clear(&mut self) {
        self.phase = AutoPhase::None;
        self.shuffle_triggered = false;
        self.last_action = Duration::ZERO;
    }

    /// The question was submitted; move on to shuffling.
    pub fn question_submitted(&mut self) -> bool {
        if self.phase != AutoPhase::AwaitingQuestion {
            return false;
        }
        self.phase = AutoPhase::Shuffling;
        true
    }

    /// The round ended; stop playing.
    pub fn round_over(&mut self) {
        self.phase = AutoPhase::None;
    }

    pub fn step(&mut self, now: Duration, status: AutoStatus) -> Option<AutoAction> {
        match self.phase {
            AutoPhase::AwaitingQuestion | AutoPhase::None => None,
            AutoPhase::Shuffling => {
                if !self.shuffle_triggered {
                    self.shuffle_triggered = true;
                    Some(AutoAction::Shuffle)
                } else {
                    if !status.shuffle_pending {
                        self.phase = AutoPhase::Dealing;
                        self.last_action = now;
                    }
                    None
                }
            }
            AutoPhase::Dealing => {
                if status.shuffle_pending || status.deal_active {
                    return None;
                }
                self.phase = AutoPhase::AwaitingDeal;
                self.last_action = now;
                Some(AutoAction::Deal)
            }
            AutoPhase::AwaitingDeal => {
                if status.deal_active {
                    return None;
                }
                self.phase = AutoPhase::Playing;
                self.last_action = now;
                Some(AutoAction::StartRound)
            }
            AutoPhase::Playing => {
                if now.saturating_sub(self.last_action) >= self.interval {
                    self.last_action = now;
                    Some(AutoAction::Play)
                } else {
                    None
                }
            }
        }
    }

    pub fn phase(&self) -> AutoPhase {
        self.phase
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Session time of the last automatic action.
    pub fn last_action(&self) -> Duration {
        self.last_action
    }
}
