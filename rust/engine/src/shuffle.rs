use std::time::Duration;

use serde::Serialize;

use crate::animation::{advance, AnimationState};
use crate::config::SessionConfig;
use crate::deck::{Deck, RifflePlan};

/// Visible phase of a running shuffle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum ShuffleStage {
    /// Deck slides to the middle of the table
    Gather,
    /// Deck splits into its two halves
    Split,
    /// Riffle run `run` is dropping onto the merged pile
    Merge { run: usize },
}

#[derive(Debug)]
struct PendingShuffle {
    plan: RifflePlan,
    durations: Vec<Duration>,
    anim: AnimationState,
}

/// Drives one shuffle at a time: pre-shuffle, riffle plan, then the animation
/// that ends with the riffle order installed in the deck.
#[derive(Debug)]
pub struct ShuffleEngine {
    pending: Option<PendingShuffle>,
    enabled: bool,
}

impl Default for ShuffleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ShuffleEngine {
    pub fn new() -> Self {
        Self {
            pending: None,
            enabled: true,
        }
    }

    /// Starts a shuffle of `deck`. Returns `false` and does nothing while a
    /// shuffle is already running or shuffling is disabled.
    pub fn request(&mut self, deck: &mut Deck, config: &SessionConfig) -> bool {
        if self.pending.is_some() || !self.enabled {
            return false;
        }
        let base = deck.pre_shuffle();
        let plan = deck.riffle_plan();

        let mut durations = Vec::with_capacity(plan.len() + 2);
        durations.push(config.shuffle_gather());
        durations.push(config.shuffle_split());
        durations.extend(
            plan.runs()
                .iter()
                .map(|run| config.riffle_card() * run.cards.len() as u32),
        );

        tracing::debug!(
            runs = plan.len(),
            base_shuffle = base,
            "shuffle started"
        );
        self.pending = Some(PendingShuffle {
            plan,
            durations,
            anim: AnimationState::default(),
        });
        true
    }

    /// Advances the animation. Returns `true` on the tick the shuffle completes,
    /// at which point the deck holds the riffle order.
    pub fn tick(&mut self, deck: &mut Deck, elapsed: Duration) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let (anim, done) = advance(pending.anim, elapsed, &pending.durations);
        pending.anim = anim;
        if done {
            self.finish(deck)
        } else {
            false
        }
    }

    /// Completes the running shuffle immediately. Returns `false` when nothing
    /// was running.
    pub fn finish(&mut self, deck: &mut Deck) -> bool {
        match self.pending.take() {
            Some(pending) => {
                deck.set_order(pending.plan.final_order());
                tracing::debug!("shuffle finished");
                true
            }
            None => false,
        }
    }

    /// Drops a running shuffle without touching the deck.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn plan(&self) -> Option<&RifflePlan> {
        self.pending.as_ref().map(|p| &p.plan)
    }

    /// Current stage and its progress in `[0, 1)`, if a shuffle is running.
    pub fn stage(&self) -> Option<(ShuffleStage, f32)> {
        let pending = self.pending.as_ref()?;
        let stage = match pending.anim.step {
            0 => ShuffleStage::Gather,
            1 => ShuffleStage::Split,
            n => ShuffleStage::Merge { run: n - 2 },
        };
        Some((stage, pending.anim.progress))
    }
}
