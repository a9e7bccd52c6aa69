//! Frame-time bookkeeping for step-based animations.
//!
//! An animation is a finite list of step durations. Its state is the index of
//! the running step and the fraction of that step already shown. [`advance`]
//! is a pure function of `(state, elapsed)`, so the logical outcome of a
//! shuffle or deal never waits on it.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct AnimationState {
    /// Index of the step currently playing; equals the step count once done
    pub step: usize,
    /// Fraction of the current step shown, in `[0, 1)`
    pub progress: f32,
}

impl AnimationState {
    pub fn is_done(&self, durations: &[Duration]) -> bool {
        self.step >= durations.len()
    }
}

/// Moves `state` forward by `elapsed`, carrying leftover time into the
/// following steps. Returns the new state and whether every step has finished.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use clockpatience_engine::animation::{advance, AnimationState};
///
/// let steps = [Duration::from_millis(100), Duration::from_millis(100)];
/// let (state, done) = advance(AnimationState::default(), Duration::from_millis(150), &steps);
/// assert_eq!(state.step, 1);
/// assert!((state.progress - 0.5).abs() < 1e-6);
/// assert!(!done);
///
/// let (_, done) = advance(state, Duration::from_millis(50), &steps);
/// assert!(done);
/// ```
pub fn advance(
    state: AnimationState,
    elapsed: Duration,
    durations: &[Duration],
) -> (AnimationState, bool) {
    let mut remaining = elapsed.as_secs_f64();
    let mut step = state.step;
    let mut progress = f64::from(state.progress);

    while step < durations.len() {
        let length = durations[step].as_secs_f64();
        if length <= 0.0 {
            step += 1;
            progress = 0.0;
            continue;
        }
        let needed = (1.0 - progress) * length;
        if remaining >= needed {
            remaining -= needed;
            step += 1;
            progress = 0.0;
        } else {
            progress += remaining / length;
            break;
        }
    }

    let done = step >= durations.len();
    (
        AnimationState {
            step,
            progress: progress as f32,
        },
        done,
    )
}
