use serde::{Deserialize, Serialize};

use crate::cards::{CardId, PileIndex};
use crate::layout::Button;

/// Fire-and-forget notifications for the sound and visual layers.
///
/// The session queues these as it runs; callers drain them with
/// [`crate::game::Session::take_feedback`]. Dropping them unread changes nothing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Feedback {
    ButtonClicked(Button),
    /// A card was picked up for dragging
    CardPicked(CardId),
    /// A card landed on a pile during the deal
    CardDealt { card: CardId, pile: PileIndex },
    /// A card was revealed or moved by a legal play
    PlayedCard(CardId),
    RejectedMove,
    ShuffleStarted,
    ShuffleStopped,
    RoundWon,
    RoundLost,
}
