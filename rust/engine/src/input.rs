use serde::{Deserialize, Serialize};

use crate::layout::Point;

/// Keys the game reacts to; everything else arrives as [`Key::Other`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    Other,
}

/// Abstract input produced by the platform layer, in table coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown(Point),
    PointerUp(Point),
    PointerMove(Point),
    Key(Key),
    /// A character typed into the question prompt
    Text(char),
}
