//! Table geometry used to turn pointer positions into piles and buttons.
//!
//! Coordinates are in logical pixels of a 1200x800 table. The renderer is free
//! to scale; input must be given in the same logical space.

use serde::{Deserialize, Serialize};

use crate::cards::{PileIndex, PILE_COUNT};

pub const TABLE_WIDTH: f32 = 1200.0;
pub const TABLE_HEIGHT: f32 = 800.0;
pub const CARD_WIDTH: f32 = 100.0;
pub const CARD_HEIGHT: f32 = 150.0;

const BUTTON_WIDTH: f32 = 120.0;
const BUTTON_HEIGHT: f32 = 40.0;

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Clickable controls on the menu and the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Button {
    Automatic,
    Manual,
    Instructions,
    Shuffle,
    Deal,
    Play,
    Restart,
}

const MID_X: f32 = TABLE_WIDTH / 2.0;

/// Top-left corner of every pile: twelve around the clock, then the center.
const PILE_ORIGINS: [(f32, f32); PILE_COUNT] = [
    (MID_X - 350.0, 80.0),
    (MID_X - 150.0, 80.0),
    (MID_X + 50.0, 80.0),
    (MID_X + 250.0, 80.0),
    (MID_X + 250.0, 240.0),
    (MID_X + 250.0, 400.0),
    (MID_X + 250.0, 560.0),
    (MID_X + 50.0, 560.0),
    (MID_X - 150.0, 560.0),
    (MID_X - 350.0, 560.0),
    (MID_X - 350.0, 400.0),
    (MID_X - 350.0, 240.0),
    (MID_X - 40.0, 325.0),
];

/// Where the undealt deck rests.
pub const DECK_ORIGIN: Point = Point {
    x: 50.0,
    y: TABLE_HEIGHT / 2.0 - CARD_HEIGHT / 2.0,
};

pub fn pile_rect(pile: PileIndex) -> Rect {
    let (x, y) = PILE_ORIGINS[pile.get()];
    Rect::new(x, y, CARD_WIDTH, CARD_HEIGHT)
}

/// Pile whose card-sized slot contains `p`.
pub fn pile_at(p: Point) -> Option<PileIndex> {
    PileIndex::all().find(|&pile| pile_rect(pile).contains(p))
}

pub fn button_rect(button: Button) -> Rect {
    // menu row: Automatic and Manual side by side, Instructions beneath
    const MENU_Y: f32 = TABLE_HEIGHT / 2.0 + 40.0;
    const MENU_LEFT: f32 = MID_X - (240.0 + 200.0 + 40.0) / 2.0;
    let side_x = TABLE_WIDTH - 150.0;
    match button {
        Button::Automatic => Rect::new(MENU_LEFT, MENU_Y, 240.0, 60.0),
        Button::Manual => Rect::new(MENU_LEFT + 240.0 + 40.0, MENU_Y, 200.0, 60.0),
        Button::Instructions => Rect::new(MID_X - 100.0, MENU_Y + 100.0, 200.0, 50.0),
        Button::Shuffle => Rect::new(side_x, 100.0, BUTTON_WIDTH, BUTTON_HEIGHT),
        Button::Deal => Rect::new(side_x, 200.0, BUTTON_WIDTH, BUTTON_HEIGHT),
        Button::Play => Rect::new(side_x, 300.0, BUTTON_WIDTH, BUTTON_HEIGHT),
        Button::Restart => Rect::new(side_x, 400.0, BUTTON_WIDTH, BUTTON_HEIGHT),
    }
}

/// The restart button once the answer panel is shown, centered under it.
pub fn result_restart_rect() -> Rect {
    const PANEL_HEIGHT: f32 = 300.0;
    let top = TABLE_HEIGHT / 2.0 - PANEL_HEIGHT / 2.0 + PANEL_HEIGHT + 20.0;
    Rect::new(MID_X - BUTTON_WIDTH / 2.0, top, BUTTON_WIDTH, BUTTON_HEIGHT)
}

/// First of `buttons` under `p`.
pub fn button_at(p: Point, buttons: &[Button]) -> Option<Button> {
    buttons
        .iter()
        .copied()
        .find(|&b| button_rect(b).contains(p))
}
