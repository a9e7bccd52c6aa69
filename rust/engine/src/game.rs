use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::autoplay::{AutoAction, AutoPhase, AutoPlay, AutoStatus};
use crate::cards::{CardId, CardSet, PileIndex};
use crate::config::{AutoStrategy, SessionConfig};
use crate::deal::DealEngine;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::feedback::Feedback;
use crate::input::{InputEvent, Key};
use crate::layout::{self, Button, Point};
use crate::logger::{PlayRecord, RoundOutcome, RoundRecord};
use crate::rules::{MoveOutcome, RejectReason, RevealOutcome, RoundState, Table};
use crate::shuffle::{ShuffleEngine, ShuffleStage};

/// Top-level screen of the game. Exactly one is active.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameMode {
    Menu,
    Instructions,
    Manual,
    Automatic,
    Result,
}

/// Lines shown on the instructions screen.
pub const INSTRUCTIONS: [&str; 6] = [
    "CLOCK PATIENCE RULES:",
    "- The goal is to send every card to its matching pile.",
    "- In manual mode, drag the card onto the pile for its rank.",
    "- In automatic mode, the game plays itself.",
    "- You win if every card is placed without a mistake.",
    "- Press ESC to return to the main menu.",
];

/// Which table buttons currently respond to clicks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Controls {
    pub shuffle: bool,
    pub deal: bool,
    pub play: bool,
    pub restart: bool,
}

impl Controls {
    fn fresh_round() -> Self {
        Self {
            shuffle: true,
            deal: true,
            play: false,
            restart: true,
        }
    }
}

/// The free-text question a round answers.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct Prompt {
    /// The input box is showing and takes keystrokes
    pub open: bool,
    pub text: String,
    /// Question confirmed for the current round
    pub submitted: Option<String>,
}

/// A card being dragged in manual play. The card stays in its pile until the
/// drop succeeds.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DragState {
    pub card: CardId,
    pub origin: PileIndex,
    pub position: Point,
}

/// Final state of a finished round, kept while the result screen shows.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct RoundSummary {
    pub mode: GameMode,
    pub outcome: RoundOutcome,
    pub question: Option<String>,
    pub revealed: usize,
    pub plays: Vec<PlayRecord>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    /// Card identifiers per pile, bottom first
    pub piles: Vec<Vec<String>>,
    pub revealed: Vec<String>,
    pub pointer: PileIndex,
    pub round: RoundState,
    pub deck_remaining: usize,
    pub shuffle: Option<(ShuffleStage, f32)>,
    /// Card in flight during the deal, its destination and progress
    pub dealing: Option<(String, PileIndex, f32)>,
    pub controls: Controls,
    pub prompt: Prompt,
    pub drag: Option<DragState>,
    pub auto_phase: AutoPhase,
    pub result: Option<RoundSummary>,
}

/// One game session: mode, table, animations, automation and feedback queue.
///
/// All mutation happens inside [`Session::handle_event`], [`Session::tick`]
/// and the command methods, on the caller's thread. Per-round state lives in
/// the table, the two animation engines, the drag, the prompt and the
/// auto-play controller; [`Session::restart`] resets all of them together.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use clockpatience_engine::cards::CardSet;
/// use clockpatience_engine::config::SessionConfig;
/// use clockpatience_engine::game::{GameMode, ModeChoice, Session};
///
/// let mut session = Session::new(CardSet::standard(), 7, SessionConfig::default());
/// session.choose(ModeChoice::Automatic);
/// session.type_text("Will it rain?");
/// assert!(session.submit_question());
///
/// // 60 Hz ticks until the round is decided
/// while session.mode() == GameMode::Automatic {
///     session.tick(Duration::from_millis(16));
/// }
/// assert_eq!(session.mode(), GameMode::Result);
/// ```
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    cards: CardSet,
    seed: u64,
    mode: GameMode,
    deck: Deck,
    table: Table,
    shuffle: ShuffleEngine,
    deal: DealEngine,
    controls: Controls,
    prompt: Prompt,
    drag: Option<DragState>,
    auto: AutoPlay,
    plays: Vec<PlayRecord>,
    result: Option<RoundSummary>,
    feedback: Vec<Feedback>,
    /// Time accumulated from every tick
    clock: Duration,
}

/// Menu entries.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ModeChoice {
    Manual,
    Automatic,
    Instructions,
}

impl Session {
    pub fn new(cards: CardSet, seed: u64, config: SessionConfig) -> Self {
        let deck = Deck::new_with_seed(seed, &cards);
        let table = Table::new(&cards);
        let auto = AutoPlay::new(config.auto_interval());
        Self {
            config,
            cards,
            seed,
            mode: GameMode::Menu,
            deck,
            table,
            shuffle: ShuffleEngine::new(),
            deal: DealEngine::new(),
            controls: Controls::fresh_round(),
            prompt: Prompt::default(),
            drag: None,
            auto,
            plays: Vec::new(),
            result: None,
            feedback: Vec::new(),
            clock: Duration::ZERO,
        }
    }

    /// Builds a session from external card identifiers, refusing any set that
    /// cannot be dealt.
    pub fn from_identifiers<I, S>(
        identifiers: I,
        seed: u64,
        config: SessionConfig,
    ) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::new(CardSet::from_identifiers(identifiers)?, seed, config))
    }

    // ---- input -------------------------------------------------------------

    /// Applies one input event according to the active mode.
    pub fn handle_event(&mut self, event: InputEvent) {
        if let InputEvent::Key(Key::Escape) = event {
            match self.mode {
                GameMode::Instructions | GameMode::Manual | GameMode::Automatic => {
                    self.escape();
                    return;
                }
                _ => {}
            }
        }

        if self.prompt.open && matches!(self.mode, GameMode::Manual | GameMode::Automatic) {
            match event {
                InputEvent::Key(Key::Enter) => {
                    self.submit_question();
                }
                InputEvent::Key(Key::Backspace) => {
                    self.prompt.text.pop();
                }
                InputEvent::Text(c) if !c.is_control() => self.prompt.text.push(c),
                _ => {}
            }
            return;
        }

        match (self.mode, event) {
            (GameMode::Menu, InputEvent::PointerDown(p)) => {
                let menu = [Button::Automatic, Button::Manual, Button::Instructions];
                if let Some(button) = layout::button_at(p, &menu) {
                    self.click(button);
                }
            }
            (GameMode::Manual, InputEvent::PointerDown(p)) => self.manual_pointer_down(p),
            (GameMode::Manual, InputEvent::PointerMove(p)) => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.position = p;
                }
            }
            (GameMode::Manual, InputEvent::PointerUp(p)) => {
                if self.drag.is_some() {
                    self.drop_on(layout::pile_at(p));
                }
            }
            (GameMode::Result, InputEvent::PointerDown(p)) => {
                if layout::result_restart_rect().contains(p) {
                    self.click(Button::Restart);
                }
            }
            _ => {}
        }
    }

    fn manual_pointer_down(&mut self, p: Point) {
        let table_buttons = [Button::Shuffle, Button::Deal, Button::Play, Button::Restart];
        if let Some(button) = layout::button_at(p, &table_buttons) {
            self.click(button);
            return;
        }
        if let Some(pile) = layout::pile_at(p) {
            self.begin_drag(pile, p);
        }
    }

    /// Presses a table button. Disabled buttons do nothing. Returns whether
    /// the press had an effect.
    pub fn click(&mut self, button: Button) -> bool {
        let handled = match button {
            Button::Shuffle => self.request_shuffle(),
            Button::Deal => self.request_deal(),
            Button::Play => self.start_round(),
            Button::Restart => {
                let on_table = self.in_round_mode() || self.mode == GameMode::Result;
                if on_table && self.controls.restart {
                    self.restart();
                    true
                } else {
                    false
                }
            }
            Button::Automatic => self.choose(ModeChoice::Automatic),
            Button::Manual => self.choose(ModeChoice::Manual),
            Button::Instructions => self.choose(ModeChoice::Instructions),
        };
        if handled {
            self.feedback.push(Feedback::ButtonClicked(button));
        }
        handled
    }

    // ---- mode transitions --------------------------------------------------

    /// Leaves the menu for the chosen screen. Ignored outside the menu.
    pub fn choose(&mut self, choice: ModeChoice) -> bool {
        if self.mode != GameMode::Menu {
            return false;
        }
        match choice {
            ModeChoice::Instructions => self.set_mode(GameMode::Instructions),
            ModeChoice::Manual => {
                self.reset_round();
                self.set_mode(GameMode::Manual);
            }
            ModeChoice::Automatic => {
                self.reset_round();
                self.prompt.open = true;
                self.auto.begin(self.clock);
                self.set_mode(GameMode::Automatic);
            }
        }
        true
    }

    /// Returns to the menu from Instructions, Manual or Automatic, dropping
    /// any animation and automation in progress.
    pub fn escape(&mut self) -> bool {
        match self.mode {
            GameMode::Instructions => {
                self.set_mode(GameMode::Menu);
                true
            }
            GameMode::Manual | GameMode::Automatic => {
                self.reset_round();
                self.set_mode(GameMode::Menu);
                true
            }
            _ => false,
        }
    }

    /// Full reset back to the menu, whatever the previous outcome.
    pub fn restart(&mut self) {
        self.reset_round();
        self.set_mode(GameMode::Menu);
    }

    fn reset_round(&mut self) {
        self.shuffle.cancel();
        self.shuffle.set_enabled(true);
        self.deal.cancel();
        self.deck.reset(&self.cards);
        self.table.reset();
        self.auto.clear();
        self.controls = Controls::fresh_round();
        self.prompt = Prompt::default();
        self.drag = None;
        self.plays.clear();
        self.result = None;
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            tracing::info!(from = ?self.mode, to = ?mode, "mode changed");
            self.mode = mode;
        }
    }

    fn in_round_mode(&self) -> bool {
        matches!(self.mode, GameMode::Manual | GameMode::Automatic)
    }

    // ---- shuffle, deal, start ---------------------------------------------

    /// Starts a shuffle. No-op while one is running, while dealing, after the
    /// deal, or outside Manual/Automatic.
    pub fn request_shuffle(&mut self) -> bool {
        if !self.in_round_mode()
            || !self.controls.shuffle
            || self.deal.is_active()
            || self.table.state() != RoundState::NotStarted
        {
            return false;
        }
        if !self.shuffle.request(&mut self.deck, &self.config) {
            return false;
        }
        self.controls.deal = false;
        self.feedback.push(Feedback::ShuffleStarted);
        true
    }

    /// Whether the deck is complete and no shuffle is running.
    pub fn deck_ready(&self) -> bool {
        !self.shuffle.is_pending() && self.deck.remaining() == self.cards.len()
    }

    /// Clears the table and starts dealing the deck.
    pub fn request_deal(&mut self) -> bool {
        if !self.in_round_mode() || !self.controls.deal || !self.deck_ready() {
            return false;
        }
        self.table.reset();
        if !self.deal.start(&mut self.deck, self.config.deal_card()) {
            return false;
        }
        self.controls.shuffle = false;
        self.controls.deal = false;
        self.shuffle.set_enabled(false);
        true
    }

    /// Begins play once the deal is complete and the Play control is enabled.
    pub fn start_round(&mut self) -> bool {
        if !self.in_round_mode() || !self.controls.play || self.deal.is_active() {
            return false;
        }
        if !self.table.start_round() {
            return false;
        }
        self.controls.play = false;
        tracing::info!(mode = ?self.mode, "round started");
        true
    }

    // ---- question prompt --------------------------------------------------

    /// Appends typed text to the open prompt; control characters are dropped.
    pub fn type_text(&mut self, text: &str) {
        if !self.prompt.open {
            return;
        }
        self.prompt
            .text
            .extend(text.chars().filter(|c| !c.is_control()));
    }

    /// Confirms a non-empty question. Enables Play, and in automatic mode
    /// releases the controller.
    pub fn submit_question(&mut self) -> bool {
        if !self.prompt.open || self.prompt.text.trim().is_empty() {
            return false;
        }
        let question = std::mem::take(&mut self.prompt.text);
        tracing::info!(question = %question, "question submitted");
        self.prompt.open = false;
        self.prompt.submitted = Some(question);
        self.controls.play = true;
        if self.mode == GameMode::Automatic {
            self.auto.question_submitted();
        }
        true
    }

    // ---- manual play ------------------------------------------------------

    /// Picks up the current card if `pile` is the pile in play.
    pub fn begin_drag(&mut self, pile: PileIndex, position: Point) -> Option<CardId> {
        if self.mode != GameMode::Manual
            || self.table.state() != RoundState::Playing
            || self.drag.is_some()
            || pile != self.table.pointer()
        {
            return None;
        }
        let card = self.table.origin_top_unrevealed(pile)?;
        self.drag = Some(DragState {
            card,
            origin: pile,
            position,
        });
        self.feedback.push(Feedback::CardPicked(card));
        Some(card)
    }

    /// Releases the dragged card over `pile` (or over empty table space).
    pub fn drop_on(&mut self, pile: Option<PileIndex>) -> Option<MoveOutcome> {
        let drag = self.drag.take()?;
        let outcome = match pile {
            Some(destination) => self.move_card(drag.card, destination),
            None => {
                self.feedback.push(Feedback::RejectedMove);
                MoveOutcome::Rejected(RejectReason::WrongDestination)
            }
        };
        Some(outcome)
    }

    /// Moves `card` onto `destination` under the clock-patience rule.
    pub fn move_card(&mut self, card: CardId, destination: PileIndex) -> MoveOutcome {
        if !self.in_round_mode() {
            return MoveOutcome::Rejected(RejectReason::NotPlaying);
        }
        let from = self.table.pointer();
        let outcome = self.table.attempt_move(card, destination);
        match outcome {
            MoveOutcome::Rejected(reason) => {
                tracing::debug!(card = self.cards.name(card), to = %destination, ?reason, "move rejected");
                self.feedback.push(Feedback::RejectedMove);
            }
            MoveOutcome::Continue { .. } | MoveOutcome::Win | MoveOutcome::Lose(_) => {
                self.record_play(card, from, destination);
            }
        }
        self.check_round_end();
        outcome
    }

    /// Reveals the current pile's top card.
    pub fn reveal(&mut self) -> RevealOutcome {
        if !self.in_round_mode() {
            return RevealOutcome::NotPlaying;
        }
        let from = self.table.pointer();
        let top = self.table.pile(from).last().copied();
        let outcome = self.table.reveal_current();
        if let (Some(card), RevealOutcome::Continue { .. } | RevealOutcome::Win) = (top, outcome)
        {
            let to = self.table.pointer();
            self.record_play(card, from, to);
        }
        self.check_round_end();
        outcome
    }

    fn record_play(&mut self, card: CardId, from: PileIndex, to: PileIndex) {
        tracing::debug!(card = self.cards.name(card), from = %from, to = %to, "card played");
        self.plays.push(PlayRecord {
            card: self.cards.name(card).to_string(),
            from,
            to,
        });
        self.feedback.push(Feedback::PlayedCard(card));
    }

    fn check_round_end(&mut self) {
        let outcome = match self.table.state() {
            RoundState::Won => RoundOutcome::Won,
            RoundState::Lost(reason) => RoundOutcome::Lost(reason),
            RoundState::NotStarted | RoundState::Playing => return,
        };
        if !self.in_round_mode() {
            return;
        }
        let summary = RoundSummary {
            mode: self.mode,
            outcome,
            question: self.prompt.submitted.clone(),
            revealed: self.table.revealed().len(),
            plays: std::mem::take(&mut self.plays),
        };
        tracing::info!(
            mode = ?summary.mode,
            outcome = ?summary.outcome,
            revealed = summary.revealed,
            answer = summary.outcome.answer(),
            "round finished"
        );
        self.feedback.push(match outcome {
            RoundOutcome::Won => Feedback::RoundWon,
            RoundOutcome::Lost(_) => Feedback::RoundLost,
        });
        self.drag = None;
        self.auto.round_over();
        self.controls.restart = true;
        self.result = Some(summary);
        self.set_mode(GameMode::Result);
    }

    // ---- frame update -----------------------------------------------------

    /// Advances animations, then the auto-play controller, by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        self.clock += elapsed;

        if self.shuffle.tick(&mut self.deck, elapsed) {
            self.on_shuffle_finished();
        }
        if self.deal.is_active() {
            let landed = self.deal.tick(&mut self.table, elapsed);
            self.on_cards_landed(landed);
        }

        if self.mode == GameMode::Automatic {
            self.step_auto();
        }
    }

    /// Completes any running shuffle or deal at once, as if enough frames had
    /// passed.
    pub fn finish_animations(&mut self) {
        if self.shuffle.finish(&mut self.deck) {
            self.on_shuffle_finished();
        }
        if self.deal.is_active() {
            let landed = self.deal.finish(&mut self.table);
            self.on_cards_landed(landed);
        }
    }

    fn on_shuffle_finished(&mut self) {
        self.controls.deal = true;
        self.feedback.push(Feedback::ShuffleStopped);
    }

    fn on_cards_landed(&mut self, landed: Vec<crate::deal::DealtCard>) {
        for dealt in landed {
            self.feedback.push(Feedback::CardDealt {
                card: dealt.card,
                pile: dealt.pile,
            });
        }
        if !self.deal.is_active() {
            tracing::info!(cards = self.table.card_count(), "deal complete");
            // manual play asks its question once the cards are down
            if self.mode == GameMode::Manual {
                self.prompt.open = true;
                self.prompt.text.clear();
            }
        }
    }

    fn step_auto(&mut self) {
        let status = AutoStatus {
            shuffle_pending: self.shuffle.is_pending(),
            deal_active: self.deal.is_active(),
        };
        let Some(action) = self.auto.step(self.clock, status) else {
            return;
        };
        tracing::debug!(?action, phase = ?self.auto.phase(), "auto-play action");
        match action {
            AutoAction::Shuffle => {
                self.request_shuffle();
            }
            AutoAction::Deal => {
                self.request_deal();
            }
            AutoAction::StartRound => {
                self.controls.play = true;
                self.start_round();
            }
            AutoAction::Play => match self.config.auto_strategy {
                AutoStrategy::Reveal => {
                    self.reveal();
                }
                AutoStrategy::Move => self.auto_move(),
            },
        }
    }

    fn auto_move(&mut self) {
        let from = self.table.pointer();
        let card = self.table.current_card();
        let outcome = self.table.auto_move();
        if let (Some(card), MoveOutcome::Continue { to, .. }) = (card, outcome) {
            self.record_play(card, from, to);
        } else if let (Some(card), MoveOutcome::Win | MoveOutcome::Lose(_)) = (card, outcome) {
            let to = self.table.pointer();
            self.record_play(card, from, to);
        }
        self.check_round_end();
    }

    // ---- accessors --------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        let name = |id: &CardId| self.cards.name(*id).to_string();
        SessionSnapshot {
            mode: self.mode,
            piles: self
                .table
                .piles()
                .iter()
                .map(|pile| pile.iter().map(name).collect())
                .collect(),
            revealed: self
                .cards
                .ids()
                .filter(|&id| self.table.is_revealed(id))
                .map(|id| name(&id))
                .collect(),
            pointer: self.table.pointer(),
            round: self.table.state(),
            deck_remaining: self.deck.remaining(),
            shuffle: self.shuffle.stage(),
            dealing: self
                .deal
                .current()
                .map(|(dealt, progress)| (name(&dealt.card), dealt.pile, progress)),
            controls: self.controls,
            prompt: self.prompt.clone(),
            drag: self.drag,
            auto_phase: self.auto.phase(),
            result: self.result.clone(),
        }
    }

    /// History record of the finished round, if the result screen is showing.
    pub fn round_record(&self, round_id: String) -> Option<RoundRecord> {
        let summary = self.result.as_ref()?;
        Some(RoundRecord {
            round_id,
            seed: self.seed,
            mode: summary.mode,
            question: summary.question.clone(),
            outcome: summary.outcome,
            revealed: summary.revealed,
            plays: summary.plays.clone(),
            ts: None,
        })
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        &INSTRUCTIONS
    }

    /// Drains queued feedback notifications.
    pub fn take_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback)
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn auto_phase(&self) -> AutoPhase {
        self.auto.phase()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cards(&self) -> &CardSet {
        &self.cards
    }

    pub fn shuffle_engine(&self) -> &ShuffleEngine {
        &self.shuffle
    }

    pub fn deal_engine(&self) -> &DealEngine {
        &self.deal
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn result(&self) -> Option<&RoundSummary> {
        self.result.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Session time accumulated from ticks.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Cards on the table, in the deck and in flight. Always the full set.
    pub fn cards_accounted(&self) -> usize {
        self.table.card_count() + self.deck.remaining() + self.deal.in_flight().count()
    }
}
