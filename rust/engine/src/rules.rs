use serde::{Deserialize, Serialize};

use crate::cards::{target_pile_index, CardId, CardSet, PileIndex, Rank, PILE_COUNT};

/// Why a round was lost.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum LossReason {
    /// The current pile had no cards left to reveal
    EmptyPile,
    /// The current pile's top card had already been revealed
    DuplicateTop,
    /// After a move, every card of the new current pile was already revealed
    PileExhausted,
}

/// Progress of a single round on the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundState {
    NotStarted,
    Playing,
    Won,
    Lost(LossReason),
}

impl RoundState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundState::Won | RoundState::Lost(_))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// `card` was revealed and the pointer moved to `next`
    Continue { card: CardId, next: PileIndex },
    Win,
    Lose(LossReason),
    /// No round in progress; nothing changed
    NotPlaying,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    NotPlaying,
    /// The card is not the highest unrevealed card of the current pile
    NotCurrentCard,
    /// The destination is not the pile matching the card's rank
    WrongDestination,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// `card` now sits on top of `to`, which became the current pile
    Continue { card: CardId, to: PileIndex },
    Win,
    Lose(LossReason),
    Rejected(RejectReason),
}

/// Cards revealed this round, stored as a 52-bit mask.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RevealedSet(u64);

impl RevealedSet {
    pub fn contains(&self, card: CardId) -> bool {
        self.0 & (1u64 << card.get()) != 0
    }

    /// Marks `card`; returns `false` if it was already revealed.
    pub fn insert(&mut self, card: CardId) -> bool {
        let was = self.contains(card);
        self.0 |= 1u64 << card.get();
        !was
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// The clock face: 13 piles, the revealed set and the pile currently in play.
///
/// Holds only the rank of each card; identities come from the [`CardSet`] the
/// table was built from.
///
/// # Examples
///
/// ```
/// use clockpatience_engine::cards::{CardSet, PileIndex};
/// use clockpatience_engine::rules::{RevealOutcome, Table};
///
/// let set = CardSet::standard();
/// let mut table = Table::new(&set);
/// // standard ids run A..K per suit, so id 4 is a Five
/// let five = set.ids().nth(4).unwrap();
/// table.place(five, PileIndex::CENTER);
/// table.start_round();
/// assert!(matches!(
///     table.reveal_current(),
///     RevealOutcome::Continue { next, .. } if next.get() == 4
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    piles: [Vec<CardId>; PILE_COUNT],
    revealed: RevealedSet,
    pointer: PileIndex,
    state: RoundState,
    /// Rank of every card, indexed by `CardId`
    ranks: Vec<Rank>,
}

impl Table {
    pub fn new(set: &CardSet) -> Self {
        Self {
            piles: Default::default(),
            revealed: RevealedSet::default(),
            pointer: PileIndex::CENTER,
            state: RoundState::NotStarted,
            ranks: set.cards().iter().map(|c| c.rank).collect(),
        }
    }

    /// Empties every pile and forgets all reveals; the round returns to
    /// `NotStarted` with the pointer on the center pile.
    pub fn reset(&mut self) {
        for pile in &mut self.piles {
            pile.clear();
        }
        self.revealed.clear();
        self.pointer = PileIndex::CENTER;
        self.state = RoundState::NotStarted;
    }

    /// Puts `card` on top of `pile`. Used while dealing and for building
    /// fixed layouts.
    pub fn place(&mut self, card: CardId, pile: PileIndex) {
        self.piles[pile.get()].push(card);
    }

    /// Enters `Playing` from `NotStarted`. Returns `false` in any other state.
    pub fn start_round(&mut self) -> bool {
        if self.state != RoundState::NotStarted {
            return false;
        }
        self.pointer = PileIndex::CENTER;
        self.state = RoundState::Playing;
        true
    }

    /// Reveals the top card of the current pile and follows its rank.
    pub fn reveal_current(&mut self) -> RevealOutcome {
        if self.state != RoundState::Playing {
            return RevealOutcome::NotPlaying;
        }
        let Some(&card) = self.piles[self.pointer.get()].last() else {
            self.state = RoundState::Lost(LossReason::EmptyPile);
            return RevealOutcome::Lose(LossReason::EmptyPile);
        };
        if self.revealed.contains(card) {
            self.state = RoundState::Lost(LossReason::DuplicateTop);
            return RevealOutcome::Lose(LossReason::DuplicateTop);
        }

        self.revealed.insert(card);
        let next = target_pile_index(self.rank(card));
        self.pointer = next;
        if self.all_revealed() {
            self.state = RoundState::Won;
            RevealOutcome::Win
        } else {
            RevealOutcome::Continue { card, next }
        }
    }

    /// Moves `card` from the current pile onto `destination`.
    ///
    /// Only the current pile's highest unrevealed card may move, and only onto
    /// the pile its rank points at. A rejected move leaves the table untouched.
    pub fn attempt_move(&mut self, card: CardId, destination: PileIndex) -> MoveOutcome {
        if self.state != RoundState::Playing {
            return MoveOutcome::Rejected(RejectReason::NotPlaying);
        }
        if self.origin_top_unrevealed(self.pointer) != Some(card) {
            return MoveOutcome::Rejected(RejectReason::NotCurrentCard);
        }
        if destination != target_pile_index(self.rank(card)) {
            return MoveOutcome::Rejected(RejectReason::WrongDestination);
        }

        let origin = &mut self.piles[self.pointer.get()];
        if let Some(pos) = origin.iter().rposition(|&c| c == card) {
            origin.remove(pos);
        }
        self.piles[destination.get()].push(card);
        self.revealed.insert(card);
        self.pointer = destination;

        if self.all_revealed() {
            self.state = RoundState::Won;
            MoveOutcome::Win
        } else if self.origin_top_unrevealed(destination).is_none() {
            self.state = RoundState::Lost(LossReason::PileExhausted);
            MoveOutcome::Lose(LossReason::PileExhausted)
        } else {
            MoveOutcome::Continue {
                card,
                to: destination,
            }
        }
    }

    /// Moves the current pile's highest unrevealed card to its own target pile.
    pub fn auto_move(&mut self) -> MoveOutcome {
        if self.state != RoundState::Playing {
            return MoveOutcome::Rejected(RejectReason::NotPlaying);
        }
        match self.current_card() {
            Some(card) => self.attempt_move(card, target_pile_index(self.rank(card))),
            None => {
                self.state = RoundState::Lost(LossReason::PileExhausted);
                MoveOutcome::Lose(LossReason::PileExhausted)
            }
        }
    }

    /// Highest card of `pile` not yet revealed, scanning from the top down.
    pub fn origin_top_unrevealed(&self, pile: PileIndex) -> Option<CardId> {
        self.piles[pile.get()]
            .iter()
            .rev()
            .copied()
            .find(|&c| !self.revealed.contains(c))
    }

    /// The card a player may pick up right now.
    pub fn current_card(&self) -> Option<CardId> {
        self.origin_top_unrevealed(self.pointer)
    }

    pub fn target_of(&self, card: CardId) -> PileIndex {
        target_pile_index(self.rank(card))
    }

    pub fn rank(&self, card: CardId) -> Rank {
        self.ranks[card.get()]
    }

    pub fn pile(&self, index: PileIndex) -> &[CardId] {
        &self.piles[index.get()]
    }

    pub fn piles(&self) -> &[Vec<CardId>; PILE_COUNT] {
        &self.piles
    }

    pub fn card_count(&self) -> usize {
        self.piles.iter().map(Vec::len).sum()
    }

    pub fn revealed(&self) -> &RevealedSet {
        &self.revealed
    }

    pub fn is_revealed(&self, card: CardId) -> bool {
        self.revealed.contains(card)
    }

    pub fn pointer(&self) -> PileIndex {
        self.pointer
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    fn all_revealed(&self) -> bool {
        self.revealed.len() == self.ranks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pile(i: usize) -> PileIndex {
        PileIndex::new(i).unwrap()
    }

    /// First card of the standard set with the given rank that is not yet used.
    fn take_rank(set: &CardSet, used: &mut Vec<CardId>, rank: u8) -> CardId {
        let id = set
            .cards()
            .iter()
            .find(|c| c.rank.value() == rank && !used.contains(&c.id))
            .map(|c| c.id)
            .unwrap();
        used.push(id);
        id
    }

    #[test]
    fn reveal_follows_rank_of_top_card() {
        let set = CardSet::standard();
        let mut used = Vec::new();
        let mut table = Table::new(&set);
        let seven = take_rank(&set, &mut used, 7);
        let five = take_rank(&set, &mut used, 5);
        table.place(seven, PileIndex::CENTER);
        table.place(five, PileIndex::CENTER);
        assert!(table.start_round());

        assert_eq!(
            table.reveal_current(),
            RevealOutcome::Continue {
                card: five,
                next: pile(4)
            }
        );
        assert_eq!(table.pointer(), pile(4));
        assert!(table.is_revealed(five));
        assert!(!table.is_revealed(seven));
    }

    #[test]
    fn reveal_on_empty_pile_loses() {
        let set = CardSet::standard();
        let mut table = Table::new(&set);
        table.start_round();
        assert_eq!(
            table.reveal_current(),
            RevealOutcome::Lose(LossReason::EmptyPile)
        );
        assert_eq!(table.state(), RoundState::Lost(LossReason::EmptyPile));
    }

    #[test]
    fn reveal_of_revealed_top_loses() {
        let set = CardSet::standard();
        let mut used = Vec::new();
        let mut table = Table::new(&set);
        let king = take_rank(&set, &mut used, 13);
        table.place(king, PileIndex::CENTER);
        table.start_round();

        // a King sends the pointer straight back to the center pile
        assert!(matches!(
            table.reveal_current(),
            RevealOutcome::Continue { next, .. } if next == PileIndex::CENTER
        ));
        assert_eq!(
            table.reveal_current(),
            RevealOutcome::Lose(LossReason::DuplicateTop)
        );
        assert!(table.revealed().len() < 52);
    }

    #[test]
    fn operations_before_start_do_nothing() {
        let set = CardSet::standard();
        let mut table = Table::new(&set);
        let card = set.ids().next().unwrap();
        table.place(card, PileIndex::CENTER);
        assert_eq!(table.reveal_current(), RevealOutcome::NotPlaying);
        assert_eq!(
            table.attempt_move(card, pile(0)),
            MoveOutcome::Rejected(RejectReason::NotPlaying)
        );
        assert!(table.revealed().is_empty());
    }

    #[test]
    fn wrong_destination_is_rejected_without_mutation() {
        let set = CardSet::standard();
        let mut used = Vec::new();
        let mut table = Table::new(&set);
        let seven = take_rank(&set, &mut used, 7);
        table.place(seven, PileIndex::CENTER);
        table.start_round();

        let before = table.clone();
        assert_eq!(
            table.attempt_move(seven, pile(3)),
            MoveOutcome::Rejected(RejectReason::WrongDestination)
        );
        assert_eq!(table.piles(), before.piles());
        assert_eq!(table.pointer(), before.pointer());
        assert!(table.revealed().is_empty());
    }

    #[test]
    fn only_highest_unrevealed_card_may_move() {
        let set = CardSet::standard();
        let mut used = Vec::new();
        let mut table = Table::new(&set);
        let two = take_rank(&set, &mut used, 2);
        let three = take_rank(&set, &mut used, 3);
        table.place(two, PileIndex::CENTER);
        table.place(three, PileIndex::CENTER);
        table.start_round();

        assert_eq!(
            table.attempt_move(two, pile(1)),
            MoveOutcome::Rejected(RejectReason::NotCurrentCard)
        );
    }

    #[test]
    fn move_onto_exhausted_pile_loses() {
        let set = CardSet::standard();
        let mut used = Vec::new();
        let mut table = Table::new(&set);
        let ace = take_rank(&set, &mut used, 1);
        table.place(ace, PileIndex::CENTER);
        table.start_round();

        // pile 0 is empty, so after the Ace lands there it holds only revealed cards
        assert_eq!(
            table.attempt_move(ace, pile(0)),
            MoveOutcome::Lose(LossReason::PileExhausted)
        );
        assert_eq!(table.pile(pile(0)), &[ace]);
        assert!(table.pile(PileIndex::CENTER).is_empty());
    }

    #[test]
    fn moved_card_is_skipped_when_finding_next_card() {
        let set = CardSet::standard();
        let mut used = Vec::new();
        let mut table = Table::new(&set);
        let four = take_rank(&set, &mut used, 4);
        let ace = take_rank(&set, &mut used, 1);
        let king = take_rank(&set, &mut used, 13);
        table.place(four, pile(0));
        table.place(king, PileIndex::CENTER);
        table.place(ace, PileIndex::CENTER);
        table.start_round();

        assert_eq!(
            table.attempt_move(ace, pile(0)),
            MoveOutcome::Continue {
                card: ace,
                to: pile(0)
            }
        );
        // the Ace sits on top of pile 0 but the Four below it is next
        assert_eq!(table.pile(pile(0)).last(), Some(&ace));
        assert_eq!(table.current_card(), Some(four));
    }

    #[test]
    fn revealed_set_counts_bits() {
        let set = CardSet::standard();
        let mut revealed = RevealedSet::default();
        let ids: Vec<CardId> = set.ids().collect();
        assert!(revealed.insert(ids[51]));
        assert!(!revealed.insert(ids[51]));
        assert!(revealed.insert(ids[0]));
        assert_eq!(revealed.len(), 2);
        revealed.clear();
        assert!(revealed.is_empty());
    }
}
