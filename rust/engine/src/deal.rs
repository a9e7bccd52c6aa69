use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{advance, AnimationState};
use crate::cards::{CardId, PileIndex, CARDS_PER_RANK, PILE_COUNT};
use crate::deck::Deck;
use crate::rules::Table;

/// One card on its way from the deck to a pile.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DealtCard {
    pub card: CardId,
    pub pile: PileIndex,
}

/// Destination of every card in `order`: four passes over piles 0..=12, one
/// card per pile per pass, stopping early if the cards run out.
///
/// Pile `i` therefore receives positions `i`, `i + 13`, `i + 26` and `i + 39`.
pub fn deal_plan(order: &[CardId]) -> Vec<DealtCard> {
    let mut cards = order.iter().copied();
    let mut plan = Vec::with_capacity(order.len().min(CARDS_PER_RANK * PILE_COUNT));
    'rounds: for _ in 0..CARDS_PER_RANK {
        for pile in PileIndex::all() {
            match cards.next() {
                Some(card) => plan.push(DealtCard { card, pile }),
                None => break 'rounds,
            }
        }
    }
    plan
}

/// Moves the deck onto the table one card per animation step.
///
/// Starting a deal takes every card out of the deck at once and queues it;
/// cards land on their piles as their steps finish. Deck, queue and table
/// together always hold the whole card set.
#[derive(Debug, Default)]
pub struct DealEngine {
    queue: VecDeque<DealtCard>,
    step: Duration,
    anim: AnimationState,
}

impl DealEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the whole deck for dealing. No-op (returns `false`) while a deal
    /// is in flight or the deck is empty.
    pub fn start(&mut self, deck: &mut Deck, step: Duration) -> bool {
        if self.is_active() || deck.is_empty() {
            return false;
        }
        let mut order = Vec::with_capacity(deck.remaining());
        while let Some(card) = deck.take_front() {
            order.push(card);
        }
        self.queue = deal_plan(&order).into();
        self.step = step;
        self.anim = AnimationState::default();
        tracing::debug!(cards = self.queue.len(), "deal started");
        true
    }

    /// Advances the animation and lands every card whose step completed.
    /// Returns the landed cards in dealing order.
    pub fn tick(&mut self, table: &mut Table, elapsed: Duration) -> Vec<DealtCard> {
        if !self.is_active() {
            return Vec::new();
        }
        let durations = vec![self.step; self.queue.len()];
        let (anim, _) = advance(self.anim, elapsed, &durations);
        let landed: Vec<DealtCard> = self.queue.drain(..anim.step).collect();
        for dealt in &landed {
            table.place(dealt.card, dealt.pile);
        }
        self.anim = AnimationState {
            step: 0,
            progress: anim.progress,
        };
        if !self.is_active() {
            tracing::debug!("deal finished");
        }
        landed
    }

    /// Lands every queued card immediately.
    pub fn finish(&mut self, table: &mut Table) -> Vec<DealtCard> {
        let landed: Vec<DealtCard> = self.queue.drain(..).collect();
        for dealt in &landed {
            table.place(dealt.card, dealt.pile);
        }
        self.anim = AnimationState::default();
        landed
    }

    /// Abandons the deal and hands back the cards still in flight.
    pub fn cancel(&mut self) -> Vec<CardId> {
        self.anim = AnimationState::default();
        self.queue.drain(..).map(|d| d.card).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn in_flight(&self) -> impl Iterator<Item = &DealtCard> {
        self.queue.iter()
    }

    /// The card currently flying and its progress in `[0, 1)`.
    pub fn current(&self) -> Option<(DealtCard, f32)> {
        self.queue.front().map(|d| (*d, self.anim.progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardSet;

    #[test]
    fn plan_sends_every_thirteenth_card_to_the_same_pile() {
        let set = CardSet::standard();
        let order: Vec<CardId> = set.ids().collect();
        let plan = deal_plan(&order);
        assert_eq!(plan.len(), 52);
        for (pos, dealt) in plan.iter().enumerate() {
            assert_eq!(dealt.card, order[pos]);
            assert_eq!(dealt.pile.get(), pos % 13);
        }
    }

    #[test]
    fn short_deck_stops_early() {
        let set = CardSet::standard();
        let order: Vec<CardId> = set.ids().take(15).collect();
        let plan = deal_plan(&order);
        assert_eq!(plan.len(), 15);
        assert_eq!(plan[14].pile.get(), 1);
    }

    #[test]
    fn tick_lands_one_card_per_step() {
        let set = CardSet::standard();
        let mut deck = Deck::new_with_seed(5, &set);
        let mut table = Table::new(&set);
        let mut deal = DealEngine::new();
        assert!(deal.start(&mut deck, Duration::from_millis(100)));
        assert!(deck.is_empty());
        assert!(!deal.start(&mut deck, Duration::from_millis(100)));

        assert!(deal.tick(&mut table, Duration::from_millis(50)).is_empty());
        assert_eq!(deal.tick(&mut table, Duration::from_millis(260)).len(), 3);
        assert_eq!(table.card_count() + deal.in_flight().count(), 52);

        let rest = deal.finish(&mut table);
        assert_eq!(rest.len(), 49);
        assert!(!deal.is_active());
        assert_eq!(table.card_count(), 52);
        for pile in PileIndex::all() {
            assert_eq!(table.pile(pile).len(), 4);
        }
    }

    #[test]
    fn cancel_returns_cards_in_flight() {
        let set = CardSet::standard();
        let mut deck = Deck::new_with_seed(5, &set);
        let mut table = Table::new(&set);
        let mut deal = DealEngine::new();
        deal.start(&mut deck, Duration::from_millis(100));
        deal.tick(&mut table, Duration::from_millis(1_000));
        let back = deal.cancel();
        assert_eq!(back.len() + table.card_count(), 52);
        assert!(!deal.is_active());
    }
}
