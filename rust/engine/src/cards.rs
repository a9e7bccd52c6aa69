use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Number of cards in a complete clock-patience deck.
pub const DECK_SIZE: usize = 52;

/// Number of piles on the clock face (twelve hours plus the center).
pub const PILE_COUNT: usize = 13;

/// Cards of each rank in a complete deck.
pub const CARDS_PER_RANK: usize = 4;

/// Face value of a card, Ace (1) through King (13). Suits play no role in
/// clock patience, so the rank is all the rule engine ever looks at.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);

    pub fn new(value: u8) -> Option<Rank> {
        (1..=13).contains(&value).then_some(Rank(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Parses a card identifier into a rank, rejecting anything outside 1..=13.
    ///
    /// # Examples
    ///
    /// ```
    /// use clockpatience_engine::cards::Rank;
    ///
    /// assert_eq!(Rank::parse("QH").unwrap(), Rank::QUEEN);
    /// assert!(Rank::parse("joker.png").is_ok()); // leading 'j' reads as Jack
    /// assert!(Rank::parse("back.png").is_err());
    /// ```
    pub fn parse(identifier: &str) -> Result<Rank, GameError> {
        let raw = rank_of(identifier);
        u8::try_from(raw)
            .ok()
            .and_then(Rank::new)
            .ok_or_else(|| GameError::InvalidRank {
                identifier: identifier.to_string(),
                rank: raw,
            })
    }

    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=13).map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => write!(f, "A"),
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            v => write!(f, "{}", v),
        }
    }
}

/// Reads the raw rank encoded at the start of a card identifier.
///
/// A leading `a`, `j`, `q` or `k` (any case) maps to 1, 11, 12 and 13; otherwise
/// the leading run of decimal digits is parsed. Returns 0 when neither applies,
/// which callers must treat as invalid.
pub fn rank_of(identifier: &str) -> u32 {
    let lower = identifier.to_ascii_lowercase();
    match lower.chars().next() {
        Some('a') => return 1,
        Some('j') => return 11,
        Some('q') => return 12,
        Some('k') => return 13,
        _ => {}
    }
    lower
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}

/// Index of one of the 13 piles. Indices 0..=11 hold ranks 1..=12, index 12 is
/// the center pile where the Kings go.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PileIndex(u8);

impl PileIndex {
    pub const CENTER: PileIndex = PileIndex(12);

    pub fn new(index: usize) -> Option<PileIndex> {
        (index < PILE_COUNT).then_some(PileIndex(index as u8))
    }

    pub fn try_new(index: usize) -> Result<PileIndex, GameError> {
        PileIndex::new(index).ok_or(GameError::InvalidPileIndex(index))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = PileIndex> {
        (0..PILE_COUNT as u8).map(PileIndex)
    }
}

impl fmt::Display for PileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pile a card of the given rank is played onto.
pub fn target_pile_index(rank: Rank) -> PileIndex {
    if rank == Rank::KING {
        PileIndex::CENTER
    } else {
        PileIndex(rank.value() - 1)
    }
}

/// Stable identity of a card within a [`CardSet`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(u8);

impl CardId {
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// A single playing card: its external identifier and the rank parsed from it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// External identifier, typically the asset file name (`"10H"`, `"qs.png"`)
    pub name: String,
    pub rank: Rank,
}

/// The 52 cards of a round, validated once at load time.
///
/// Ranks are parsed when the set is built; a set that fails validation can
/// never be dealt.
#[derive(Debug, Clone)]
pub struct CardSet {
    cards: Vec<Card>,
}

impl CardSet {
    /// Builds the card set from the 52 built-in identifiers.
    pub fn standard() -> CardSet {
        let cards = standard_identifiers()
            .into_iter()
            .enumerate()
            .map(|(i, name)| Card {
                id: CardId(i as u8),
                rank: Rank(rank_of(&name) as u8),
                name,
            })
            .collect();
        CardSet { cards }
    }

    pub fn from_identifiers<I, S>(identifiers: I) -> Result<CardSet, GameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = identifiers
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        if names.len() != DECK_SIZE {
            return Err(GameError::WrongCardCount {
                expected: DECK_SIZE,
                found: names.len(),
            });
        }

        let mut seen = HashSet::with_capacity(DECK_SIZE);
        let mut per_rank = [0usize; 14];
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for (i, name) in names.into_iter().enumerate() {
            if !seen.insert(name.clone()) {
                return Err(GameError::DuplicateIdentifier(name));
            }
            let rank = Rank::parse(&name)?;
            per_rank[rank.value() as usize] += 1;
            cards.push(Card {
                id: CardId(i as u8),
                name,
                rank,
            });
        }

        for rank in Rank::all() {
            let count = per_rank[rank.value() as usize];
            if count != CARDS_PER_RANK {
                return Err(GameError::UnbalancedRank {
                    rank: rank.value(),
                    count,
                });
            }
        }
        Ok(CardSet { cards })
    }

    pub fn get(&self, id: CardId) -> &Card {
        &self.cards[id.get()]
    }

    pub fn rank(&self, id: CardId) -> Rank {
        self.cards[id.get()].rank
    }

    pub fn name(&self, id: CardId) -> &str {
        &self.cards[id.get()].name
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|c| c.id)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The 52 built-in identifiers: rank then suit initial (`AS`, `10H`, `KD`, ...).
pub fn standard_identifiers() -> Vec<String> {
    const SUITS: [char; 4] = ['S', 'H', 'C', 'D'];
    let mut v = Vec::with_capacity(DECK_SIZE);
    for suit in SUITS {
        for rank in Rank::all() {
            v.push(format!("{}{}", rank, suit));
        }
    }
    v
}
