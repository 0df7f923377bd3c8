//! Core table entities: cards, the deck, and the identifier/chip scalars
//! shared by every other module.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{BOARD_SIZE, DECK_SIZE, HOLE_SIZE};
use super::errors::DealError;

/// Type alias for chip amounts. All betting arithmetic is unsigned integer
/// math; the only division is the pot split, which handles its remainder
/// explicitly.
pub type Chips = u64;

/// Opaque player identifier, unique within a process. Id 0 is reserved as
/// the unset-button sentinel, so real ids start at 1.
pub type PlayerId = u64;

/// Opaque table identifier, unique within a process.
pub type TableId = u64;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Clubs => 'c',
            Self::Diamonds => 'd',
            Self::Hearts => 'h',
            Self::Spades => 's',
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value used for kicker comparisons: Two = 2 up to Ace = 14.
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8 + 2
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Ten => 'T',
            Self::Jack => 'J',
            Self::Queen => 'Q',
            Self::King => 'K',
            Self::Ace => 'A',
            r => (r.value() + b'0') as char,
        };
        write!(f, "{repr}")
    }
}

/// A playing card. Renders as two characters, rank then suit ("As", "Td").
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// A 52-card deck with a monotonically advancing deal cursor. Cards dealt
/// since the last shuffle are never handed out again.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
    next: usize,
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = [Card {
            rank: Rank::Two,
            suit: Suit::Clubs,
        }; DECK_SIZE];
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            for (j, rank) in Rank::ALL.into_iter().enumerate() {
                cards[13 * i + j] = Card { rank, suit };
            }
        }
        Self { cards, next: 0 }
    }
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniformly permute the full deck and rewind the cursor. The caller
    /// supplies the RNG, which keeps seeding in the driver's hands.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.next = 0;
    }

    /// Deal the two hole cards for one player.
    pub fn deal_hole(&mut self) -> Result<[Card; HOLE_SIZE], DealError> {
        self.deal::<HOLE_SIZE>()
    }

    /// Deal the five community cards.
    pub fn deal_board(&mut self) -> Result<[Card; BOARD_SIZE], DealError> {
        self.deal::<BOARD_SIZE>()
    }

    /// Cards not yet dealt since the last shuffle.
    #[must_use]
    pub fn remaining(&self) -> usize {
        DECK_SIZE - self.next
    }

    fn deal<const N: usize>(&mut self) -> Result<[Card; N], DealError> {
        if self.next == DECK_SIZE {
            return Err(DealError::OutOfCards);
        }
        if self.next + N > DECK_SIZE {
            return Err(DealError::InvalidAmount);
        }
        let mut out = [self.cards[self.next]; N];
        out.copy_from_slice(&self.cards[self.next..self.next + N]);
        self.next += N;
        Ok(out)
    }
}

impl fmt::Display for Deck {
    /// Renders the undealt suffix of the deck, space-separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards[self.next..].iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::BTreeSet;

    #[test]
    fn card_renders_rank_then_suit() {
        let card = Card {
            rank: Rank::Ace,
            suit: Suit::Spades,
        };
        assert_eq!(card.to_string(), "As");
        let card = Card {
            rank: Rank::Ten,
            suit: Suit::Diamonds,
        };
        assert_eq!(card.to_string(), "Td");
        let card = Card {
            rank: Rank::Two,
            suit: Suit::Clubs,
        };
        assert_eq!(card.to_string(), "2c");
    }

    #[test]
    fn rank_values_span_two_through_ace() {
        assert_eq!(Rank::Two.value(), 2);
        assert_eq!(Rank::Nine.value(), 9);
        assert_eq!(Rank::Ace.value(), 14);
    }

    #[test]
    fn fresh_deck_holds_every_card_once() {
        let deck = Deck::new();
        let rendered: BTreeSet<String> = deck.to_string().split(' ').map(String::from).collect();
        assert_eq!(rendered.len(), DECK_SIZE);
    }

    #[test]
    fn shuffle_rewinds_and_preserves_the_multiset() {
        let mut deck = Deck::new();
        deck.deal_hole().unwrap();
        assert_eq!(deck.remaining(), DECK_SIZE - HOLE_SIZE);

        let mut rng = StdRng::seed_from_u64(7);
        deck.shuffle(&mut rng);
        assert_eq!(deck.remaining(), DECK_SIZE);
        let rendered: BTreeSet<String> = deck.to_string().split(' ').map(String::from).collect();
        assert_eq!(rendered.len(), DECK_SIZE);
    }

    #[test]
    fn same_seed_deals_the_same_cards() {
        let mut a = Deck::new();
        let mut b = Deck::new();
        a.shuffle(&mut StdRng::seed_from_u64(42));
        b.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.deal_hole().unwrap(), b.deal_hole().unwrap());
        assert_eq!(a.deal_board().unwrap(), b.deal_board().unwrap());
    }

    #[test]
    fn deal_is_sequential_and_disjoint() {
        let mut deck = Deck::new();
        deck.shuffle(&mut StdRng::seed_from_u64(3));
        let mut seen = BTreeSet::new();
        for _ in 0..23 {
            for card in deck.deal_hole().unwrap() {
                assert!(seen.insert(card.to_string()));
            }
        }
        for card in deck.deal_board().unwrap() {
            assert!(seen.insert(card.to_string()));
        }
        assert_eq!(seen.len(), 51);
    }

    #[test]
    fn deal_fails_when_short_or_empty() {
        let mut deck = Deck::new();
        for _ in 0..25 {
            deck.deal_hole().unwrap();
        }
        // 50 dealt: a board would need 5 of the 2 left.
        assert_eq!(deck.deal_board(), Err(DealError::InvalidAmount));
        deck.deal_hole().unwrap();
        assert_eq!(deck.deal_hole(), Err(DealError::OutOfCards));
        assert_eq!(deck.deal_board(), Err(DealError::OutOfCards));
    }
}
