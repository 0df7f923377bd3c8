//! Pure hand-evaluation functions: best five of seven, total-order ranks.
//!
//! `HandRank` values compare with **smaller is better**, the convention the
//! showdown logic depends on. The packed integer places the category code in
//! the top nibble (straight flush = 0 through high card = 8) followed by the
//! tie-break kickers as complemented nibbles, so plain integer `<` orders
//! any two hands correctly.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::Card;

/// Hand categories in descending strength. The discriminant doubles as the
/// category code packed into a [`HandRank`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    OnePair,
    HighCard,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::StraightFlush => "straight flush",
            Self::FourOfAKind => "four of a kind",
            Self::FullHouse => "full house",
            Self::Flush => "flush",
            Self::Straight => "straight",
            Self::ThreeOfAKind => "three of a kind",
            Self::TwoPair => "two pair",
            Self::OnePair => "one pair",
            Self::HighCard => "high card",
        };
        write!(f, "{repr}")
    }
}

/// Total-order rank of a five-card hand. Smaller is strictly better.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandRank(u64);

const CATEGORY_SHIFT: u32 = 60;
const NIBBLE_BITS: u32 = 4;

impl HandRank {
    /// The category encoded in this rank.
    #[must_use]
    pub fn category(self) -> Category {
        match self.0 >> CATEGORY_SHIFT {
            0 => Category::StraightFlush,
            1 => Category::FourOfAKind,
            2 => Category::FullHouse,
            3 => Category::Flush,
            4 => Category::Straight,
            5 => Category::ThreeOfAKind,
            6 => Category::TwoPair,
            7 => Category::OnePair,
            _ => Category::HighCard,
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())
    }
}

/// Pack a category with its kickers, most significant first. Kickers are
/// complemented so that a higher card yields a smaller packed value.
fn make_rank(category: Category, kickers: &[u8]) -> HandRank {
    let mut out = (category as u64) << CATEGORY_SHIFT;
    let mut shift = CATEGORY_SHIFT - NIBBLE_BITS;
    for &k in kickers {
        out |= u64::from(14 - k) << shift;
        shift -= NIBBLE_BITS;
    }
    HandRank(out)
}

/// Rank exactly five cards.
fn rank_five(cards: [Card; 5]) -> HandRank {
    let mut values = [0u8; 5];
    for (v, card) in values.iter_mut().zip(cards.iter()) {
        *v = card.rank.value();
    }

    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let mut mask = 0u32;
    for &v in &values {
        mask |= 1 << v;
    }
    let mut straight_high = 0u8;
    for high in (5..=14u8).rev() {
        let seq = 0x1F << (high - 4);
        if mask & seq == seq {
            straight_high = high;
            break;
        }
    }
    if straight_high == 0 {
        // The wheel: A-2-3-4-5 plays as a five-high straight.
        let wheel = (1 << 14) | (1 << 5) | (1 << 4) | (1 << 3) | (1 << 2);
        if mask & wheel == wheel {
            straight_high = 5;
        }
    }

    // (count, value) groups, biggest group first, then highest value.
    let mut grouped: Vec<(u8, u8)> = Vec::with_capacity(5);
    for v in (2..=14u8).rev() {
        if counts[v as usize] > 0 {
            grouped.push((counts[v as usize], v));
        }
    }
    grouped.sort_by(|a, b| b.cmp(a));

    if straight_high > 0 && is_flush {
        return make_rank(Category::StraightFlush, &[straight_high]);
    }
    if grouped[0].0 == 4 {
        return make_rank(Category::FourOfAKind, &[grouped[0].1, grouped[1].1]);
    }
    if grouped[0].0 == 3 && grouped[1].0 == 2 {
        return make_rank(Category::FullHouse, &[grouped[0].1, grouped[1].1]);
    }
    if is_flush {
        let mut ordered = values;
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        return make_rank(Category::Flush, &ordered);
    }
    if straight_high > 0 {
        return make_rank(Category::Straight, &[straight_high]);
    }
    if grouped[0].0 == 3 {
        let kickers = [grouped[0].1, grouped[1].1, grouped[2].1];
        return make_rank(Category::ThreeOfAKind, &kickers);
    }
    if grouped[0].0 == 2 && grouped[1].0 == 2 {
        let kickers = [grouped[0].1, grouped[1].1, grouped[2].1];
        return make_rank(Category::TwoPair, &kickers);
    }
    if grouped[0].0 == 2 {
        let kickers = [grouped[0].1, grouped[1].1, grouped[2].1, grouped[3].1];
        return make_rank(Category::OnePair, &kickers);
    }

    let mut ordered = values;
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    make_rank(Category::HighCard, &ordered)
}

/// Rank the best five-card hand out of seven cards (two hole plus the
/// board), trying all C(7,5) = 21 subsets. Pure and deterministic.
#[must_use]
pub fn rank_best_of_seven(cards: &[Card; 7]) -> HandRank {
    let mut best = HandRank(u64::MAX);
    for a in 0..7 {
        for b in a + 1..7 {
            for c in b + 1..7 {
                for d in c + 1..7 {
                    for e in d + 1..7 {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        best = best.min(rank_five(five));
                    }
                }
            }
        }
    }
    best
}
