//! Property-based tests for hand evaluation: determinism, order-of-input
//! independence, and category sanity across random seven-card draws.

use holdem_engine::game::functional::{rank_best_of_seven, Category};
use holdem_engine::game::{Card, Rank, Suit};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn card_strategy() -> impl Strategy<Value = Card> {
    (0usize..13, 0usize..4).prop_map(|(rank_idx, suit_idx)| Card {
        rank: Rank::ALL[rank_idx],
        suit: Suit::ALL[suit_idx],
    })
}

fn seven_unique_cards() -> impl Strategy<Value = [Card; 7]> {
    prop::collection::vec(card_strategy(), 7)
        .prop_filter("cards must be unique", |cards| {
            cards.iter().collect::<BTreeSet<_>>().len() == cards.len()
        })
        .prop_map(|cards| <[Card; 7]>::try_from(cards).unwrap())
}

fn max_suit_count(cards: &[Card; 7]) -> usize {
    Suit::ALL
        .iter()
        .map(|&suit| cards.iter().filter(|c| c.suit == suit).count())
        .max()
        .unwrap_or(0)
}

fn max_rank_count(cards: &[Card; 7]) -> usize {
    Rank::ALL
        .iter()
        .map(|&rank| cards.iter().filter(|c| c.rank == rank).count())
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn evaluation_is_deterministic_and_reflexive(cards in seven_unique_cards()) {
        let a = rank_best_of_seven(&cards);
        let b = rank_best_of_seven(&cards);
        prop_assert_eq!(a, b);
        prop_assert!(a <= b && a >= b);
    }

    #[test]
    fn input_order_does_not_matter(cards in seven_unique_cards(), rotation in 0usize..7) {
        let baseline = rank_best_of_seven(&cards);
        let mut rotated = cards;
        rotated.rotate_left(rotation);
        prop_assert_eq!(rank_best_of_seven(&rotated), baseline);

        let mut reversed = cards;
        reversed.reverse();
        prop_assert_eq!(rank_best_of_seven(&reversed), baseline);
    }

    #[test]
    fn no_flush_without_five_suited_cards(cards in seven_unique_cards()) {
        let category = rank_best_of_seven(&cards).category();
        if max_suit_count(&cards) < 5 {
            prop_assert_ne!(category, Category::Flush);
            prop_assert_ne!(category, Category::StraightFlush);
        }
    }

    #[test]
    fn paired_boards_never_rank_below_one_pair(cards in seven_unique_cards()) {
        let category = rank_best_of_seven(&cards).category();
        if max_rank_count(&cards) >= 2 {
            // A made pair can only be promoted, never discarded.
            prop_assert_ne!(category, Category::HighCard);
        } else {
            // With no pair at all, only the unpaired categories remain.
            prop_assert!(matches!(
                category,
                Category::HighCard
                    | Category::Straight
                    | Category::Flush
                    | Category::StraightFlush
            ));
        }
    }

    #[test]
    fn ranks_give_a_total_order(a in seven_unique_cards(), b in seven_unique_cards()) {
        let ra = rank_best_of_seven(&a);
        let rb = rank_best_of_seven(&b);
        // Comparability plus symmetry of equality.
        prop_assert!(ra < rb || ra > rb || ra == rb);
        prop_assert_eq!(ra == rb, rb == ra);
    }
}
