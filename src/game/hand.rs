//! Per-hand state: phase, participants, bets, holes, board, and the turn
//! queue. Created at hand start, discarded atomically at hand end. The
//! logic here is limited to queue bookkeeping; the engine drives it.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use super::constants::{BIG_BLIND, BOARD_SIZE, HOLE_SIZE};
use super::entities::{Card, Chips, PlayerId};

/// Streets of a hand, plus the terminal showdown.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// The next street, if there is one to deal.
    #[must_use]
    pub fn next_street(self) -> Option<Phase> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River | Self::Showdown => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// Where a participant stands within the current hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Still has chips behind and decisions to make.
    Active,
    /// Whole stack committed; rides along to showdown.
    AllIn,
    Folded,
    /// Removed mid-hand; stays a participant so committed chips keep
    /// their attribution, but never acts again.
    Left,
}

/// Everything one hand needs to run, snapshot at the deal.
#[derive(Clone, Debug)]
pub struct HandState {
    pub phase: Phase,
    /// Dealer for this hand.
    pub button: PlayerId,
    /// Clockwise order starting at the button; never mutated mid-hand.
    pub participants: Vec<PlayerId>,
    pub player_state: HashMap<PlayerId, PlayerState>,
    pub player_holes: HashMap<PlayerId, [Card; HOLE_SIZE]>,
    /// All five community cards, dealt up front and revealed per street.
    pub table_cards: [Card; BOARD_SIZE],
    /// Chips put in on the current street, per player.
    pub active_bets: HashMap<PlayerId, Chips>,
    /// Chips put in across the whole hand, per player; feeds the side pots.
    pub committed: HashMap<PlayerId, Chips>,
    /// The current street's bet to match.
    pub previous_bet: Chips,
    /// Minimum legal raise increment; grows to the size of the last full
    /// raise.
    pub min_raise: Chips,
    /// Players whose action is pending on this street.
    pub turn_queue: VecDeque<PlayerId>,
}

impl HandState {
    #[must_use]
    pub fn new(
        button: PlayerId,
        participants: Vec<PlayerId>,
        player_holes: HashMap<PlayerId, [Card; HOLE_SIZE]>,
        table_cards: [Card; BOARD_SIZE],
    ) -> Self {
        let mut player_state = HashMap::with_capacity(participants.len());
        let mut active_bets = HashMap::with_capacity(participants.len());
        let mut committed = HashMap::with_capacity(participants.len());
        for &id in &participants {
            player_state.insert(id, PlayerState::Active);
            active_bets.insert(id, 0);
            committed.insert(id, 0);
        }
        Self {
            phase: Phase::Preflop,
            button,
            participants,
            player_state,
            player_holes,
            table_cards,
            active_bets,
            committed,
            previous_bet: 0,
            min_raise: BIG_BLIND,
            turn_queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn is_active(&self, id: PlayerId) -> bool {
        self.player_state.get(&id) == Some(&PlayerState::Active)
    }

    /// Participants still contesting the pot: active or all-in.
    #[must_use]
    pub fn remaining_in_hand(&self) -> Vec<PlayerId> {
        self.participants
            .iter()
            .copied()
            .filter(|&id| {
                matches!(
                    self.player_state.get(&id),
                    Some(PlayerState::Active | PlayerState::AllIn)
                )
            })
            .collect()
    }

    /// The clockwise run of active participants beginning at `start`.
    /// Empty if `start` is not a participant.
    #[must_use]
    pub fn build_turn_queue(&self, start: PlayerId) -> VecDeque<PlayerId> {
        let Some(offset) = self.participants.iter().position(|&id| id == start) else {
            return VecDeque::new();
        };
        (0..self.participants.len())
            .map(|i| self.participants[(offset + i) % self.participants.len()])
            .filter(|&id| self.is_active(id))
            .collect()
    }

    /// The first active participant strictly after `start`, clockwise.
    #[must_use]
    pub fn first_active_after(&self, start: PlayerId) -> Option<PlayerId> {
        let offset = self.participants.iter().position(|&id| id == start)?;
        (1..=self.participants.len())
            .map(|i| self.participants[(offset + i) % self.participants.len()])
            .find(|&id| self.is_active(id))
    }

    /// Drop queue heads that can no longer act.
    pub fn prune_turn_queue(&mut self) {
        while let Some(&front) = self.turn_queue.front() {
            if self.is_active(front) {
                break;
            }
            self.turn_queue.pop_front();
        }
    }

    /// Zero the per-street bets and restore the street's raise floor.
    pub fn reset_street_bets(&mut self) {
        for amount in self.active_bets.values_mut() {
            *amount = 0;
        }
        self.previous_bet = 0;
        self.min_raise = BIG_BLIND;
    }

    /// The pot: everything committed this hand.
    #[must_use]
    pub fn total_committed(&self) -> Chips {
        self.committed.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Rank, Suit};

    fn board() -> [Card; BOARD_SIZE] {
        let mut cards = [Card {
            rank: Rank::Two,
            suit: Suit::Clubs,
        }; BOARD_SIZE];
        for (i, rank) in [Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven]
            .into_iter()
            .enumerate()
        {
            cards[i] = Card {
                rank,
                suit: Suit::Diamonds,
            };
        }
        cards
    }

    fn hand(participants: Vec<PlayerId>) -> HandState {
        HandState::new(participants[0], participants, HashMap::new(), board())
    }

    #[test]
    fn streets_progress_in_order() {
        assert_eq!(Phase::Preflop.next_street(), Some(Phase::Flop));
        assert_eq!(Phase::Flop.next_street(), Some(Phase::Turn));
        assert_eq!(Phase::Turn.next_street(), Some(Phase::River));
        assert_eq!(Phase::River.next_street(), None);
        assert_eq!(Phase::Showdown.next_street(), None);
    }

    #[test]
    fn new_hand_marks_everyone_active_with_zero_bets() {
        let hand = hand(vec![1, 2, 3]);
        assert!(hand.is_active(1) && hand.is_active(2) && hand.is_active(3));
        assert_eq!(hand.total_committed(), 0);
        assert_eq!(hand.min_raise, BIG_BLIND);
        assert_eq!(hand.remaining_in_hand(), vec![1, 2, 3]);
    }

    #[test]
    fn queue_building_wraps_and_filters() {
        let mut hand = hand(vec![1, 2, 3, 4]);
        hand.player_state.insert(3, PlayerState::Folded);
        assert_eq!(hand.build_turn_queue(2), VecDeque::from([2, 4, 1]));
        assert_eq!(hand.first_active_after(2), Some(4));
        assert_eq!(hand.first_active_after(4), Some(1));
        assert!(hand.build_turn_queue(99).is_empty());
    }

    #[test]
    fn pruning_stops_at_the_first_active_head() {
        let mut hand = hand(vec![1, 2, 3]);
        hand.turn_queue = VecDeque::from([1, 2, 3]);
        hand.player_state.insert(1, PlayerState::Folded);
        hand.player_state.insert(2, PlayerState::AllIn);
        hand.prune_turn_queue();
        assert_eq!(hand.turn_queue, VecDeque::from([3]));
    }

    #[test]
    fn street_reset_clears_bets_but_not_commitments() {
        let mut hand = hand(vec![1, 2]);
        hand.active_bets.insert(1, 50);
        hand.committed.insert(1, 50);
        hand.previous_bet = 50;
        hand.min_raise = 40;
        hand.reset_street_bets();
        assert_eq!(hand.active_bets[&1], 0);
        assert_eq!(hand.previous_bet, 0);
        assert_eq!(hand.min_raise, BIG_BLIND);
        assert_eq!(hand.total_committed(), 50);
    }
}
