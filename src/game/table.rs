//! The per-table engine. One `Table` owns the seat roster, the deck, an
//! injected RNG, and at most one live hand. Every public operation is a
//! pure request: it either applies fully and returns the events observers
//! should see, in order, or returns a typed error and changes nothing.
//!
//! The driver must serialize calls; nothing here blocks, suspends, or
//! keeps timers.

use log::debug;
use rand::Rng;
use std::collections::{HashMap, VecDeque};

use super::constants::{BIG_BLIND, BOARD_SIZE, FLOP_SIZE, HOLE_SIZE, MAX_PLAYERS, SMALL_BLIND};
use super::entities::{Chips, Deck, PlayerId, TableId};
use super::errors::{GameError, PlayerMgmtError};
use super::events::{Action, Event};
use super::functional::{rank_best_of_seven, HandRank};
use super::hand::{HandState, Phase, PlayerState};
use super::players::PlayerManager;

/// One layer of the pot, with the players who can win it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SidePot {
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
}

/// An authoritative hold'em table.
#[derive(Debug)]
pub struct Table<R: Rng> {
    id: TableId,
    rng: R,
    deck: Deck,
    players: PlayerManager,
    /// 0 means the button has not been placed yet.
    button: PlayerId,
    hand: Option<HandState>,
}

impl<R: Rng> Table<R> {
    #[must_use]
    pub fn new(id: TableId, rng: R) -> Self {
        Self {
            id,
            rng,
            deck: Deck::new(),
            players: PlayerManager::new(),
            button: 0,
            hand: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    #[must_use]
    pub fn players(&self) -> &PlayerManager {
        &self.players
    }

    #[must_use]
    pub fn hand(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    #[must_use]
    pub fn has_open_seat(&self) -> bool {
        self.players.seated_count() < MAX_PLAYERS
    }

    #[must_use]
    pub fn hand_in_progress(&self) -> bool {
        self.hand.is_some()
    }

    #[must_use]
    pub fn can_start_hand(&self) -> bool {
        !self.hand_in_progress() && self.players.seated_count() >= 2
    }

    /// Admit a player into the holding pen.
    pub fn add_player(&mut self, id: PlayerId) -> Result<Event, PlayerMgmtError> {
        self.players.add_player(id)?;
        Ok(Event::PlayerAdded { who: id })
    }

    /// Stage a player's departure. Mid-hand they stay a participant but are
    /// marked `Left`, dropped from the turn queue, and, if they held the
    /// action, the turn advances.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Vec<Event>, PlayerMgmtError> {
        self.players.remove_player(id)?;
        let mut events = vec![Event::PlayerRemoved { who: id }];
        if let Some(hand) = self.hand.as_mut() {
            hand.player_state.insert(id, PlayerState::Left);
            let had_action = hand.turn_queue.front() == Some(&id);
            hand.turn_queue.retain(|&queued| queued != id);
            if had_action {
                hand.prune_turn_queue();
                if let Some(&next) = hand.turn_queue.front() {
                    events.push(Event::TurnAdvanced { next });
                }
            }
        }
        Ok(events)
    }

    /// Start a hand: settle the roster, advance the button, deal, post
    /// blinds, and open the preflop betting round.
    pub fn handle_new_hand(&mut self) -> Result<Vec<Event>, GameError> {
        if self.hand_in_progress() {
            return Err(GameError::HandInPlay);
        }
        if self.players.seated_count() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        self.players.finalize_leavers();
        self.players.seat_held_players();

        self.button = match self.button {
            0 => self.first_player()?,
            prev => match self.players.next_player(prev) {
                Ok(next) => next,
                // The previous button holder is gone; restart the rotation.
                Err(PlayerMgmtError::InvalidId) => self.first_player()?,
                Err(_) => return Err(GameError::NotEnoughPlayers),
            },
        };
        let participants = self.players.active_cycle_from(self.button);
        if participants.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }

        self.deck.shuffle(&mut self.rng);
        let mut holes = HashMap::with_capacity(participants.len());
        for &p in &participants {
            let hole = self
                .deck
                .deal_hole()
                .expect("a fresh deck covers a full table");
            holes.insert(p, hole);
        }
        let board = self
            .deck
            .deal_board()
            .expect("a fresh deck covers a full table");
        let mut hand = HandState::new(self.button, participants, holes, board);

        let mut events = vec![
            Event::HandStarted,
            Event::PhaseAdvanced {
                next: Phase::Preflop,
            },
        ];
        for &p in &hand.participants {
            events.push(Event::DealtHole {
                who: p,
                hole: hand.player_holes[&p],
            });
        }

        // Heads-up, the button posts the small blind and acts first;
        // otherwise the blinds sit left of the button and action starts
        // left of the big blind.
        let n = hand.participants.len();
        let (sb, bb, first) = if n == 2 {
            (hand.participants[0], hand.participants[1], hand.participants[0])
        } else {
            (
                hand.participants[1],
                hand.participants[2],
                hand.participants[3 % n],
            )
        };
        self.post_blind(&mut hand, sb, SMALL_BLIND, &mut events);
        self.post_blind(&mut hand, bb, BIG_BLIND, &mut events);
        hand.turn_queue = hand.build_turn_queue(first);
        hand.prune_turn_queue();

        debug!(
            "table {}: hand started, button {}, {} participants",
            self.id,
            self.button,
            hand.participants.len()
        );
        self.hand = Some(hand);

        let nobody_can_act = self
            .hand
            .as_ref()
            .is_some_and(|h| h.turn_queue.is_empty());
        if nobody_can_act {
            // Blinds put everyone all-in: run the board out and settle.
            self.reveal_remaining_board(&mut events);
            self.distribute_side_pots(&mut events);
            self.hand = None;
            return Ok(events);
        }
        if let Some(&next) = self.hand.as_ref().and_then(|h| h.turn_queue.front()) {
            events.push(Event::TurnAdvanced { next });
        }
        Ok(events)
    }

    /// Apply one player action and everything that follows from it: turn
    /// advancement, street changes, all-in run-outs, showdown payouts.
    pub fn on_action(&mut self, action: Action) -> Result<Vec<Event>, GameError> {
        let id = action.id();
        {
            let Some(hand) = self.hand.as_mut() else {
                return Err(GameError::InvalidAction);
            };
            if !self.players.is_sat(id) {
                return Err(GameError::NoSuchPlayer);
            }
            hand.prune_turn_queue();
            if hand.turn_queue.front() != Some(&id) {
                return Err(GameError::OutOfTurn);
            }
        }
        let mut events = match action {
            Action::Fold { id } => self.handle_fold(id),
            Action::Bet { id, amount } => self.handle_bet(id, amount)?,
            Action::Timeout { id } => self.handle_timeout(id)?,
        };
        self.settle_after_action(&mut events)?;
        Ok(events)
    }

    /// Advance to the next street: reset per-street bets, reveal the board
    /// cards, and rebuild the queue from the first active player after the
    /// button. Normally internal; exposed so tests can drive streets.
    pub fn handle_new_street(&mut self) -> Result<Vec<Event>, GameError> {
        let hand = self.hand.as_mut().ok_or(GameError::InvalidAction)?;
        let next = hand.phase.next_street().ok_or(GameError::InvalidAction)?;
        hand.phase = next;
        let mut events = vec![Event::PhaseAdvanced { next }];
        push_reveal(hand, next, &mut events);

        hand.reset_street_bets();
        hand.turn_queue = match hand.first_active_after(hand.button) {
            Some(start) => hand.build_turn_queue(start),
            None => VecDeque::new(),
        };
        hand.prune_turn_queue();
        if let Some(&next_up) = hand.turn_queue.front() {
            events.push(Event::TurnAdvanced { next: next_up });
        }
        Ok(events)
    }

    /// A check is a bet of 0; a call matches the street's bet; a raise must
    /// clear the minimum raise increment. `amount` is the delta the player
    /// adds this street, clamped to their stack (clamping to everything
    /// they have makes them all-in, and an all-in may legally fall short).
    fn handle_bet(&mut self, id: PlayerId, amount: Chips) -> Result<Vec<Event>, GameError> {
        let chips = self.players.get_chips(id);
        let hand = self.hand.as_mut().ok_or(GameError::InvalidAction)?;
        let previous = hand.previous_bet;
        let current = hand.active_bets.get(&id).copied().unwrap_or(0);

        let mut bet = amount;
        let mut is_all_in = false;
        if bet >= chips && bet > 0 {
            bet = chips;
            is_all_in = true;
        }
        let total = current + bet;
        if bet == 0 {
            if current < previous {
                return Err(GameError::BetTooLow);
            }
        } else {
            if total < previous && !is_all_in {
                return Err(GameError::BetTooLow);
            }
            if total > previous && total - previous < hand.min_raise && !is_all_in {
                return Err(GameError::BetTooLow);
            }
        }
        let is_raise = total > previous && total - previous >= hand.min_raise;

        hand.turn_queue.pop_front();
        self.players.place_bet(id, bet);
        *hand.committed.entry(id).or_insert(0) += bet;
        hand.active_bets.insert(id, total);
        hand.previous_bet = previous.max(total);
        if is_all_in {
            hand.player_state.insert(id, PlayerState::AllIn);
        }
        if is_raise {
            hand.min_raise = total - previous;
            // A raise reopens the action: fresh queue clockwise of the
            // raiser, actives only, raiser excluded.
            hand.turn_queue = hand
                .build_turn_queue(id)
                .into_iter()
                .filter(|&x| x != id)
                .collect();
        }
        Ok(vec![Event::BetPlaced { who: id, amount: bet }])
    }

    fn handle_fold(&mut self, id: PlayerId) -> Vec<Event> {
        if let Some(hand) = self.hand.as_mut() {
            hand.turn_queue.pop_front();
            hand.player_state.insert(id, PlayerState::Folded);
            hand.active_bets.remove(&id);
        }
        Vec::new()
    }

    /// A timed-out player checks if they are even with the street, folds
    /// if they are behind.
    fn handle_timeout(&mut self, id: PlayerId) -> Result<Vec<Event>, GameError> {
        let behind = self
            .hand
            .as_ref()
            .is_some_and(|h| h.active_bets.get(&id).copied().unwrap_or(0) < h.previous_bet);
        if behind {
            Ok(self.handle_fold(id))
        } else {
            self.handle_bet(id, 0)
        }
    }

    /// The epilogue after any accepted action: end the hand if one player
    /// remains, run out the board if nobody can act, advance the street
    /// when the round closes, otherwise pass the action along.
    fn settle_after_action(&mut self, events: &mut Vec<Event>) -> Result<(), GameError> {
        let (sole_survivor, queue_empty, any_active, at_river, next_up) = {
            let hand = self.hand.as_mut().ok_or(GameError::InvalidAction)?;
            hand.prune_turn_queue();
            let remaining = hand.remaining_in_hand();
            let sole = (remaining.len() == 1).then(|| remaining[0]);
            let any_active = remaining.iter().any(|&p| hand.is_active(p));
            (
                sole,
                hand.turn_queue.is_empty(),
                any_active,
                hand.phase == Phase::River,
                hand.turn_queue.front().copied(),
            )
        };

        if let Some(winner) = sole_survivor {
            let pot = self.hand.as_ref().map_or(0, HandState::total_committed);
            self.award_chips(winner, pot, events);
            self.hand = None;
            return Ok(());
        }
        if queue_empty {
            if !any_active {
                self.reveal_remaining_board(events);
                self.distribute_side_pots(events);
                self.hand = None;
            } else if at_river {
                self.distribute_side_pots(events);
                self.hand = None;
            } else {
                events.extend(self.handle_new_street()?);
            }
        } else if let Some(next) = next_up {
            events.push(Event::TurnAdvanced { next });
        }
        Ok(())
    }

    fn first_player(&self) -> Result<PlayerId, GameError> {
        self.players
            .get_first_player()
            .map_err(|_| GameError::NotEnoughPlayers)
    }

    /// Post a forced blind, clamped to the player's stack. A short post
    /// puts the player all-in; an empty stack posts nothing.
    fn post_blind(
        &mut self,
        hand: &mut HandState,
        id: PlayerId,
        amount: Chips,
        events: &mut Vec<Event>,
    ) {
        let chips = self.players.get_chips(id);
        if chips == 0 {
            hand.player_state.insert(id, PlayerState::AllIn);
            return;
        }
        let blind = amount.min(chips);
        if blind == chips {
            hand.player_state.insert(id, PlayerState::AllIn);
        }
        self.players.place_bet(id, blind);
        *hand.committed.entry(id).or_insert(0) += blind;
        let total = {
            let street = hand.active_bets.entry(id).or_insert(0);
            *street += blind;
            *street
        };
        hand.previous_bet = hand.previous_bet.max(total);
        events.push(Event::BetPlaced { who: id, amount: blind });
    }

    /// Reveal every street still face-down, through the river.
    fn reveal_remaining_board(&mut self, events: &mut Vec<Event>) {
        let Some(hand) = self.hand.as_mut() else {
            return;
        };
        while let Some(next) = hand.phase.next_street() {
            hand.phase = next;
            events.push(Event::PhaseAdvanced { next });
            push_reveal(hand, next, events);
        }
    }

    /// Showdown: pay every pot layer out to the best eligible hands.
    fn distribute_side_pots(&mut self, events: &mut Vec<Event>) {
        let payouts = match self.hand.as_ref() {
            Some(hand) => {
                let pots = build_side_pots(hand);
                debug!("table {}: settling {} pot layers", self.id, pots.len());
                pot_payouts(hand, &pots)
            }
            None => Vec::new(),
        };
        for (id, amount) in payouts {
            self.award_chips(id, amount, events);
        }
    }

    fn award_chips(&mut self, id: PlayerId, amount: Chips, events: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        self.players.award_chips(id, amount);
        events.push(Event::WonPot { who: id, amount });
    }
}

/// Layer the pot by committed levels. Folded chips stay in the layers they
/// reached, but only active or all-in contributors at a layer's level or
/// higher can win it.
fn build_side_pots(hand: &HandState) -> Vec<SidePot> {
    let mut contributions: Vec<(PlayerId, Chips)> = hand
        .committed
        .iter()
        .filter(|&(_, &amount)| amount > 0)
        .map(|(&id, &amount)| (id, amount))
        .collect();
    contributions.sort_unstable_by_key(|&(id, amount)| (amount, id));

    let mut pots = Vec::new();
    let mut remaining: Vec<PlayerId> = contributions.iter().map(|&(id, _)| id).collect();
    let mut previous: Chips = 0;
    let mut idx = 0;
    while idx < contributions.len() {
        let level = contributions[idx].1;
        if level > previous {
            let layer = (level - previous) * remaining.len() as Chips;
            let eligible: Vec<PlayerId> = remaining
                .iter()
                .copied()
                .filter(|&id| {
                    matches!(
                        hand.player_state.get(&id),
                        Some(PlayerState::Active | PlayerState::AllIn)
                    )
                })
                .collect();
            if layer > 0 {
                pots.push(SidePot {
                    amount: layer,
                    eligible,
                });
            }
            previous = level;
        }
        while idx < contributions.len() && contributions[idx].1 == level {
            let capped = contributions[idx].0;
            remaining.retain(|&id| id != capped);
            idx += 1;
        }
    }
    pots
}

/// Resolve each pot layer: the smallest hand rank among its eligible
/// players wins; ties split evenly with odd chips handed out one at a time
/// in clockwise-from-button order.
fn pot_payouts(hand: &HandState, pots: &[SidePot]) -> Vec<(PlayerId, Chips)> {
    let mut payouts = Vec::new();
    for pot in pots {
        if pot.eligible.is_empty() {
            continue;
        }
        let mut best: Option<HandRank> = None;
        let mut winners: Vec<PlayerId> = Vec::new();
        for &id in &pot.eligible {
            let rank = hand_rank(hand, id);
            match best {
                Some(b) if rank > b => {}
                Some(b) if rank == b => winners.push(id),
                _ => {
                    best = Some(rank);
                    winners.clear();
                    winners.push(id);
                }
            }
        }
        let ordered: Vec<PlayerId> = hand
            .participants
            .iter()
            .copied()
            .filter(|id| winners.contains(id))
            .collect();
        let share = pot.amount / ordered.len() as Chips;
        let mut remainder = pot.amount % ordered.len() as Chips;
        for id in ordered {
            let mut payout = share;
            if remainder > 0 {
                payout += 1;
                remainder -= 1;
            }
            payouts.push((id, payout));
        }
    }
    payouts
}

/// Rank a participant's best five from their hole cards and the board.
fn hand_rank(hand: &HandState, id: PlayerId) -> HandRank {
    let hole = hand.player_holes[&id];
    let mut cards = [hole[0]; HOLE_SIZE + BOARD_SIZE];
    cards[..HOLE_SIZE].copy_from_slice(&hole);
    cards[HOLE_SIZE..].copy_from_slice(&hand.table_cards);
    rank_best_of_seven(&cards)
}

/// Append the board cards a street reveals.
fn push_reveal(hand: &HandState, next: Phase, events: &mut Vec<Event>) {
    match next {
        Phase::Flop => events.push(Event::DealtFlop {
            cards: [
                hand.table_cards[0],
                hand.table_cards[1],
                hand.table_cards[2],
            ],
        }),
        Phase::Turn => events.push(Event::DealtStreet {
            card: hand.table_cards[FLOP_SIZE],
        }),
        Phase::River => events.push(Event::DealtStreet {
            card: hand.table_cards[FLOP_SIZE + 1],
        }),
        Phase::Preflop | Phase::Showdown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> Table<StdRng> {
        Table::new(1, StdRng::seed_from_u64(0))
    }

    #[test]
    fn starting_requires_two_players() {
        let mut table = table();
        table.add_player(1).unwrap();
        assert_eq!(table.handle_new_hand(), Err(GameError::NotEnoughPlayers));
        assert!(!table.can_start_hand());
    }

    #[test]
    fn starting_twice_is_rejected() {
        let mut table = table();
        table.add_player(1).unwrap();
        table.add_player(2).unwrap();
        table.handle_new_hand().unwrap();
        assert_eq!(table.handle_new_hand(), Err(GameError::HandInPlay));
    }

    #[test]
    fn actions_outside_a_hand_are_invalid() {
        let mut table = table();
        table.add_player(1).unwrap();
        table.add_player(2).unwrap();
        assert_eq!(
            table.on_action(Action::Bet { id: 1, amount: 10 }),
            Err(GameError::InvalidAction)
        );
    }

    #[test]
    fn unknown_actors_are_rejected() {
        let mut table = table();
        table.add_player(1).unwrap();
        table.add_player(2).unwrap();
        table.handle_new_hand().unwrap();
        assert_eq!(
            table.on_action(Action::Bet { id: 99, amount: 10 }),
            Err(GameError::NoSuchPlayer)
        );
    }

    #[test]
    fn acting_out_of_turn_is_rejected() {
        let mut table = table();
        table.add_player(1).unwrap();
        table.add_player(2).unwrap();
        table.handle_new_hand().unwrap();
        // Heads-up preflop action is on the small blind (the button).
        assert_eq!(
            table.on_action(Action::Bet { id: 2, amount: 0 }),
            Err(GameError::OutOfTurn)
        );
    }

    #[test]
    fn street_advance_outside_a_hand_is_invalid() {
        let mut table = table();
        assert_eq!(table.handle_new_street(), Err(GameError::InvalidAction));
    }

    mod side_pots {
        use super::super::*;
        use crate::game::entities::{Card, Rank, Suit};

        fn card(code: &str) -> Card {
            let bytes = code.as_bytes();
            let rank = match bytes[0] {
                b'2' => Rank::Two,
                b'3' => Rank::Three,
                b'7' => Rank::Seven,
                b'8' => Rank::Eight,
                b'9' => Rank::Nine,
                b'T' => Rank::Ten,
                b'J' => Rank::Jack,
                b'Q' => Rank::Queen,
                b'K' => Rank::King,
                b'A' => Rank::Ace,
                other => panic!("bad rank {other}"),
            };
            let suit = match bytes[1] {
                b'c' => Suit::Clubs,
                b'd' => Suit::Diamonds,
                b'h' => Suit::Hearts,
                b's' => Suit::Spades,
                other => panic!("bad suit {other}"),
            };
            Card { rank, suit }
        }

        /// A hand over a board that plays for everyone, so every showdown
        /// ties unless the test says otherwise.
        fn hand_on_royal_board(participants: Vec<PlayerId>) -> HandState {
            let board = [card("As"), card("Ks"), card("Qs"), card("Js"), card("Ts")];
            let holes = [
                [card("2c"), card("3c")],
                [card("2d"), card("3d")],
                [card("2h"), card("3h")],
            ];
            let player_holes = participants
                .iter()
                .zip(holes)
                .map(|(&id, hole)| (id, hole))
                .collect();
            HandState::new(participants[0], participants, player_holes, board)
        }

        #[test]
        fn layers_stack_by_committed_level() {
            let mut hand = hand_on_royal_board(vec![1, 2, 3]);
            hand.committed.insert(1, 10);
            hand.committed.insert(2, 60);
            hand.committed.insert(3, 60);
            hand.player_state.insert(1, PlayerState::Folded);
            hand.player_state.insert(2, PlayerState::AllIn);

            let pots = build_side_pots(&hand);
            assert_eq!(
                pots,
                vec![
                    SidePot {
                        amount: 30,
                        eligible: vec![2, 3],
                    },
                    SidePot {
                        amount: 100,
                        eligible: vec![2, 3],
                    },
                ]
            );
            assert_eq!(
                pots.iter().map(|p| p.amount).sum::<Chips>(),
                hand.total_committed()
            );
        }

        #[test]
        fn odd_chips_go_clockwise_from_the_button() {
            let mut hand = hand_on_royal_board(vec![1, 2, 3]);
            hand.committed.insert(1, 50);
            hand.committed.insert(2, 50);
            hand.committed.insert(3, 5);
            hand.player_state.insert(3, PlayerState::Folded);

            let pots = build_side_pots(&hand);
            // The 15-chip layer splits 8/7 with the odd chip nearest the
            // button; the 90-chip layer splits clean.
            let payouts = pot_payouts(&hand, &pots);
            assert_eq!(payouts, vec![(1, 8), (2, 7), (1, 45), (2, 45)]);
        }

        #[test]
        fn folded_overage_pays_nobody() {
            let mut hand = hand_on_royal_board(vec![1, 2, 3]);
            hand.committed.insert(1, 100);
            hand.committed.insert(2, 60);
            hand.committed.insert(3, 60);
            hand.player_state.insert(1, PlayerState::Folded);
            hand.player_state.insert(2, PlayerState::AllIn);

            let pots = build_side_pots(&hand);
            let payouts = pot_payouts(&hand, &pots);
            assert!(payouts.iter().all(|&(id, _)| id != 1));
            assert_eq!(payouts.iter().map(|&(_, amount)| amount).sum::<Chips>(), 180);
        }

        #[test]
        fn the_best_hand_takes_the_whole_layer() {
            let board = [card("2s"), card("3s"), card("7h"), card("8d"), card("9c")];
            let player_holes = [(1, [card("Ac"), card("Ad")]), (2, [card("Kc"), card("Kd")])]
                .into_iter()
                .collect();
            let mut hand = HandState::new(1, vec![1, 2], player_holes, board);
            hand.committed.insert(1, 50);
            hand.committed.insert(2, 50);

            let pots = build_side_pots(&hand);
            assert_eq!(pot_payouts(&hand, &pots), vec![(1, 100)]);
        }
    }
}
