//! Seat and chip accounting: a fixed ring of seats, a holding pen for
//! admitted-but-unseated players, and deferred removal so nobody vanishes
//! mid-hand.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};

use super::constants::{BUY_IN, MAX_PLAYERS};
use super::entities::{Chips, PlayerId};
use super::errors::PlayerMgmtError;

/// A seated player and their stack. Chip changes go only through
/// [`Player::place_bet`] and [`Player::add_chips`]; the balance can never
/// go negative.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    id: PlayerId,
    chips: Chips,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self { id, chips: 0 }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn chips(&self) -> Chips {
        self.chips
    }

    #[must_use]
    pub fn sufficient_chips(&self, bet: Chips) -> bool {
        bet <= self.chips
    }

    pub fn place_bet(&mut self, bet: Chips) {
        debug_assert!(bet <= self.chips, "bets must be clamped by the caller");
        self.chips = self.chips.saturating_sub(bet);
    }

    pub fn add_chips(&mut self, amount: Chips) {
        self.chips += amount;
    }
}

/// Owns the seat array and every roster transition. Seats are assigned
/// FIFO from `open_seats`; admitted players wait in `holding` until a hand
/// boundary; seated players leave through `leaving`, also at a boundary.
#[derive(Clone, Debug)]
pub struct PlayerManager {
    seats: Vec<Option<Player>>,
    open_seats: VecDeque<usize>,
    index: HashMap<PlayerId, usize>,
    holding: VecDeque<PlayerId>,
    leaving: BTreeSet<PlayerId>,
}

impl Default for PlayerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            seats: vec![None; MAX_PLAYERS],
            open_seats: (0..MAX_PLAYERS).collect(),
            index: HashMap::with_capacity(MAX_PLAYERS),
            holding: VecDeque::new(),
            leaving: BTreeSet::new(),
        }
    }

    /// Admit a player: reserve the next open seat and park them in the
    /// holding pen until the next hand starts.
    pub fn add_player(&mut self, id: PlayerId) -> Result<(), PlayerMgmtError> {
        let Some(&seat) = self.open_seats.front() else {
            return Err(PlayerMgmtError::NotEnoughSeats);
        };
        if self.index.contains_key(&id) {
            return Err(PlayerMgmtError::InvalidId);
        }
        self.open_seats.pop_front();
        self.holding.push_back(id);
        self.index.insert(id, seat);
        Ok(())
    }

    /// Stage a player to leave. A held player is dropped immediately; a
    /// seated player is only marked and keeps the seat until
    /// [`Self::finalize_leavers`]. Idempotent for already-leaving players.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), PlayerMgmtError> {
        let Some(&seat) = self.index.get(&id) else {
            return Err(PlayerMgmtError::InvalidId);
        };
        if let Some(pos) = self.holding.iter().position(|&held| held == id) {
            self.holding.remove(pos);
            self.open_seats.push_back(seat);
            self.index.remove(&id);
            return Ok(());
        }
        self.leaving.insert(id);
        Ok(())
    }

    /// Move held players into their reserved seats with a fresh buy-in.
    /// Called at the start of a hand.
    pub fn seat_held_players(&mut self) {
        while let Some(id) = self.holding.pop_front() {
            let mut player = Player::new(id);
            player.add_chips(BUY_IN);
            self.seats[self.index[&id]] = Some(player);
        }
    }

    /// Clear every staged leaver's seat and return it to the open pool.
    /// Called at a hand boundary.
    pub fn finalize_leavers(&mut self) {
        for id in std::mem::take(&mut self.leaving) {
            let seat = self.index[&id];
            self.seats[seat] = None;
            self.open_seats.push_back(seat);
            self.index.remove(&id);
        }
    }

    /// The lowest-indexed occupied seat that is not leaving.
    pub fn get_first_player(&self) -> Result<PlayerId, PlayerMgmtError> {
        self.seats
            .iter()
            .flatten()
            .map(Player::id)
            .find(|&id| !self.is_leaving(id))
            .ok_or(PlayerMgmtError::NoPlayers)
    }

    /// The next occupied, non-leaving seat clockwise from `p`, wrapping.
    /// Returns `p` itself when no other such seat exists.
    pub fn next_player(&self, p: PlayerId) -> Result<PlayerId, PlayerMgmtError> {
        let Some(&seat) = self.index.get(&p) else {
            return Err(PlayerMgmtError::InvalidId);
        };
        for step in 1..=self.seats.len() {
            let candidate = &self.seats[(seat + step) % self.seats.len()];
            if let Some(player) = candidate {
                if !self.is_leaving(player.id()) {
                    return Ok(player.id());
                }
            }
        }
        Ok(p)
    }

    /// The clockwise cycle of occupied, non-leaving seats beginning at
    /// `start`. Empty when `start` is unknown or itself leaving.
    #[must_use]
    pub fn active_cycle_from(&self, start: PlayerId) -> Vec<PlayerId> {
        let mut ordered = Vec::new();
        if !self.index.contains_key(&start) || self.is_leaving(start) {
            return ordered;
        }
        ordered.push(start);
        let mut cur = start;
        while let Ok(next) = self.next_player(cur) {
            if next == start {
                break;
            }
            ordered.push(next);
            cur = next;
        }
        ordered
    }

    /// Seats claimed so far, counting held players whose seat is reserved.
    #[must_use]
    pub fn seated_count(&self) -> usize {
        self.seats.len() - self.open_seats.len()
    }

    /// Players admitted but not yet seated.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.holding.len()
    }

    #[must_use]
    pub fn is_leaving(&self, id: PlayerId) -> bool {
        self.leaving.contains(&id)
    }

    #[must_use]
    pub fn is_sat(&self, id: PlayerId) -> bool {
        self.index
            .get(&id)
            .is_some_and(|&seat| self.seats[seat].is_some())
    }

    /// Caller is responsible for having validated `id`.
    #[must_use]
    pub fn has_enough_chips(&self, id: PlayerId, bet: Chips) -> bool {
        match self.seats[self.index[&id]] {
            Some(ref player) => player.sufficient_chips(bet),
            None => false,
        }
    }

    #[must_use]
    pub fn get_chips(&self, id: PlayerId) -> Chips {
        match self.seats[self.index[&id]] {
            Some(ref player) => player.chips(),
            None => 0,
        }
    }

    pub fn place_bet(&mut self, id: PlayerId, bet: Chips) {
        if let Some(player) = self.seats[self.index[&id]].as_mut() {
            player.place_bet(bet);
        }
    }

    pub fn award_chips(&mut self, id: PlayerId, amount: Chips) {
        if let Some(player) = self.seats[self.index[&id]].as_mut() {
            player.add_chips(amount);
        }
    }
}
