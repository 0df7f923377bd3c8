//! Fixed table constants. None of these are runtime-tunable.

use super::entities::Chips;

/// Number of seats at a table.
pub const MAX_PLAYERS: usize = 10;

/// Chips credited to a player when they take their seat.
pub const BUY_IN: Chips = 1000;

/// Forced bet posted by the player left of the button.
pub const SMALL_BLIND: Chips = 5;

/// Forced bet posted left of the small blind; also the opening minimum raise.
pub const BIG_BLIND: Chips = 10;

/// Hole cards dealt to each participant.
pub const HOLE_SIZE: usize = 2;

/// Community cards dealt per hand.
pub const BOARD_SIZE: usize = 5;

/// Community cards revealed on the flop.
pub const FLOP_SIZE: usize = 3;

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;
