//! The poker engine: cards and deck, hand evaluation, seat management,
//! per-hand state, and the table state machine that ties them together.
//!
//! Everything in here is synchronous and single-threaded per table. The
//! driver submits one [`events::Action`] at a time and broadcasts the
//! returned [`events::Event`] sequence.

pub mod constants;
pub mod entities;
pub mod errors;
pub mod events;
pub mod functional;
pub mod hand;
pub mod players;
pub mod table;

pub use entities::{Card, Chips, Deck, PlayerId, Rank, Suit, TableId};
pub use errors::{Error, GameError, PlayerMgmtError, ServerError};
pub use events::{Action, Event};
pub use hand::{HandState, Phase, PlayerState};
pub use players::{Player, PlayerManager};
pub use table::{SidePot, Table};
