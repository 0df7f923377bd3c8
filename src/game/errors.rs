//! Typed errors surfaced by the engine. The engine recovers nothing: every
//! validation failure comes back as one of these and leaves state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from dealing off the deck.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum DealError {
    /// The cursor is at the end of the deck.
    #[error("no cards left in the deck")]
    OutOfCards,
    /// Fewer cards remain than were requested.
    #[error("not enough cards left for that deal")]
    InvalidAmount,
}

/// Errors from seat and roster management.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum PlayerMgmtError {
    #[error("no open seats left")]
    NotEnoughSeats,
    #[error("unknown or duplicate player id")]
    InvalidId,
    #[error("player not found")]
    PlayerNotFound,
    #[error("no players seated")]
    NoPlayers,
}

/// Errors from hand lifecycle and action validation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("action not valid right now")]
    InvalidAction,
    #[error("a hand is already in play")]
    HandInPlay,
    #[error("need 2+ players")]
    NotEnoughPlayers,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("bet below the amount to match")]
    BetTooLow,
    #[error("not your turn")]
    OutOfTurn,
    #[error("no such player at this table")]
    NoSuchPlayer,
}

/// Boundary errors owned by the driver, carried here so the whole error
/// surface serializes as one union.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ServerError {
    #[error("unspecified server error")]
    Unspecified,
    #[error("too many clients")]
    TooManyClients,
    #[error("all tables are full")]
    AllTablesFull,
    #[error("illegal action")]
    IllegalAction,
}

/// Union of every error kind a driver can see.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum Error {
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    PlayerMgmt(#[from] PlayerMgmtError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_wraps_each_kind() {
        let err: Error = GameError::OutOfTurn.into();
        assert_eq!(err, Error::Game(GameError::OutOfTurn));
        let err: Error = PlayerMgmtError::NotEnoughSeats.into();
        assert_eq!(err.to_string(), "no open seats left");
        let err: Error = ServerError::AllTablesFull.into();
        assert_eq!(err.to_string(), "all tables are full");
    }
}
