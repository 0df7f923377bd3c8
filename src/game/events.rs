//! The engine's external vocabulary: actions submitted by the driver and
//! events emitted back for broadcast. Both are plain tagged variants; the
//! wire encoding lives outside this crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{FLOP_SIZE, HOLE_SIZE};
use super::entities::{Card, Chips, PlayerId};
use super::hand::Phase;

/// A player action. `amount` is the additional chips put in on this street,
/// not the street total.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {
    Fold { id: PlayerId },
    Bet { id: PlayerId, amount: Chips },
    Timeout { id: PlayerId },
}

impl Action {
    /// The player this action belongs to.
    #[must_use]
    pub fn id(&self) -> PlayerId {
        match self {
            Self::Fold { id } | Self::Bet { id, .. } | Self::Timeout { id } => *id,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fold { id } => write!(f, "player {id} folds"),
            Self::Bet { id, amount } => write!(f, "player {id} bets {amount}"),
            Self::Timeout { id } => write!(f, "player {id} timed out"),
        }
    }
}

/// Everything observers can learn about a table, in the order it happened.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Event {
    /// Admitted into the holding pen; seated at the next hand start.
    PlayerAdded { who: PlayerId },
    /// Staged to leave (immediate if the player was still held).
    PlayerRemoved { who: PlayerId },
    /// Emitted once per hand, before any dealing.
    HandStarted,
    PhaseAdvanced { next: Phase },
    /// Private: delivered only to `who`.
    DealtHole { who: PlayerId, hole: [Card; HOLE_SIZE] },
    DealtFlop { cards: [Card; FLOP_SIZE] },
    DealtStreet { card: Card },
    /// `amount` is the delta the player just put in.
    BetPlaced { who: PlayerId, amount: Chips },
    TurnAdvanced { next: PlayerId },
    WonPot { who: PlayerId, amount: Chips },
}

impl Event {
    /// Visibility filter for the driver: hole cards are point-to-point,
    /// everything else is table-wide.
    #[must_use]
    pub fn visible_to(&self, viewer: PlayerId) -> bool {
        match self {
            Self::DealtHole { who, .. } => *who == viewer,
            _ => true,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerAdded { who } => write!(f, "player {who} joined"),
            Self::PlayerRemoved { who } => write!(f, "player {who} is leaving"),
            Self::HandStarted => write!(f, "new hand"),
            Self::PhaseAdvanced { next } => write!(f, "phase: {next}"),
            Self::DealtHole { who, hole } => {
                write!(f, "player {who} holds {}{}", hole[0], hole[1])
            }
            Self::DealtFlop { cards } => {
                write!(f, "flop: {} {} {}", cards[0], cards[1], cards[2])
            }
            Self::DealtStreet { card } => write!(f, "street: {card}"),
            Self::BetPlaced { who, amount } => write!(f, "player {who} put in {amount}"),
            Self::TurnAdvanced { next } => write!(f, "action on player {next}"),
            Self::WonPot { who, amount } => write!(f, "player {who} won {amount}"),
        }
    }
}
