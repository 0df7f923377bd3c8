//! Commands a driver can send to a table actor. Results come back on a
//! oneshot; the event stream itself flows through subscriptions.

use tokio::sync::{mpsc, oneshot};

use crate::game::{Action, Error, Event, PlayerId};

/// The command envelope. Every fallible command carries a responder so the
/// network layer can answer the offending player point-to-point while
/// events fan out to the whole table.
#[derive(Debug)]
pub enum TableCommand {
    /// Admit a player into the holding pen.
    Join {
        id: PlayerId,
        response: oneshot::Sender<Result<(), Error>>,
    },

    /// Stage a player's departure.
    Leave {
        id: PlayerId,
        response: oneshot::Sender<Result<(), Error>>,
    },

    /// Start the next hand now (drivers usually rely on auto-start).
    StartHand {
        response: oneshot::Sender<Result<(), Error>>,
    },

    /// Apply a player action to the live hand.
    Act {
        action: Action,
        response: oneshot::Sender<Result<(), Error>>,
    },

    /// Register an event feed for one player. Private events are filtered
    /// to the owning subscriber.
    Subscribe {
        id: PlayerId,
        sender: mpsc::Sender<Event>,
    },

    /// Drop a player's event feed.
    Unsubscribe { id: PlayerId },

    /// Shut the actor down.
    Close,
}
