//! # Holdem Engine
//!
//! An authoritative No-Limit Texas Hold'em table engine. The server owns
//! the canonical truth: it shuffles, deals, validates every action, drives
//! phase progression, builds side pots, and distributes chips.
//!
//! ## Architecture
//!
//! The core is a per-table state machine that runs one hand at a time:
//!
//! - **Cards & deck**: 52-card identity with a sequential deal cursor and
//!   caller-seeded shuffles
//! - **Hand evaluator**: total-order rank over the best five of seven
//!   cards, smaller is better
//! - **Player manager**: seat allocation, a holding pen for players joining
//!   mid-hand, and deferred departure at hand boundaries
//! - **Table**: validates folds, bets, and timeouts; sequences turns;
//!   advances streets; layers side pots for all-ins; pays out showdowns
//!
//! Every operation is a pure request: one [`game::Action`] in, an ordered
//! [`game::Event`] sequence (or a typed error) out. The engine never
//! blocks and holds no timers; a "timeout" is just an action the driver
//! submits.
//!
//! ## Core Modules
//!
//! - [`game`]: the engine itself: entities, evaluator, roster, table
//! - [`table`]: task-per-table dispatch with subscription-based event
//!   fan-out and the hole-card visibility filter
//!
//! ## Example
//!
//! ```
//! use holdem_engine::game::{Action, Table};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut table = Table::new(1, StdRng::seed_from_u64(0));
//! table.add_player(1).unwrap();
//! table.add_player(2).unwrap();
//! let events = table.handle_new_hand().unwrap();
//! assert!(!events.is_empty());
//! table.on_action(Action::Bet { id: 1, amount: 5 }).unwrap();
//! ```

/// Core game logic, entities, and the table state machine.
pub mod game;

/// Async dispatch layer consumed by the network driver.
pub mod table;

pub use game::{
    constants, Action, Card, Chips, Error, Event, GameError, Phase, PlayerId, PlayerMgmtError,
    PlayerState, ServerError, Table, TableId,
};
pub use table::{TableActor, TableConfig, TableHandle};
