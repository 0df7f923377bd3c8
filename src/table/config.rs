//! Driver-side table configuration. Game rules (seats, blinds, buy-in) are
//! fixed constants; this only shapes the dispatch plumbing.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    /// Display name used in logs.
    pub name: String,

    /// Command inbox depth before senders are backpressured.
    pub inbox_capacity: usize,

    /// Per-subscriber event buffer; a subscriber that falls this far
    /// behind starts losing events.
    pub event_capacity: usize,

    /// Fixed shuffle seed for reproducible deals. `None` seeds from the
    /// operating system.
    pub rng_seed: Option<u64>,

    /// Start the next hand automatically whenever the table can.
    pub auto_start: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "table".to_string(),
            inbox_capacity: 100,
            event_capacity: 64,
            rng_seed: None,
            auto_start: true,
        }
    }
}
