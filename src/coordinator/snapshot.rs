//! Point-in-time views of machines for diagnostics.
//!
//! Snapshots describe a machine; they are not a persistence format and
//! cannot be loaded back into a coordinator. Handlers are not serializable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The delayed transition a machine is waiting on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSnapshot {
    /// State the timer will move the machine to
    pub target: String,

    /// Full delay the timer was armed with, in milliseconds
    pub delay_ms: u64,
}

/// Serializable view of one machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub name: String,
    pub state: String,
    pub initial: String,
    pub locked: bool,

    /// Every label the machine may be in, sorted
    pub states: Vec<String>,

    pub pending: Option<PendingSnapshot>,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl MachineSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
