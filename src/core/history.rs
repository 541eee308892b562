//! Per-machine transition history.
//!
//! Every state change a machine goes through is recorded with what caused it,
//! in a bounded buffer so long-lived UI machines do not grow without limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// What caused a recorded state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// A validated `transition` call matched a rule.
    Requested,
    /// A pending delayed transition fired.
    Delayed,
    /// A raw `set_state` assignment.
    Assigned,
    /// A `lock` pinned the machine to a state.
    Locked,
}

impl fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => write!(f, "requested"),
            Self::Delayed => write!(f, "delayed"),
            Self::Assigned => write!(f, "assigned"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use statecoord::core::{TransitionCause, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "collapsed".to_string(),
///     to: "visible".to_string(),
///     cause: TransitionCause::Requested,
///     at: Utc::now(),
/// };
/// assert_eq!(record.to, "visible");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left
    pub from: String,
    /// The state being entered
    pub to: String,
    /// What triggered the change
    pub cause: TransitionCause,
    /// When the change was applied
    pub at: DateTime<Utc>,
}

/// Bounded, ordered history of state changes.
///
/// Once `limit` records are held, recording a new one evicts the oldest.
/// A limit of zero disables recording entirely.
///
/// # Example
///
/// ```rust
/// use statecoord::core::{History, TransitionCause, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = History::with_limit(2);
/// for (from, to) in [("a", "b"), ("b", "c"), ("c", "a")] {
///     history.record(TransitionRecord {
///         from: from.to_string(),
///         to: to.to_string(),
///         cause: TransitionCause::Requested,
///         at: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.path(), vec!["b", "c", "a"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct History {
    limit: usize,
    records: VecDeque<TransitionRecord>,
}

impl History {
    /// Create an empty history holding at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            records: VecDeque::with_capacity(limit.min(64)),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        if self.records.len() == self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Path of states traversed: the first retained `from`, then every `to`.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Time between the first and last retained records.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.at.signed_duration_since(first.at).to_std().ok()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    /// All retained records, oldest first.
    pub fn records(&self) -> Vec<TransitionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
