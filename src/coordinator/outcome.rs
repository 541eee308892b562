use serde::Serialize;
use std::fmt;

/// What a `transition` request did.
///
/// Purely informational: absorbed requests are expected steady-state traffic,
/// and callers are free to ignore the value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// A rule matched and the machine moved.
    Applied { from: String, to: String },

    /// The machine was already in the requested state; its pending delayed
    /// transition was pushed back by a full delay.
    Refreshed { state: String },

    /// No rule leads from the current state to the requested one.
    Rejected { current: String, requested: String },

    /// The machine is locked and ignores transitions.
    Locked { state: String },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Whether the request was ignored (rejected or locked).
    pub fn is_absorbed(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Locked { .. })
    }

    /// The machine's state once the request was handled.
    pub fn state(&self) -> &str {
        match self {
            Self::Applied { to, .. } => to,
            Self::Refreshed { state } | Self::Locked { state } => state,
            Self::Rejected { current, .. } => current,
        }
    }
}

impl fmt::Display for TransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied { .. } => write!(f, "applied"),
            Self::Refreshed { .. } => write!(f, "refreshed"),
            Self::Rejected { .. } => write!(f, "rejected"),
            Self::Locked { .. } => write!(f, "locked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_reports_where_the_machine_ended_up() {
        let applied = TransitionOutcome::Applied {
            from: "collapsed".into(),
            to: "visible".into(),
        };
        let rejected = TransitionOutcome::Rejected {
            current: "collapsed".into(),
            requested: "hidden".into(),
        };

        assert_eq!(applied.state(), "visible");
        assert_eq!(rejected.state(), "collapsed");
        assert!(applied.is_applied());
        assert!(rejected.is_absorbed());
        assert!(!TransitionOutcome::Refreshed { state: "visible".into() }.is_absorbed());
    }

    #[test]
    fn serializes_with_an_outcome_tag() {
        let locked = TransitionOutcome::Locked {
            state: "muted".into(),
        };
        let json = serde_json::to_value(&locked).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "locked", "state": "muted"}));
    }
}
