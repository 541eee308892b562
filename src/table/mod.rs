//! Immutable per-machine transition tables.
//!
//! A table is built once at registration and never changes. Building it
//! validates every rule with Stillwater's `Validation`, so a table with
//! several defects reports all of them at once instead of the first one.
//!
//! # Example
//!
//! ```rust
//! use statecoord::{TransitionRule, TransitionTable};
//! use std::time::Duration;
//!
//! let table = TransitionTable::new(vec![
//!     TransitionRule::new("collapsed", "visible"),
//!     TransitionRule::new("visible", "collapsed").delay(Duration::from_millis(2500)),
//! ])
//! .unwrap();
//!
//! assert!(table.find("collapsed", "visible").is_some());
//! assert!(table.find("collapsed", "collapsed").is_none());
//! assert!(table.contains_state("visible"));
//! ```

mod rule;
mod violations;

pub use rule::{Handler, HandlerError, TransitionRule};
pub use violations::TableViolation;

use crate::builder::BuildError;
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// A delayed follow-up selected when a machine enters a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Arm {
    /// Index of the rule the timer will apply.
    pub rule: usize,
    pub delay: Duration,
}

/// The allowed moves of one machine, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl TransitionTable {
    /// Validate `rules` and build a table from them.
    pub fn new(rules: impl IntoIterator<Item = TransitionRule>) -> Result<Self, BuildError> {
        let rules: Vec<TransitionRule> = rules.into_iter().collect();

        match Self::validate(&rules) {
            Validation::Success(()) => Ok(Self { rules }),
            Validation::Failure(violations) => Err(BuildError::InvalidTable(
                violations.iter().cloned().collect(),
            )),
        }
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(rules: &[TransitionRule]) -> Validation<(), NonEmptyVec<TableViolation>> {
        let mut seen = HashSet::new();
        let mut checks: Vec<Validation<(), NonEmptyVec<TableViolation>>> = Vec::new();

        for rule in rules {
            if rule.from.is_empty() || rule.to.is_empty() {
                checks.push(Validation::fail(TableViolation::EmptyLabel {
                    from: rule.from.clone(),
                    to: rule.to.clone(),
                }));
            }

            if !seen.insert((rule.from.as_str(), rule.to.as_str())) {
                checks.push(Validation::fail(TableViolation::DuplicateRule {
                    from: rule.from.clone(),
                    to: rule.to.clone(),
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Index of the rule moving `from` to `to`, if any.
    pub fn find(&self, from: &str, to: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.matches(from, to))
    }

    pub fn rule(&self, index: usize) -> Option<&TransitionRule> {
        self.rules.get(index)
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// Every label appearing as a source or destination.
    pub fn states(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .flat_map(|r| [r.from.as_str(), r.to.as_str()])
            .collect()
    }

    pub fn contains_state(&self, label: &str) -> bool {
        self.rules.iter().any(|r| r.from == label || r.to == label)
    }

    /// The delayed follow-up armed after applying the rule at `index`.
    ///
    /// A delayed rule arms the move leaving its destination, preferring the
    /// one back to its source. An undelayed rule arms the destination's own
    /// delayed exit, if it has one.
    pub(crate) fn follow_up(&self, index: usize) -> Option<Arm> {
        let applied = self.rules.get(index)?;

        match applied.delay {
            Some(delay) => {
                let back = self.find(&applied.to, &applied.from);
                let onward = || self.rules.iter().position(|r| r.from == applied.to);
                back.or_else(onward).map(|rule| Arm { rule, delay })
            }
            None => self.dwell(&applied.to),
        }
    }

    /// The first delayed rule leaving `state`: how long `state` may be held
    /// without activity, and where it goes afterwards.
    pub(crate) fn dwell(&self, state: &str) -> Option<Arm> {
        self.rules
            .iter()
            .enumerate()
            .find_map(|(rule, r)| match r.delay {
                Some(delay) if r.from == state => Some(Arm { rule, delay }),
                _ => None,
            })
    }
}
