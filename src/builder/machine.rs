//! Fluent registration of machines.

use crate::builder::error::BuildError;
use crate::coordinator::{Coordinator, CoordinatorError};
use crate::core::State;
use crate::table::TransitionRule;

/// Builder registering one machine on a coordinator.
///
/// # Example
///
/// ```rust
/// use statecoord::timer::ManualScheduler;
/// use statecoord::{Coordinator, TransitionRule};
/// use std::sync::Arc;
///
/// let coordinator = Coordinator::new(Arc::new(ManualScheduler::new()));
/// coordinator
///     .machine("settings")
///     .initial("collapsed")
///     .rule(TransitionRule::new("collapsed", "visible"))
///     .rule(TransitionRule::new("visible", "collapsed"))
///     .register()
///     .unwrap();
///
/// assert_eq!(coordinator.get_state("settings").unwrap(), "collapsed");
/// ```
pub struct MachineBuilder<'a> {
    coordinator: &'a Coordinator,
    name: String,
    initial: Option<String>,
    rules: Vec<TransitionRule>,
}

impl<'a> MachineBuilder<'a> {
    pub(crate) fn new(coordinator: &'a Coordinator, name: String) -> Self {
        Self {
            coordinator,
            name,
            initial: None,
            rules: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl State) -> Self {
        self.initial = Some(state.name().to_string());
        self
    }

    /// Add a rule.
    pub fn rule(mut self, rule: TransitionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add several rules at once.
    pub fn rules(mut self, rules: impl IntoIterator<Item = TransitionRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Register the machine.
    /// Returns an error if the initial state is missing or registration fails.
    pub fn register(self) -> Result<(), CoordinatorError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        self.coordinator.register(self.name, self.rules, initial)
    }
}
