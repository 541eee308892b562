//! The registry of named machines.
//!
//! A [`Coordinator`] owns every machine and every pending timer. Producers of
//! events only ever ask for a named machine to move to a state; validation,
//! debouncing and lock handling happen here.
//!
//! # Example
//!
//! ```rust
//! use statecoord::timer::ManualScheduler;
//! use statecoord::{Coordinator, TransitionRule};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualScheduler::new());
//! let coordinator = Coordinator::new(clock.clone());
//!
//! coordinator
//!     .register(
//!         "controls",
//!         vec![
//!             TransitionRule::new("collapsed", "visible"),
//!             TransitionRule::new("visible", "collapsed").delay(Duration::from_millis(2500)),
//!         ],
//!         "collapsed",
//!     )
//!     .unwrap();
//!
//! coordinator.transition("controls", "visible").unwrap();
//! clock.advance(Duration::from_millis(2500));
//! assert_eq!(coordinator.get_state("controls").unwrap(), "collapsed");
//! ```

mod config;
mod error;
mod machine;
mod outcome;
mod snapshot;

pub use config::{CoordinatorConfig, DEFAULT_HISTORY_LIMIT};
pub use error::CoordinatorError;
pub use outcome::TransitionOutcome;
pub use snapshot::{MachineSnapshot, PendingSnapshot};

use crate::builder::MachineBuilder;
use crate::core::{State, TransitionCause, TransitionRecord};
use crate::sync::{lock, read, write};
use crate::table::{Arm, TransitionRule, TransitionTable};
use crate::timer::{Scheduler, SchedulerError, TokioScheduler};
use machine::Machine;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use uuid::Uuid;

/// Registry and driver of named state machines.
///
/// Cheap to clone; clones share the same machines. Handlers typically capture
/// a clone to reconcile other machines re-entrantly.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    debug: AtomicBool,
    history_limit: usize,
    scheduler: Arc<dyn Scheduler>,
    machines: RwLock<HashMap<String, Arc<Mutex<Machine>>>>,
}

impl Coordinator {
    /// Create a coordinator that runs delayed transitions on `scheduler`.
    pub fn new<S: Scheduler + 'static>(scheduler: Arc<S>) -> Self {
        Self::with_config(scheduler, CoordinatorConfig::default())
    }

    pub fn with_config<S: Scheduler + 'static>(scheduler: Arc<S>, config: CoordinatorConfig) -> Self {
        let scheduler: Arc<dyn Scheduler> = scheduler;
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                debug: AtomicBool::new(config.debug),
                history_limit: config.history_limit,
                scheduler,
                machines: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Create a coordinator scheduling on the Tokio runtime of the caller.
    pub fn current_runtime() -> Result<Self, SchedulerError> {
        Ok(Self::new(Arc::new(TokioScheduler::current()?)))
    }

    /// Identifier attached to every trace this coordinator emits.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Turn per-operation tracing on or off.
    pub fn set_debug(&self, enabled: bool) {
        self.inner.debug.store(enabled, Ordering::Relaxed);
    }

    pub fn is_debug(&self) -> bool {
        self.inner.debug.load(Ordering::Relaxed)
    }

    /// Start a fluent registration of `name`.
    pub fn machine(&self, name: impl Into<String>) -> MachineBuilder<'_> {
        MachineBuilder::new(self, name.into())
    }

    /// Register a machine with its rules and initial state.
    ///
    /// Registration is one-time: a name already in use is an error, not an
    /// update. The initial state is accepted as given.
    pub fn register(
        &self,
        name: impl Into<String>,
        rules: impl IntoIterator<Item = TransitionRule>,
        initial: impl State,
    ) -> Result<(), CoordinatorError> {
        let name = name.into();
        let table = TransitionTable::new(rules).map_err(|source| CoordinatorError::InvalidTable {
            machine: name.clone(),
            source,
        })?;

        match write(&self.inner.machines).entry(name.clone()) {
            Entry::Occupied(_) => return Err(CoordinatorError::DuplicateMachine(name)),
            Entry::Vacant(slot) => {
                let machine = Machine::new(name.clone(), table, initial.name(), self.inner.history_limit);
                slot.insert(Arc::new(Mutex::new(machine)));
            }
        }

        self.trace("register", &name, "", initial.name(), "registered");
        Ok(())
    }

    /// Ask `name` to move to `target`.
    ///
    /// Requests that do not apply are absorbed and reported through the
    /// returned outcome. When a rule matches, its handler runs after the
    /// state has been updated and may call back into the coordinator; a
    /// handler error is returned as [`CoordinatorError::Handler`].
    pub fn transition(
        &self,
        name: &str,
        target: impl State,
    ) -> Result<TransitionOutcome, CoordinatorError> {
        let target = target.name();
        let cell = self.cell(name)?;

        let (outcome, handler) = {
            let mut machine = lock(&cell);
            let current = machine.current.clone();

            if machine.locked {
                (TransitionOutcome::Locked { state: current }, None)
            } else if let Some(index) = machine.table.find(&current, target) {
                machine.timer.cancel(self.inner.scheduler.as_ref());
                machine.current = target.to_string();
                machine.armed = machine.table.follow_up(index);
                if let Some(arm) = machine.armed {
                    self.arm(&mut machine, arm);
                }
                machine.record(&current, target, TransitionCause::Requested);

                let handler = machine.table.rule(index).and_then(|r| r.handler.clone());
                let outcome = TransitionOutcome::Applied {
                    from: current,
                    to: target.to_string(),
                };
                (outcome, handler)
            } else if let (true, Some(arm)) = (current == target, machine.refresh_arm()) {
                machine.armed = Some(arm);
                self.arm(&mut machine, arm);
                (TransitionOutcome::Refreshed { state: current }, None)
            } else {
                let outcome = TransitionOutcome::Rejected {
                    current,
                    requested: target.to_string(),
                };
                (outcome, None)
            }
        };

        let from = match &outcome {
            TransitionOutcome::Applied { from, .. } => from.as_str(),
            other => other.state(),
        };
        self.trace("transition", name, from, target, &outcome);

        if let (Some(handler), TransitionOutcome::Applied { from, to }) = (handler, &outcome) {
            handler.call().map_err(|source| CoordinatorError::Handler {
                machine: name.to_string(),
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
        }

        Ok(outcome)
    }

    /// Current state of `name`.
    pub fn get_state(&self, name: &str) -> Result<String, CoordinatorError> {
        let state = lock(&*self.cell(name)?).current.clone();
        self.trace("get_state", name, &state, &state, "read");
        Ok(state)
    }

    /// Overwrite the state of `name` without consulting the table or running
    /// any handler. Cancels the machine's pending timer. Lock status is left
    /// as it is.
    pub fn set_state(&self, name: &str, state: impl State) -> Result<(), CoordinatorError> {
        self.assign(name, state.name(), TransitionCause::Assigned)
    }

    /// Pin `name` to `state` and ignore transitions until [`unlock`](Self::unlock).
    pub fn lock(&self, name: &str, state: impl State) -> Result<(), CoordinatorError> {
        self.assign(name, state.name(), TransitionCause::Locked)
    }

    /// Release the lock on `name`. The state is left where it was.
    pub fn unlock(&self, name: &str) -> Result<(), CoordinatorError> {
        let cell = self.cell(name)?;
        let state = {
            let mut machine = lock(&cell);
            machine.locked = false;
            machine.current.clone()
        };
        self.trace("unlock", name, &state, &state, "unlocked");
        Ok(())
    }

    pub fn is_locked(&self, name: &str) -> Result<bool, CoordinatorError> {
        Ok(lock(&*self.cell(name)?).locked)
    }

    /// State the pending delayed transition of `name` will move it to.
    pub fn pending_target(&self, name: &str) -> Result<Option<String>, CoordinatorError> {
        Ok(lock(&*self.cell(name)?)
            .timer
            .pending()
            .map(|p| p.target.clone()))
    }

    /// Every label `name` may be in, sorted.
    pub fn states(&self, name: &str) -> Result<Vec<String>, CoordinatorError> {
        Ok(lock(&*self.cell(name)?).states())
    }

    /// Recorded state changes of `name`, oldest first.
    pub fn history(&self, name: &str) -> Result<Vec<TransitionRecord>, CoordinatorError> {
        Ok(lock(&*self.cell(name)?).history.records())
    }

    pub fn snapshot(&self, name: &str) -> Result<MachineSnapshot, CoordinatorError> {
        Ok(lock(&*self.cell(name)?).snapshot())
    }

    /// Snapshots of every machine, sorted by name.
    pub fn snapshot_all(&self) -> Vec<MachineSnapshot> {
        let mut snapshots: Vec<MachineSnapshot> = self
            .cells()
            .iter()
            .map(|cell| lock(cell).snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    pub fn contains(&self, name: &str) -> bool {
        read(&self.inner.machines).contains_key(name)
    }

    /// Registered machine names, sorted.
    pub fn machines(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.inner.machines).keys().cloned().collect();
        names.sort();
        names
    }

    /// Cancel every pending delayed transition. Machines stay registered and
    /// usable.
    pub fn shutdown(&self) {
        for cell in self.cells() {
            let mut machine = lock(&cell);
            machine.timer.cancel(self.inner.scheduler.as_ref());
            machine.armed = None;
        }
        self.trace("shutdown", "*", "", "", "timers cancelled");
    }

    fn cell(&self, name: &str) -> Result<Arc<Mutex<Machine>>, CoordinatorError> {
        read(&self.inner.machines)
            .get(name)
            .cloned()
            .ok_or_else(|| CoordinatorError::UnknownMachine(name.to_string()))
    }

    fn cells(&self) -> Vec<Arc<Mutex<Machine>>> {
        read(&self.inner.machines).values().cloned().collect()
    }

    fn assign(&self, name: &str, state: &str, cause: TransitionCause) -> Result<(), CoordinatorError> {
        let cell = self.cell(name)?;
        let from = {
            let mut machine = lock(&cell);
            if !machine.is_valid_state(state) {
                return Err(CoordinatorError::UnknownState {
                    machine: name.to_string(),
                    state: state.to_string(),
                });
            }

            machine.timer.cancel(self.inner.scheduler.as_ref());
            machine.armed = None;
            if cause == TransitionCause::Locked {
                machine.locked = true;
            }
            let from = std::mem::replace(&mut machine.current, state.to_string());
            machine.record(&from, state, cause);
            from
        };

        let operation = match cause {
            TransitionCause::Locked => "lock",
            _ => "set_state",
        };
        self.trace(operation, name, &from, state, cause);
        Ok(())
    }

    /// Schedule the follow-up `arm` for `machine`, replacing any pending timer.
    fn arm(&self, machine: &mut Machine, arm: Arm) {
        let Some(target) = machine.table.rule(arm.rule).map(|r| r.to.clone()) else {
            return;
        };
        let coordinator = Arc::downgrade(&self.inner);
        let name = machine.name.clone();

        machine.timer.replace(
            self.inner.scheduler.as_ref(),
            arm.delay,
            arm.rule,
            &target,
            move |generation| {
                Box::new(move || {
                    if let Some(inner) = coordinator.upgrade() {
                        Coordinator { inner }.fire(&name, generation);
                    }
                })
            },
        );
    }

    /// Apply the delayed transition issued under `generation`, unless it has
    /// been superseded since.
    fn fire(&self, name: &str, generation: u64) {
        let Ok(cell) = self.cell(name) else {
            return;
        };

        let (from, to, handler) = {
            let mut machine = lock(&cell);
            let Some(pending) = machine.timer.take_if_current(generation) else {
                return;
            };
            machine.armed = None;

            let applicable = match machine.table.rule(pending.rule) {
                Some(rule) if !machine.locked && rule.from == machine.current => {
                    Some((rule.from.clone(), rule.to.clone(), rule.handler.clone()))
                }
                _ => None,
            };
            let Some((from, to, handler)) = applicable else {
                let current = machine.current.clone();
                drop(machine);
                self.trace("delayed", name, &current, &pending.target, "expired");
                return;
            };

            machine.current = to.clone();
            machine.record(&from, &to, TransitionCause::Delayed);
            (from, to, handler)
        };

        self.trace("delayed", name, &from, &to, "applied");

        if let Some(Err(err)) = handler.map(|h| h.call()) {
            tracing::warn!(
                coordinator = %self.inner.id,
                machine = name,
                from = %from,
                to = %to,
                error = %err,
                "Delayed transition handler failed"
            );
        }
    }

    fn trace(&self, operation: &str, machine: &str, from: &str, to: &str, outcome: impl fmt::Display) {
        if self.is_debug() {
            tracing::debug!(
                coordinator = %self.inner.id,
                operation,
                machine,
                from,
                to,
                outcome = %outcome,
                "State coordinator"
            );
        }
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("id", &self.inner.id)
            .field("debug", &self.is_debug())
            .field("machines", &self.machines())
            .finish()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let machines = self.machines.get_mut().unwrap_or_else(PoisonError::into_inner);
        for cell in machines.values() {
            lock(cell).timer.cancel(self.scheduler.as_ref());
        }
    }
}
