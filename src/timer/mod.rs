//! Timer management for delayed transitions.
//!
//! The coordinator never talks to a clock directly. It hands delayed work to
//! a [`Scheduler`] and keeps one [`TimerSlot`] per machine, so at most one
//! delayed transition per machine is ever pending.
//!
//! Two schedulers are provided:
//!
//! - [`TokioScheduler`]: one sleeping task per timer on a Tokio runtime
//! - [`ManualScheduler`]: a virtual clock the host advances from its own
//!   event loop

mod manual;
mod slot;
mod tokio_scheduler;

pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

pub(crate) use slot::TimerSlot;

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Work run when a timer fires.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Identifies one scheduled timer within its scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Runs tasks after a delay and lets them be cancelled before they do.
///
/// Implementations must never run a task from inside `schedule` or `cancel`;
/// the coordinator calls both while holding a machine's lock.
pub trait Scheduler: Send + Sync {
    /// Run `task` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId;

    /// Drop the task behind `id` if it has not run yet. Unknown ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// Errors raised while setting up a scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("No Tokio runtime is running on this thread")]
    NoRuntime,
}
