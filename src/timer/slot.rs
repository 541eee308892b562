use super::{Scheduler, TimerId, TimerTask};
use std::time::Duration;

/// A delayed transition waiting to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingTimer {
    pub id: TimerId,
    pub generation: u64,
    /// Index of the rule applied when the timer fires.
    pub rule: usize,
    pub target: String,
    pub delay: Duration,
}

/// The single timer slot owned by one machine.
///
/// Every cancel or replace bumps the generation. A task carries the
/// generation it was issued under, so a task that wakes up after being
/// replaced finds a mismatch and does nothing.
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    generation: u64,
    pending: Option<PendingTimer>,
}

impl TimerSlot {
    /// Cancel the pending timer, if any. Returns whether one was pending.
    pub fn cancel(&mut self, scheduler: &dyn Scheduler) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.pending.take() {
            Some(pending) => {
                scheduler.cancel(pending.id);
                true
            }
            None => false,
        }
    }

    /// Cancel whatever is pending and schedule a new timer.
    ///
    /// `make_task` receives the generation the new timer is issued under.
    pub fn replace(
        &mut self,
        scheduler: &dyn Scheduler,
        delay: Duration,
        rule: usize,
        target: &str,
        make_task: impl FnOnce(u64) -> TimerTask,
    ) {
        self.cancel(scheduler);
        let generation = self.generation;
        let id = scheduler.schedule(delay, make_task(generation));
        self.pending = Some(PendingTimer {
            id,
            generation,
            rule,
            target: target.to_string(),
            delay,
        });
    }

    /// Claim the pending timer if it is still the one issued under `generation`.
    pub fn take_if_current(&mut self, generation: u64) -> Option<PendingTimer> {
        if self.pending.as_ref()?.generation != generation {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingTimer> {
        self.pending.as_ref()
    }
}
