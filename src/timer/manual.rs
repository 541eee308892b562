use super::{Scheduler, TimerId, TimerTask};
use crate::sync::lock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

/// Scheduler driven by a virtual clock.
///
/// Nothing fires until the host calls [`advance`](Self::advance). This suits
/// hosts that already own a frame or event loop, and makes delayed behaviour
/// fully deterministic in tests.
///
/// # Example
///
/// ```rust
/// use statecoord::timer::{ManualScheduler, Scheduler};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
/// scheduler.schedule(Duration::from_millis(100), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// scheduler.advance(Duration::from_millis(99));
/// assert!(!fired.load(Ordering::SeqCst));
/// scheduler.advance(Duration::from_millis(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), TimerTask>,
    deadlines: HashMap<TimerId, Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        lock(&self.state).now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        lock(&self.state).queue.len()
    }

    /// Virtual time at which the next timer fires.
    pub fn next_deadline(&self) -> Option<Duration> {
        lock(&self.state).queue.keys().next().map(|(due, _)| *due)
    }

    /// Move the clock forward by `by`, running every task that comes due in
    /// deadline order. Tasks scheduled by those tasks run too if they fall
    /// inside the window. Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = {
            let state = lock(&self.state);
            state.now.saturating_add(by)
        };
        let mut fired = 0;

        loop {
            let task = {
                let mut state = lock(&self.state);
                let next = state.queue.keys().next().copied();
                match next {
                    Some((due, id)) if due <= target => {
                        state.now = due;
                        state.deadlines.remove(&id);
                        state.queue.remove(&(due, id))
                    }
                    _ => break,
                }
            };

            // Run outside the lock: tasks re-enter to schedule or cancel.
            if let Some(task) = task {
                task();
                fired += 1;
            }
        }

        lock(&self.state).now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let mut state = lock(&self.state);
        let id = TimerId::new(state.next_id);
        state.next_id += 1;
        let due = state.now.saturating_add(delay);
        state.queue.insert((due, id), task);
        state.deadlines.insert(id, due);
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut state = lock(&self.state);
        if let Some(due) = state.deadlines.remove(&id) {
            state.queue.remove(&(due, id));
        }
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}
