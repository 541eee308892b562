use super::{Scheduler, SchedulerError, TimerId, TimerTask};
use crate::sync::lock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Scheduler that sleeps on a Tokio runtime, one task per timer.
///
/// Cancelling aborts the sleeping task. A task that already woke up may
/// still run; the coordinator's slot generations make that harmless.
pub struct TokioScheduler {
    handle: Handle,
    next_id: AtomicU64,
    tasks: Arc<Mutex<HashMap<TimerId, AbortHandle>>>,
}

impl TokioScheduler {
    /// Schedule onto the runtime behind `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            next_id: AtomicU64::new(0),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Schedule onto the runtime the caller is running in.
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| SchedulerError::NoRuntime)
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        lock(&self.tasks).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        // Hold the registry while spawning so the task cannot remove its
        // entry before it is inserted.
        let mut tasks = lock(&self.tasks);
        let registry = Arc::clone(&self.tasks);
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&registry).remove(&id);
            task();
        });
        tasks.insert(id, join.abort_handle());
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = lock(&self.tasks).remove(&id) {
            handle.abort();
        }
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_task(counter: &Arc<AtomicUsize>) -> TimerTask {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn current_fails_outside_a_runtime() {
        assert!(matches!(
            TokioScheduler::current(),
            Err(SchedulerError::NoRuntime)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn task_fires_after_its_delay() {
        let scheduler = TokioScheduler::current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(Duration::from_millis(200), counting_task(&fired));
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_millis(199)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_fires() {
        let scheduler = TokioScheduler::current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let id = scheduler.schedule(Duration::from_millis(50), counting_task(&fired));
        scheduler.cancel(id);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 0);
    }
}
