//! Cancellable deferred-task debouncing.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Coalesces rapid triggers into a single deferred task.
///
/// Each trigger cancels any pending task and schedules a fresh one after the
/// configured delay, so a burst of triggers inside the window runs exactly
/// once. The task observes whatever state it reads at the time it fires, not
/// at the time of the first trigger.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `task` to run after the delay, superseding any pending task.
    pub fn trigger<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn burst_of_triggers_runs_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        for _ in 0..5 {
            let runs = Arc::clone(&runs);
            debouncer.trigger(async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn task_observes_state_at_fire_time() {
        let width = Arc::new(AtomicU32::new(480));
        let observed = Arc::new(AtomicU32::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        {
            let width = Arc::clone(&width);
            let observed = Arc::clone(&observed);
            debouncer.trigger(async move {
                observed.store(width.load(Ordering::SeqCst), Ordering::SeqCst);
            });
        }

        // State changes after the trigger but before the timer fires.
        width.store(1280, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(observed.load(Ordering::SeqCst), 1280);
    }

    #[tokio::test]
    async fn spaced_triggers_each_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(20));

        for _ in 0..3 {
            let runs = Arc::clone(&runs);
            debouncer.trigger(async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }
}
