//! Cancelable one-shot timer for the error-view revert.
//!
//! At most one revert is pending. Arming replaces (aborts) the previous one,
//! and any successful state change cancels it, so two reverts never race.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct RevertTimer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl RevertTimer {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        // The slot only ever holds a handle; a poisoned lock has nothing
        // half-written in it.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `task` after `delay`, superseding any pending task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        if let Some(prev) = self.slot().replace(handle) {
            prev.abort();
        }
    }

    /// Abort the pending task. Returns `true` if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RevertTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let hits = Arc::new(AtomicUsize::new(0));
        let timer = RevertTimer::new();
        let h = Arc::clone(&hits);
        timer.arm(Duration::from_millis(100), async move {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert!(timer.is_armed());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_supersedes_previous() {
        let hits = Arc::new(AtomicUsize::new(0));
        let timer = RevertTimer::new();
        for _ in 0..3 {
            let h = Arc::clone(&hits);
            timer.arm(Duration::from_millis(100), async move {
                h.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(60)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1, "only the last arm fires");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let timer = RevertTimer::new();
        let h = Arc::clone(&hits);
        timer.arm(Duration::from_millis(100), async move {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert!(timer.cancel());
        assert!(!timer.cancel());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
