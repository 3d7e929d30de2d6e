//! Coalescing of rapid repeated triggers
//!
//! Keystroke-driven search re-runs on every input change; the debouncer
//! quantizes that into one execution per quiet window. Of all submissions
//! made within the window, only the trailing one executes. The policy is
//! self-contained and independent of any UI event loop.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default quiet window in milliseconds
pub const DEFAULT_WINDOW_MS: u64 = 300;

/// Trailing-edge debouncer
///
/// Each submission supersedes any still-pending one; a submission executes
/// only if no newer submission arrives before its window elapses.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_WINDOW_MS))
    }
}

impl Debouncer {
    /// Create a debouncer with the given quiet window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The configured quiet window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Submit an action, superseding any pending one
    ///
    /// The returned handle resolves to `true` if this submission survived the
    /// window and executed, `false` if a newer submission displaced it.
    pub fn submit<F>(&self, action: F) -> JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = Arc::clone(&self.generation);
        let token = generation.fetch_add(1, Ordering::SeqCst) + 1;
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if generation.load(Ordering::SeqCst) == token {
                action.await;
                true
            } else {
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn only_the_trailing_submission_executes() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let executed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (1..=3)
            .map(|value| {
                let executed = Arc::clone(&executed);
                debouncer.submit(async move {
                    executed.store(value, Ordering::SeqCst);
                })
            })
            .collect();

        let fired: Vec<bool> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(fired, vec![false, false, true]);
        assert_eq!(executed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_submissions_each_execute() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let executed = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let executed = Arc::clone(&executed);
            let fired = debouncer
                .submit(async move {
                    executed.fetch_add(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
            assert!(fired);
        }

        assert_eq!(executed.load(Ordering::SeqCst), 2);
    }
}
