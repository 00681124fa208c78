/*!
 * Cachable Tasks
 *
 * Coalesces concurrent requests for the same asynchronous work into one
 * in-flight task. Every caller awaiting while the task runs shares its
 * result; the first request after completion starts a fresh run.
 */

use crate::core::errors::{FicheError, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tracing::debug;

type Factory<T> = dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync;

/// Handle to the current run, awaitable by any number of callers
pub type SharedTask<T> = Shared<BoxFuture<'static, Result<T>>>;

struct InFlight<T> {
    generation: u64,
    task: SharedTask<T>,
}

struct State<T> {
    generation: u64,
    current: Option<InFlight<T>>,
}

/// Factory-backed task that runs at most once at a time
///
/// The factory runs under the internal lock only when no run is in flight.
/// Its future is spawned on the ambient tokio runtime, so it makes progress
/// even when nobody awaits it, and the slot is cleared as soon as it
/// finishes.
pub struct CachableTask<T> {
    factory: Arc<Factory<T>>,
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for CachableTask<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for CachableTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CachableTask")
            .field("generation", &state.generation)
            .field("in_flight", &state.current.is_some())
            .finish()
    }
}

impl<T> CachableTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || factory().boxed()),
            state: Arc::new(Mutex::new(State {
                generation: 0,
                current: None,
            })),
        }
    }

    /// The in-flight run, starting one if none is running
    ///
    /// Fails with `InvalidOperation` outside a tokio runtime.
    pub fn task(&self) -> Result<SharedTask<T>> {
        let mut state = self.state.lock();
        if let Some(in_flight) = &state.current {
            return Ok(in_flight.task.clone());
        }

        let handle = Handle::try_current().map_err(|_| {
            FicheError::invalid_operation("a cachable task requires a running tokio runtime")
        })?;

        state.generation += 1;
        let generation = state.generation;
        let slot = Arc::downgrade(&self.state);
        let run = (self.factory)();
        let join = {
            let slot = slot.clone();
            handle.spawn(async move {
                let output = run.await;
                release(&slot, generation);
                output
            })
        };

        // A panicked run never reaches its own release, so the waiters clear it
        let task = async move {
            match join.await {
                Ok(output) => output,
                Err(e) => {
                    release(&slot, generation);
                    Err(FicheError::TaskFailed(format!("task join error: {}", e).into()))
                }
            }
        }
        .boxed()
        .shared();

        debug!(generation, "cachable task armed");
        state.current = Some(InFlight {
            generation,
            task: task.clone(),
        });
        Ok(task)
    }

    /// Await the in-flight run, starting one if none is running
    pub async fn run(&self) -> Result<T> {
        self.task()?.await
    }

    /// Whether a run is currently in flight
    pub fn is_running(&self) -> bool {
        self.state.lock().current.is_some()
    }

    /// Number of runs started so far
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

/// Clear the slot if it still holds the run that just finished
fn release<T>(slot: &Weak<Mutex<State<T>>>, generation: u64) {
    let Some(state) = slot.upgrade() else {
        return;
    };
    let mut state = state.lock();
    if state
        .current
        .as_ref()
        .is_some_and(|in_flight| in_flight.generation == generation)
    {
        state.current = None;
        debug!(generation, "cachable task re-armed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_concurrent_requests_share_one_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        let task = {
            let calls = Arc::clone(&calls);
            let gate = Arc::clone(&gate);
            CachableTask::new(move || {
                let calls = Arc::clone(&calls);
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
                }
            })
        };

        let first = task.task().unwrap();
        let second = task.task().unwrap();
        assert!(task.is_running());
        assert_eq!(task.generation(), 1);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), 1);
        assert_eq!(second.await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rearms_after_completion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = {
            let calls = Arc::clone(&calls);
            CachableTask::new(move || {
                let calls = Arc::clone(&calls);
                async move { Ok(calls.fetch_add(1, Ordering::SeqCst)) }
            })
        };

        assert_eq!(task.run().await.unwrap(), 0);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!task.is_running());
        assert_eq!(task.run().await.unwrap(), 1);
        assert_eq!(task.generation(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_shared_and_rearm() {
        let task: CachableTask<u8> =
            CachableTask::new(|| async { Err(FicheError::invalid_operation("boom")) });
        let err = task.run().await.unwrap_err();
        assert!(matches!(err, FicheError::InvalidOperation(_)));
        assert!(task.run().await.is_err());
    }

    #[tokio::test]
    async fn test_panicking_run_reports_task_failed() {
        fn explode() -> u8 {
            panic!("factory panicked")
        }
        let task: CachableTask<u8> = CachableTask::new(|| async { Ok(explode()) });
        assert!(matches!(task.run().await, Err(FicheError::TaskFailed(_))));
        assert!(!task.is_running());
    }

    #[test]
    fn test_requires_runtime() {
        let task: CachableTask<u8> = CachableTask::new(|| async { Ok(1) });
        assert!(matches!(task.task(), Err(FicheError::InvalidOperation(_))));
    }
}
