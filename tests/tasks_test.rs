/*!
 * Task Tests
 * Coalescing of cachable tasks and synchronous waiting
 */

use fiche::{wait_sync, CachableTask, FicheError};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn counting_task(calls: &Arc<AtomicUsize>, delay: Duration) -> CachableTask<usize> {
    let calls = Arc::clone(calls);
    CachableTask::new(move || {
        let calls = Arc::clone(&calls);
        async move {
            sleep(delay).await;
            Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
        }
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let task = counting_task(&calls, Duration::from_millis(50));

    let waiters: Vec<_> = (0..16)
        .map(|_| {
            let task = task.clone();
            tokio::spawn(async move { task.run().await })
        })
        .collect();

    for waiter in waiters {
        assert_eq!(waiter.await.unwrap().unwrap(), 1);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_next_request_after_completion_starts_new_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let task = counting_task(&calls, Duration::from_millis(1));

    assert_eq!(task.run().await.unwrap(), 1);
    assert_eq!(task.run().await.unwrap(), 2);
    assert_eq!(task.generation(), 2);
    assert!(!task.is_running());
}

#[tokio::test]
async fn test_run_progresses_without_awaiters() {
    let calls = Arc::new(AtomicUsize::new(0));
    let task = counting_task(&calls, Duration::from_millis(1));

    drop(task.task().unwrap());
    sleep(Duration::from_millis(50)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!task.is_running());
}

#[test]
fn test_wait_sync_outside_runtime() {
    let calls = Arc::new(AtomicUsize::new(0));
    let value = wait_sync(async {
        sleep(Duration::from_millis(1)).await;
        calls.fetch_add(1, Ordering::SeqCst)
    })
    .unwrap();
    assert_eq!(value, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_sync_on_multi_thread_runtime() {
    let calls = Arc::new(AtomicUsize::new(0));
    let task = counting_task(&calls, Duration::from_millis(5));
    let value = wait_sync(task.run()).unwrap().unwrap();
    assert_eq!(value, 1);
}

#[tokio::test]
async fn test_wait_sync_on_current_thread_runtime_fails() {
    let err = wait_sync(async { 1 }).unwrap_err();
    assert!(matches!(err, FicheError::InvalidOperation(_)));
}
