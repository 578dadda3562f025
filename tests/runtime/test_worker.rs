//! Tests for the serial background worker.

use flight_compensation::runtime::{SerialWorker, ShutdownOutcome, SubmitError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};

#[tokio::test]
async fn test_job_result_is_delivered() {
    let worker = SerialWorker::spawn("test", 4);

    let task = worker.try_submit(async { 42 }).await.unwrap();

    assert_eq!(task.await.unwrap(), 42);
}

#[tokio::test(start_paused = true)]
async fn test_jobs_run_one_at_a_time_in_order() {
    let worker = SerialWorker::spawn("test", 8);
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut tasks = Vec::new();
    for i in 0..5 {
        let (active, peak, order) = (active.clone(), peak.clone(), order.clone());
        let task = worker
            .try_submit(async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                order.lock().await.push(i);
                active.fetch_sub(1, Ordering::SeqCst);
            })
            .await
            .unwrap();
        tasks.push(task);
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(*order.lock().await, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_panicking_job_does_not_stop_worker() {
    let worker = SerialWorker::spawn("test", 4);

    let explode = true;
    let failed = worker
        .try_submit(async move {
            assert!(!explode, "job blew up");
            0_u8
        })
        .await
        .unwrap();
    let next = worker.try_submit(async { "still running" }).await.unwrap();

    assert!(failed.await.is_err());
    assert_eq!(next.await.unwrap(), "still running");
}

#[tokio::test]
async fn test_full_queue_reports_busy() {
    let worker = SerialWorker::spawn("test", 1);
    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let running = worker
        .try_submit(async move {
            let _ = started_tx.send(());
            let _ = release_rx.await;
        })
        .await
        .unwrap();
    started_rx.await.unwrap();

    let queued = worker.try_submit(async {}).await.unwrap();
    let rejected = worker.try_submit(async {}).await;
    assert!(matches!(rejected, Err(SubmitError::Busy)));

    release_tx.send(()).unwrap();
    running.await.unwrap();
    queued.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_queue() {
    let worker = SerialWorker::spawn("test", 1);

    assert_eq!(worker.shutdown(Duration::from_secs(1)).await, ShutdownOutcome::Drained);
    assert!(matches!(
        worker.try_submit(async {}).await,
        Err(SubmitError::Closed)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_overrunning_job() {
    let worker = SerialWorker::spawn("test", 1);
    let task = worker
        .try_submit(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            "finished"
        })
        .await
        .unwrap();

    assert_eq!(
        worker.shutdown(Duration::from_secs(1)).await,
        ShutdownOutcome::Aborted
    );
    assert!(task.await.is_err());
}
