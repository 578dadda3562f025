//! Dedicated single-task executor.
//!
//! Jobs are queued on a bounded channel and run one after another on one
//! spawned task, so no more than one job is ever in progress.

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, error, warn};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::runtime::AsyncTask;

type Job = BoxFuture<'static, ()>;

/// Why a job was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("worker queue is full")]
    Busy,
    #[error("worker has been shut down")]
    Closed,
}

/// How [`SerialWorker::shutdown`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Queue drained within the grace period.
    Drained,
    /// Grace period elapsed; the worker was aborted.
    Aborted,
    /// Already shut down.
    AlreadyStopped,
}

/// A background executor that runs submitted futures strictly one at a time.
pub struct SerialWorker {
    name: &'static str,
    tx: Mutex<Option<mpsc::Sender<Job>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SerialWorker {
    /// Spawn the worker task on the current tokio runtime.
    ///
    /// `capacity` bounds queued jobs (not counting the one running).
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(name: &'static str, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Job>(capacity.max(1));
        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                    error!("{name} worker job panicked, continuing with the next job");
                }
            }
            debug!("{name} worker drained");
        });

        Self {
            name,
            tx: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Queue `job` without waiting for room.
    ///
    /// The returned handle resolves with the job's output once it has run,
    /// or with an error if the job panicked.
    pub async fn try_submit<F, T>(&self, job: F) -> Result<AsyncTask<T>, SubmitError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.tx.lock().await;
        let tx = guard.as_ref().ok_or(SubmitError::Closed)?;

        let (result_tx, result_rx) = oneshot::channel();
        let job = async move {
            let _ = result_tx.send(job.await);
        }
        .boxed();

        tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SubmitError::Busy,
            mpsc::error::TrySendError::Closed(_) => SubmitError::Closed,
        })?;
        Ok(AsyncTask::new(result_rx))
    }

    /// Stop accepting jobs, wait up to `grace` for queued work, then abort.
    pub async fn shutdown(&self, grace: Duration) -> ShutdownOutcome {
        self.tx.lock().await.take();

        let Some(mut handle) = self.handle.lock().await.take() else {
            return ShutdownOutcome::AlreadyStopped;
        };

        match tokio::time::timeout(grace, &mut handle).await {
            Ok(_) => ShutdownOutcome::Drained,
            Err(_) => {
                warn!(
                    "{} worker did not finish within {grace:?}, aborting",
                    self.name
                );
                handle.abort();
                ShutdownOutcome::Aborted
            }
        }
    }
}

impl Drop for SerialWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}
