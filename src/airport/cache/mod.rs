//! Refresh-ahead cache for the airport directory
//!
//! Holds one directory under one logical key. Reads below the soft threshold
//! return immediately. Between the soft and hard thresholds the old value is
//! still returned while a single reload runs on the cache's own background
//! worker. Past the hard threshold, or before the first load, the caller
//! waits for a synchronous load.
//!
//! Loads never overlap: foreground and background loads share one gate, and a
//! caller that waited at the gate reuses whatever the previous holder
//! produced, success or failure.

mod entry;

pub use entry::{CacheState, RefreshPolicy};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use log::{debug, error, info, warn};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::airport::config::AirportConfig;
use crate::airport::error::AirportResult;
use crate::airport::types::AirportDirectory;
use crate::runtime::{SerialWorker, ShutdownOutcome};

use entry::{CacheEntry, Freshness};

/// Reload strategy invoked by the cache.
pub trait DirectoryLoader: Send + Sync + 'static {
    /// Produce a complete directory snapshot.
    fn load(&self) -> impl Future<Output = AirportResult<AirportDirectory>> + Send;
}

struct Shared<L> {
    loader: L,
    policy: RefreshPolicy,
    entry: Mutex<CacheEntry>,
    load_gate: Mutex<()>,
}

/// Single-entry refresh-ahead cache.
pub struct RefreshAheadCache<L> {
    shared: Arc<Shared<L>>,
    worker: SerialWorker,
}

impl<L: DirectoryLoader> RefreshAheadCache<L> {
    /// Create an empty cache. Nothing is fetched until the first `get`.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime (the reload worker is
    /// spawned here).
    pub fn new(loader: L, policy: RefreshPolicy) -> Self {
        Self {
            shared: Arc::new(Shared {
                loader,
                policy,
                entry: Mutex::new(CacheEntry::empty()),
                load_gate: Mutex::new(()),
            }),
            worker: SerialWorker::spawn("directory-reload", 1),
        }
    }

    pub fn from_config(loader: L, config: &AirportConfig) -> Self {
        Self::new(
            loader,
            RefreshPolicy {
                soft: config.soft_refresh,
                hard: config.hard_expiry,
            },
        )
    }

    /// Return the current directory, loading or reloading as its age requires.
    ///
    /// # Errors
    ///
    /// Fails only when a synchronous load is needed (nothing cached yet, or
    /// the cached value is past the hard threshold) and that load fails.
    pub async fn get(&self) -> AirportResult<Arc<AirportDirectory>> {
        let seen_attempts = {
            let mut entry = self.shared.entry.lock().await;
            let now = Instant::now();

            match (entry.freshness(now, &self.shared.policy), entry.value.clone()) {
                (Freshness::Fresh, Some(value)) => return Ok(value),
                (Freshness::Stale, Some(value)) => {
                    if entry.state == CacheState::Reloading {
                        debug!("Serving stale directory, reload already in flight");
                    } else {
                        entry.state = CacheState::Reloading;
                        drop(entry);
                        self.schedule_reload().await;
                    }
                    return Ok(value);
                }
                (Freshness::Expired, _) => {
                    warn!(
                        "Cached directory is older than {:?}, reloading synchronously",
                        self.shared.policy.hard
                    );
                }
                _ => {}
            }
            entry.load_attempts
        };

        self.shared.load_foreground(Some(seen_attempts)).await
    }

    /// Reload synchronously regardless of the current value's age.
    pub async fn refresh(&self) -> AirportResult<Arc<AirportDirectory>> {
        self.shared.load_foreground(None).await
    }

    /// Current value without triggering any load.
    pub async fn peek(&self) -> Option<Arc<AirportDirectory>> {
        self.shared.entry.lock().await.value.clone()
    }

    pub async fn state(&self) -> CacheState {
        self.shared
            .entry
            .lock()
            .await
            .observed_state(Instant::now(), &self.shared.policy)
    }

    /// Age of the cached value.
    pub async fn age(&self) -> Option<Duration> {
        self.shared.entry.lock().await.age(Instant::now())
    }

    /// Wall-clock time of the last successful load.
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.shared.entry.lock().await.refreshed_at
    }

    /// Stop the reload worker, waiting at most `grace` for a running reload.
    pub async fn shutdown(&self, grace: Duration) -> ShutdownOutcome {
        let outcome = self.worker.shutdown(grace).await;

        // An aborted reload never reports back.
        self.shared.settle_reload().await;
        info!("Directory cache shut down: {outcome:?}");
        outcome
    }

    async fn schedule_reload(&self) {
        let shared = Arc::clone(&self.shared);
        match self
            .worker
            .try_submit(async move {
                if AssertUnwindSafe(shared.load_background())
                    .catch_unwind()
                    .await
                    .is_err()
                {
                    error!("Background directory reload panicked");
                    shared.settle_reload().await;
                }
            })
            .await
        {
            Ok(_) => debug!("Directory past soft threshold, background reload queued"),
            Err(e) => {
                warn!("Background directory reload not scheduled: {e}");
                self.shared.settle_reload().await;
            }
        }
    }
}

impl<L: DirectoryLoader> Shared<L> {
    /// Clear a `Reloading` mark left by a reload that will never report back.
    async fn settle_reload(&self) {
        let mut entry = self.entry.lock().await;
        if entry.state == CacheState::Reloading {
            entry.state = CacheState::StaleButServing;
        }
    }

    /// Blocking load. With `seen_attempts`, a load completed by someone else
    /// while this caller waited at the gate is reused instead of repeated.
    async fn load_foreground(
        &self,
        seen_attempts: Option<u64>,
    ) -> AirportResult<Arc<AirportDirectory>> {
        let _gate = self.load_gate.lock().await;

        {
            let mut entry = self.entry.lock().await;
            if let Some(seen) = seen_attempts {
                let freshness = entry.freshness(Instant::now(), &self.policy);
                if let (Freshness::Fresh | Freshness::Stale, Some(value)) =
                    (freshness, entry.value.clone())
                {
                    return Ok(value);
                }
                if entry.load_attempts != seen
                    && let Some(err) = entry.last_error.clone()
                {
                    return Err(err);
                }
            }
            entry.load_attempts += 1;
            entry.state = CacheState::Loading;
        }

        let result = self.loader.load().await;

        let mut entry = self.entry.lock().await;
        match result {
            Ok(directory) => {
                info!("Airport directory loaded: {} airports", directory.len());
                Ok(entry.store(directory, Instant::now()))
            }
            Err(err) => {
                error!("Airport directory load failed: {err}");
                entry.record_failure(err.clone());
                Err(err)
            }
        }
    }

    /// Reload on the worker. Failures stay here; the old value keeps serving.
    async fn load_background(&self) {
        let _gate = self.load_gate.lock().await;

        {
            let mut entry = self.entry.lock().await;
            if entry.freshness(Instant::now(), &self.policy) == Freshness::Fresh {
                debug!("Directory already refreshed, skipping background reload");
                return;
            }
            entry.load_attempts += 1;
            entry.state = CacheState::Reloading;
        }

        let result = self.loader.load().await;

        let mut entry = self.entry.lock().await;
        match result {
            Ok(directory) => {
                info!(
                    "Airport directory refreshed in background: {} airports",
                    directory.len()
                );
                entry.store(directory, Instant::now());
            }
            Err(err) => {
                warn!("Background directory reload failed, serving stale value: {err}");
                entry.record_failure(err);
            }
        }
    }
}
