//! Cache entry and the freshness rules applied to it

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::airport::error::AirportError;
use crate::airport::types::AirportDirectory;

/// Lifecycle of the single cached directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing servable: never loaded, or the value is past the hard threshold.
    Empty,
    /// A caller is blocked on a synchronous load.
    Loading,
    /// Value younger than the soft threshold.
    Fresh,
    /// Value past the soft threshold, still served, no reload running.
    StaleButServing,
    /// Value still served while the background worker reloads it.
    Reloading,
}

/// Soft/hard age thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Age at which a background reload is triggered.
    pub soft: Duration,
    /// Age beyond which the value is no longer served.
    pub hard: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            soft: Duration::from_secs(24 * 60 * 60),
            hard: Duration::from_secs(2 * 24 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Freshness {
    Missing,
    Fresh,
    Stale,
    Expired,
}

#[derive(Debug)]
pub(crate) struct CacheEntry {
    pub(crate) value: Option<Arc<AirportDirectory>>,
    pub(crate) loaded_at: Option<Instant>,
    pub(crate) refreshed_at: Option<DateTime<Utc>>,
    pub(crate) state: CacheState,
    /// Incremented each time a load starts, foreground or background.
    pub(crate) load_attempts: u64,
    pub(crate) last_error: Option<AirportError>,
}

impl CacheEntry {
    pub(crate) fn empty() -> Self {
        Self {
            value: None,
            loaded_at: None,
            refreshed_at: None,
            state: CacheState::Empty,
            load_attempts: 0,
            last_error: None,
        }
    }

    pub(crate) fn age(&self, now: Instant) -> Option<Duration> {
        self.loaded_at.map(|at| now.saturating_duration_since(at))
    }

    pub(crate) fn freshness(&self, now: Instant, policy: &RefreshPolicy) -> Freshness {
        match (self.value.as_ref(), self.age(now)) {
            (Some(_), Some(age)) if age < policy.soft => Freshness::Fresh,
            (Some(_), Some(age)) if age < policy.hard => Freshness::Stale,
            (Some(_), Some(_)) => Freshness::Expired,
            _ => Freshness::Missing,
        }
    }

    /// State as an observer should see it at `now`.
    ///
    /// An expired value is never served, so it reports as `Empty`, or as
    /// `Loading` while a reload is still running.
    pub(crate) fn observed_state(&self, now: Instant, policy: &RefreshPolicy) -> CacheState {
        match (self.state, self.freshness(now, policy)) {
            (CacheState::Reloading, Freshness::Expired) => CacheState::Loading,
            (CacheState::Fresh | CacheState::StaleButServing, Freshness::Expired) => {
                CacheState::Empty
            }
            (CacheState::Fresh, Freshness::Stale) => CacheState::StaleButServing,
            (state, _) => state,
        }
    }

    /// Replace the value wholesale and mark it fresh.
    pub(crate) fn store(&mut self, directory: AirportDirectory, now: Instant) -> Arc<AirportDirectory> {
        let value = Arc::new(directory);
        self.value = Some(Arc::clone(&value));
        self.loaded_at = Some(now);
        self.refreshed_at = Some(Utc::now());
        self.state = CacheState::Fresh;
        self.last_error = None;
        value
    }

    /// Record a failed load without touching the current value.
    pub(crate) fn record_failure(&mut self, error: AirportError) {
        self.state = if self.value.is_some() {
            CacheState::StaleButServing
        } else {
            CacheState::Empty
        };
        self.last_error = Some(error);
    }
}
