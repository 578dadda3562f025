//! Airport engine error types

use std::time::Duration;
use thiserror::Error;

/// Error types for airport directory, distance and compensation operations
#[derive(Debug, Clone, Error)]
pub enum AirportError {
    /// Origin/destination pair rejected before any upstream call
    #[error("Invalid airport pair {origin:?} -> {destination:?}: {reason}")]
    InvalidAirportPair {
        origin: String,
        destination: String,
        reason: String,
    },

    /// Upstream provider unreachable or answered with a failure status
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream payload could not be understood
    #[error("Malformed upstream payload: {0}")]
    Parse(String),

    /// Provider answered 429
    #[error("Rate limited by upstream (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// Request did not complete in time
    #[error("Operation timed out: {operation} after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client setup failed
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

/// Convenience result alias for airport operations
pub type AirportResult<T> = Result<T, AirportError>;

impl AirportError {
    pub(crate) fn invalid_pair(
        origin: impl Into<String>,
        destination: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAirportPair {
            origin: origin.into(),
            destination: destination.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the upstream.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidAirportPair { .. })
    }

    /// HTTP status the inbound layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAirportPair { .. } => 400,
            Self::UpstreamUnavailable(_)
            | Self::RateLimited { .. }
            | Self::Parse(_)
            | Self::Timeout { .. }
            | Self::Config(_)
            | Self::ClientSetup(_) => 500,
        }
    }
}

impl From<reqwest::Error> for AirportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AirportError::Parse(e.to_string())
        } else {
            AirportError::UpstreamUnavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AirportError {
    fn from(e: serde_json::Error) -> Self {
        AirportError::Parse(e.to_string())
    }
}

// Convenience conversions
impl From<String> for AirportError {
    fn from(s: String) -> Self {
        AirportError::UpstreamUnavailable(s)
    }
}

impl From<&str> for AirportError {
    fn from(s: &str) -> Self {
        AirportError::UpstreamUnavailable(s.to_string())
    }
}
