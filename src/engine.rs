//! Production wiring of the directory cache and compensation pipeline.

use std::sync::Arc;
use std::time::Duration;

use crate::airport::{
    AirportConfig, AirportDirectory, AirportResult, HttpTransport, PagedDirectoryFetcher,
    RefreshAheadCache,
};
use crate::compensation::{CompensationQuote, CompensationService};
use crate::runtime::ShutdownOutcome;

type SharedTransport = Arc<HttpTransport>;

/// Directory cache plus compensation service over one shared HTTP client.
///
/// # Example
///
/// ```rust,no_run
/// use flight_compensation::{AirportConfig, AirportEngine};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let engine = AirportEngine::from_config(AirportConfig::from_env()?)?;
///
///     let quote = engine.quote("FRA", "JFK").await?;
///     println!("{} km -> {} EUR", quote.distance_km, quote.amount);
///
///     engine.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct AirportEngine {
    directory: RefreshAheadCache<PagedDirectoryFetcher<SharedTransport>>,
    compensation: CompensationService<SharedTransport>,
    shutdown_grace: Duration,
}

impl AirportEngine {
    /// Build the engine. Must run inside a tokio runtime.
    pub fn from_config(config: AirportConfig) -> AirportResult<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::from_config(&config)?);

        let fetcher = PagedDirectoryFetcher::new(Arc::clone(&transport), &config);
        Ok(Self {
            directory: RefreshAheadCache::from_config(fetcher, &config),
            compensation: CompensationService::from_config(transport, &config),
            shutdown_grace: config.shutdown_grace,
        })
    }

    pub fn directory_cache(&self) -> &RefreshAheadCache<PagedDirectoryFetcher<SharedTransport>> {
        &self.directory
    }

    /// Current airport directory (see [`RefreshAheadCache::get`]).
    pub async fn airports(&self) -> AirportResult<Arc<AirportDirectory>> {
        self.directory.get().await
    }

    pub async fn quote(&self, origin: &str, destination: &str) -> AirportResult<CompensationQuote> {
        self.compensation.quote(origin, destination).await
    }

    /// Drain the directory reload worker within the configured grace period.
    pub async fn shutdown(&self) -> ShutdownOutcome {
        self.directory.shutdown(self.shutdown_grace).await
    }
}
