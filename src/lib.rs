//! `flight_compensation` - airport network cache and compensation engine
//!
//! This library backs the claim workflow of a flight-disruption service. It
//! keeps a refresh-ahead cache of the paginated upstream airport directory
//! and turns airport pairs into compensation tiers via the distance provider.

// Module declarations
pub mod airport;
pub mod compensation;
pub mod engine;
pub mod runtime;

// Re-export runtime types
pub use runtime::{AsyncTask, SerialWorker, ShutdownOutcome, SubmitError};

// Re-export airport types
pub use airport::{
    AirportConfig, AirportDirectory, AirportError, AirportRecord, AirportResult, CacheState,
    DirectoryLoader, DistanceQuery, DistanceResolver, HttpTransport, HttpTransportBuilder,
    PagedDirectoryFetcher, RefreshAheadCache, RefreshPolicy, Transport,
};

// Re-export compensation types
pub use compensation::{
    CompensationClassifier, CompensationQuote, CompensationService, CompensationTier,
    CompensationTiers, DisruptionCause, DisruptionKind, is_eligible,
};

pub use engine::AirportEngine;
