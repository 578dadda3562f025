//! Airport network module
//!
//! Directory ingestion, the refresh-ahead directory cache, and distance
//! resolution against the upstream airport provider.

pub mod cache;
pub mod client;
pub mod config;
pub mod directory;
pub mod distance;
pub mod error;
pub mod types;

pub use cache::{CacheState, DirectoryLoader, RefreshAheadCache, RefreshPolicy};
pub use client::{HttpTransport, HttpTransportBuilder, Transport};
pub use config::AirportConfig;
pub use directory::PagedDirectoryFetcher;
pub use distance::DistanceResolver;
pub use error::{AirportError, AirportResult};
pub use types::{AirportDirectory, AirportRecord, DistanceQuery};
