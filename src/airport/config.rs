//! Configuration for the airport engine
//!
//! Values start from [`AirportConfig::default`], may be overlaid by a TOML
//! file, and are finally overridden by `FLIGHT_*` environment variables.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::airport::error::{AirportError, AirportResult};
use crate::compensation::CompensationTiers;

pub const ENV_DIRECTORY_URL: &str = "FLIGHT_DIRECTORY_URL";
pub const ENV_DISTANCE_URL: &str = "FLIGHT_DISTANCE_URL";
pub const ENV_API_TOKEN: &str = "FLIGHT_API_TOKEN";
pub const ENV_CACHE_SOFT_SECS: &str = "FLIGHT_CACHE_SOFT_SECS";
pub const ENV_CACHE_HARD_SECS: &str = "FLIGHT_CACHE_HARD_SECS";
pub const ENV_PAGE_DELAY_MS: &str = "FLIGHT_PAGE_DELAY_MS";
pub const ENV_MAX_PAGES: &str = "FLIGHT_MAX_PAGES";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "FLIGHT_HTTP_TIMEOUT_SECS";
pub const ENV_TIER_LOW_MAX_KM: &str = "FLIGHT_TIER_LOW_MAX_KM";
pub const ENV_TIER_MID_MAX_KM: &str = "FLIGHT_TIER_MID_MAX_KM";
pub const ENV_TIER_LOW_AMOUNT: &str = "FLIGHT_TIER_LOW_AMOUNT";
pub const ENV_TIER_MID_AMOUNT: &str = "FLIGHT_TIER_MID_AMOUNT";
pub const ENV_TIER_HIGH_AMOUNT: &str = "FLIGHT_TIER_HIGH_AMOUNT";

/// Configuration for directory fetching, caching and compensation
#[derive(Debug, Clone)]
pub struct AirportConfig {
    pub directory_url: String,
    pub distance_url: String,
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub page_delay: Duration,
    pub max_pages: usize,
    pub max_rate_limit_retries: u32,
    pub max_retry_wait: Duration,
    pub soft_refresh: Duration,
    pub hard_expiry: Duration,
    pub shutdown_grace: Duration,
    pub tiers: CompensationTiers,
}

impl Default for AirportConfig {
    fn default() -> Self {
        Self {
            directory_url: "https://airportgap.com/api/airports".to_string(),
            distance_url: "https://airportgap.com/api/airports/distance".to_string(),
            api_token: None,
            http_timeout: Duration::from_secs(10),
            page_delay: Duration::from_millis(1000), // provider allows ~100 requests/minute
            max_pages: 500,
            max_rate_limit_retries: 3,
            max_retry_wait: Duration::from_secs(60),
            soft_refresh: Duration::from_secs(24 * 60 * 60), // 1 day
            hard_expiry: Duration::from_secs(2 * 24 * 60 * 60), // 2 days
            shutdown_grace: Duration::from_secs(5),
            tiers: CompensationTiers::default(),
        }
    }
}

/// On-disk shape: every key optional, units spelled out in the key name.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    directory_url: Option<String>,
    distance_url: Option<String>,
    api_token: Option<String>,
    http_timeout_secs: Option<u64>,
    page_delay_ms: Option<u64>,
    max_pages: Option<usize>,
    max_rate_limit_retries: Option<u32>,
    max_retry_wait_secs: Option<u64>,
    cache_soft_secs: Option<u64>,
    cache_hard_secs: Option<u64>,
    shutdown_grace_secs: Option<u64>,
    tier_low_max_km: Option<f64>,
    tier_mid_max_km: Option<f64>,
    tier_low_amount: Option<u32>,
    tier_mid_amount: Option<u32>,
    tier_high_amount: Option<u32>,
}

impl AirportConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> AirportResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(raw: &str) -> AirportResult<Self> {
        let file: FileConfig =
            toml::from_str(raw).map_err(|e| AirportError::Config(e.to_string()))?;
        let mut config = Self::default();
        config.apply_file(file);
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, then apply environment overrides.
    pub fn load_file(path: &Path) -> AirportResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AirportError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `FLIGHT_*` overrides resolved through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> AirportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DIRECTORY_URL) {
            self.directory_url = url;
        }
        if let Some(url) = lookup(ENV_DISTANCE_URL) {
            self.distance_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_CACHE_SOFT_SECS)? {
            self.soft_refresh = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_CACHE_HARD_SECS)? {
            self.hard_expiry = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_PAGE_DELAY_MS)? {
            self.page_delay = Duration::from_millis(ms);
        }
        if let Some(pages) = parse_var::<usize, _>(&lookup, ENV_MAX_PAGES)? {
            self.max_pages = pages;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_HTTP_TIMEOUT_SECS)? {
            self.http_timeout = Duration::from_secs(secs);
        }
        if let Some(km) = parse_var::<f64, _>(&lookup, ENV_TIER_LOW_MAX_KM)? {
            self.tiers.low_max_km = km;
        }
        if let Some(km) = parse_var::<f64, _>(&lookup, ENV_TIER_MID_MAX_KM)? {
            self.tiers.mid_max_km = km;
        }
        if let Some(amount) = parse_var::<u32, _>(&lookup, ENV_TIER_LOW_AMOUNT)? {
            self.tiers.low_amount = amount;
        }
        if let Some(amount) = parse_var::<u32, _>(&lookup, ENV_TIER_MID_AMOUNT)? {
            self.tiers.mid_amount = amount;
        }
        if let Some(amount) = parse_var::<u32, _>(&lookup, ENV_TIER_HIGH_AMOUNT)? {
            self.tiers.high_amount = amount;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject combinations the cache and classifier cannot honour.
    pub fn validate(&self) -> AirportResult<()> {
        if self.directory_url.trim().is_empty() {
            return Err(AirportError::Config("directory URL is empty".to_string()));
        }
        if self.distance_url.trim().is_empty() {
            return Err(AirportError::Config("distance URL is empty".to_string()));
        }
        if self.soft_refresh >= self.hard_expiry {
            return Err(AirportError::Config(format!(
                "soft refresh ({:?}) must be shorter than hard expiry ({:?})",
                self.soft_refresh, self.hard_expiry
            )));
        }
        if self.max_pages == 0 {
            return Err(AirportError::Config("max_pages must be at least 1".to_string()));
        }
        self.tiers.validate()
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.directory_url {
            self.directory_url = v;
        }
        if let Some(v) = file.distance_url {
            self.distance_url = v;
        }
        if file.api_token.is_some() {
            self.api_token = file.api_token;
        }
        if let Some(v) = file.http_timeout_secs {
            self.http_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.page_delay_ms {
            self.page_delay = Duration::from_millis(v);
        }
        if let Some(v) = file.max_pages {
            self.max_pages = v;
        }
        if let Some(v) = file.max_rate_limit_retries {
            self.max_rate_limit_retries = v;
        }
        if let Some(v) = file.max_retry_wait_secs {
            self.max_retry_wait = Duration::from_secs(v);
        }
        if let Some(v) = file.cache_soft_secs {
            self.soft_refresh = Duration::from_secs(v);
        }
        if let Some(v) = file.cache_hard_secs {
            self.hard_expiry = Duration::from_secs(v);
        }
        if let Some(v) = file.shutdown_grace_secs {
            self.shutdown_grace = Duration::from_secs(v);
        }
        if let Some(v) = file.tier_low_max_km {
            self.tiers.low_max_km = v;
        }
        if let Some(v) = file.tier_mid_max_km {
            self.tiers.mid_max_km = v;
        }
        if let Some(v) = file.tier_low_amount {
            self.tiers.low_amount = v;
        }
        if let Some(v) = file.tier_mid_amount {
            self.tiers.mid_amount = v;
        }
        if let Some(v) = file.tier_high_amount {
            self.tiers.high_amount = v;
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> AirportResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AirportError::Config(format!("{key}={raw:?}: {e}"))),
    }
}
