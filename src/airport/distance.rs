//! Great-circle distance lookup against the distance provider

use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::airport::client::Transport;
use crate::airport::config::AirportConfig;
use crate::airport::error::{AirportError, AirportResult};
use crate::airport::types::DistanceQuery;

#[derive(Debug, Deserialize)]
struct DistanceResponse {
    data: DistanceData,
}

#[derive(Debug, Deserialize)]
struct DistanceData {
    attributes: DistanceAttributes,
}

#[derive(Debug, Deserialize)]
struct DistanceAttributes {
    kilometers: f64,
}

/// Resolves the distance between two airports, one upstream call per lookup.
pub struct DistanceResolver<T> {
    transport: T,
    distance_url: String,
}

impl<T: Transport> DistanceResolver<T> {
    pub fn new(transport: T, config: &AirportConfig) -> Self {
        Self {
            transport,
            distance_url: config.distance_url.clone(),
        }
    }

    /// Distance in kilometers between `origin` and `destination`.
    ///
    /// # Errors
    ///
    /// - `AirportError::InvalidAirportPair` for blank, malformed or identical
    ///   codes; no request is made in that case
    /// - `AirportError::UpstreamUnavailable` when the provider cannot be
    ///   reached, times out or rate-limits the call
    /// - `AirportError::Parse` when the payload lacks a usable `kilometers`
    pub async fn resolve(&self, origin: &str, destination: &str) -> AirportResult<f64> {
        let query = DistanceQuery::new(origin, destination)?;
        self.resolve_query(&query).await
    }

    pub async fn resolve_query(&self, query: &DistanceQuery) -> AirportResult<f64> {
        let body = json!({
            "from": query.origin(),
            "to": query.destination(),
        });

        let raw = self
            .transport
            .post_json(&self.distance_url, &body)
            .await
            .map_err(|e| match e {
                AirportError::RateLimited { .. } | AirportError::Timeout { .. } => {
                    AirportError::UpstreamUnavailable(format!(
                        "distance {} -> {}: {e}",
                        query.origin(),
                        query.destination()
                    ))
                }
                other => other,
            })?;
        let response: DistanceResponse = serde_json::from_slice(&raw)?;
        let km = response.data.attributes.kilometers;

        if !km.is_finite() || km < 0.0 {
            return Err(AirportError::Parse(format!(
                "distance provider returned {km} km for {} -> {}",
                query.origin(),
                query.destination()
            )));
        }

        debug!(
            "Distance {} -> {}: {km:.1} km",
            query.origin(),
            query.destination()
        );
        Ok(km)
    }
}
