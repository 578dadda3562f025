//! Distance-to-compensation pipeline consumed by the claim workflow.

use serde::Serialize;

use crate::airport::client::Transport;
use crate::airport::config::AirportConfig;
use crate::airport::distance::DistanceResolver;
use crate::airport::error::AirportResult;
use crate::airport::types::DistanceQuery;
use crate::compensation::{CompensationClassifier, CompensationTier};

/// Result of a compensation lookup.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct CompensationQuote {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub tier: CompensationTier,
    pub amount: u32,
}

/// Resolves distance, then classifies it. No caching on this path.
pub struct CompensationService<T> {
    resolver: DistanceResolver<T>,
    classifier: CompensationClassifier,
}

impl<T: Transport> CompensationService<T> {
    pub fn new(resolver: DistanceResolver<T>, classifier: CompensationClassifier) -> Self {
        Self {
            resolver,
            classifier,
        }
    }

    pub fn from_config(transport: T, config: &AirportConfig) -> Self {
        Self::new(
            DistanceResolver::new(transport, config),
            CompensationClassifier::new(config.tiers),
        )
    }

    /// Quote compensation for a flight between two IATA codes.
    ///
    /// # Errors
    ///
    /// Propagates `AirportError::InvalidAirportPair` (client fault) and
    /// upstream failures from the distance provider unchanged.
    pub async fn quote(&self, origin: &str, destination: &str) -> AirportResult<CompensationQuote> {
        let query = DistanceQuery::new(origin, destination)?;
        let distance_km = self.resolver.resolve_query(&query).await?;
        let tier = self.classifier.classify(distance_km);

        Ok(CompensationQuote {
            origin: query.origin().to_string(),
            destination: query.destination().to_string(),
            distance_km,
            tier,
            amount: self.classifier.amount(tier),
        })
    }

    /// Amount only, for callers that do not need the breakdown.
    pub async fn amount(&self, origin: &str, destination: &str) -> AirportResult<u32> {
        Ok(self.quote(origin, destination).await?.amount)
    }
}
