//! Claim eligibility lookup.
//!
//! Extraordinary circumstances outside the carrier's control never qualify.
//! Delays qualify only from three hours at arrival.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum arrival delay for a delay claim.
pub const MIN_ELIGIBLE_DELAY: Duration = Duration::from_secs(3 * 60 * 60);

/// What happened to the flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisruptionKind {
    Delay,
    Cancellation,
    DeniedBoarding,
}

/// Reason given for the disruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisruptionCause {
    TechnicalIssue,
    AirlineStaffStrike,
    Overbooking,
    Weather,
    AirTrafficControl,
    SecurityRisk,
    PoliticalInstability,
    BirdStrike,
    AirportStrike,
}

impl DisruptionCause {
    /// Causes attributable to the carrier.
    #[must_use]
    pub const fn is_airline_responsibility(&self) -> bool {
        match self {
            Self::TechnicalIssue | Self::AirlineStaffStrike | Self::Overbooking => true,
            Self::Weather
            | Self::AirTrafficControl
            | Self::SecurityRisk
            | Self::PoliticalInstability
            | Self::BirdStrike
            | Self::AirportStrike => false,
        }
    }
}

/// Whether a claim for this disruption qualifies for compensation.
///
/// `delay` is the arrival delay; it is only consulted for
/// [`DisruptionKind::Delay`].
#[must_use]
pub fn is_eligible(kind: DisruptionKind, cause: DisruptionCause, delay: Duration) -> bool {
    if !cause.is_airline_responsibility() {
        return false;
    }
    match kind {
        DisruptionKind::Delay => delay >= MIN_ELIGIBLE_DELAY,
        DisruptionKind::Cancellation | DisruptionKind::DeniedBoarding => true,
    }
}
