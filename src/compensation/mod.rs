//! Compensation tiers and claim eligibility
//!
//! Distances map onto three fixed tiers, each with a configurable amount.

pub mod eligibility;
pub mod service;

pub use eligibility::{DisruptionCause, DisruptionKind, is_eligible};
pub use service::{CompensationQuote, CompensationService};

use serde::Serialize;

use crate::airport::error::{AirportError, AirportResult};

/// Discrete compensation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompensationTier {
    /// Short haul
    Low,
    /// Medium haul
    Mid,
    /// Long haul
    High,
}

impl CompensationTier {
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Mid => "MID",
            Self::High => "HIGH",
        }
    }
}

/// Tier boundaries in kilometers and the amount paid per tier.
///
/// `Low` covers `[0, low_max_km)`, `Mid` covers `[low_max_km, mid_max_km]`,
/// `High` everything above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensationTiers {
    pub low_max_km: f64,
    pub mid_max_km: f64,
    pub low_amount: u32,
    pub mid_amount: u32,
    pub high_amount: u32,
}

impl Default for CompensationTiers {
    fn default() -> Self {
        Self {
            low_max_km: 1500.0,
            mid_max_km: 3500.0,
            low_amount: 250,
            mid_amount: 400,
            high_amount: 600,
        }
    }
}

impl CompensationTiers {
    pub fn validate(&self) -> AirportResult<()> {
        if !self.low_max_km.is_finite() || !self.mid_max_km.is_finite() {
            return Err(AirportError::Config("tier bounds must be finite".to_string()));
        }
        if self.low_max_km < 0.0 || self.low_max_km > self.mid_max_km {
            return Err(AirportError::Config(format!(
                "tier bounds must satisfy 0 <= low ({}) <= mid ({})",
                self.low_max_km, self.mid_max_km
            )));
        }
        Ok(())
    }
}

/// Maps a distance onto a [`CompensationTier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensationClassifier {
    tiers: CompensationTiers,
}

impl CompensationClassifier {
    #[must_use]
    pub fn new(tiers: CompensationTiers) -> Self {
        Self { tiers }
    }

    #[must_use]
    pub fn tiers(&self) -> &CompensationTiers {
        &self.tiers
    }

    /// Tier for `distance_km`.
    ///
    /// Total over `f64`: negative distances and NaN fall into `Low`.
    #[must_use]
    pub fn classify(&self, distance_km: f64) -> CompensationTier {
        if distance_km.is_nan() || distance_km < self.tiers.low_max_km {
            CompensationTier::Low
        } else if distance_km <= self.tiers.mid_max_km {
            CompensationTier::Mid
        } else {
            CompensationTier::High
        }
    }

    #[must_use]
    pub fn amount(&self, tier: CompensationTier) -> u32 {
        match tier {
            CompensationTier::Low => self.tiers.low_amount,
            CompensationTier::Mid => self.tiers.mid_amount,
            CompensationTier::High => self.tiers.high_amount,
        }
    }

    /// Amount owed for a flight of `distance_km`.
    #[must_use]
    pub fn compensation_for(&self, distance_km: f64) -> u32 {
        self.amount(self.classify(distance_km))
    }
}
