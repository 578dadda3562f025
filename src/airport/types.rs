//! Type definitions for the airport directory and distance queries

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::airport::error::{AirportError, AirportResult};

lazy_static! {
    static ref IATA_RE: Result<Regex, regex::Error> = Regex::new(r"^[A-Z]{3}$");
}

/// One airport as listed by the directory provider.
///
/// Identity is the IATA `code`; two records with the same code describe the
/// same airport.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AirportRecord {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl AirportRecord {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            city: city.into(),
            country: country.into(),
        }
    }
}

/// A complete snapshot of the airport directory, in upstream page order.
#[derive(Clone, Serialize, Debug, Default, PartialEq, Eq)]
pub struct AirportDirectory {
    airports: Vec<AirportRecord>,
}

impl AirportDirectory {
    #[must_use]
    pub fn new(airports: Vec<AirportRecord>) -> Self {
        Self { airports }
    }

    #[must_use]
    pub fn airports(&self) -> &[AirportRecord] {
        &self.airports
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportRecord> {
        self.airports.iter()
    }

    /// Exact lookup by IATA code, ignoring case.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&AirportRecord> {
        let code = code.trim();
        self.airports
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code))
    }

    /// Autocomplete-style search.
    ///
    /// Matches a code prefix or a name/city substring, case-insensitively,
    /// and returns at most `limit` records in directory order. A blank query
    /// matches nothing.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<&AirportRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.airports
            .iter()
            .filter(|a| {
                a.code.to_lowercase().starts_with(&needle)
                    || a.name.to_lowercase().contains(&needle)
                    || a.city.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }
}

impl IntoIterator for AirportDirectory {
    type Item = AirportRecord;
    type IntoIter = std::vec::IntoIter<AirportRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.airports.into_iter()
    }
}

/// Validated origin/destination pair for a distance lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceQuery {
    origin: String,
    destination: String,
}

impl DistanceQuery {
    /// Normalise and validate a pair of IATA codes.
    ///
    /// Codes are trimmed and upper-cased. Both must be three ASCII letters and
    /// they must differ.
    ///
    /// # Errors
    ///
    /// Returns `AirportError::InvalidAirportPair` when a code is blank,
    /// malformed, or both codes name the same airport.
    pub fn new(origin: &str, destination: &str) -> AirportResult<Self> {
        let from = origin.trim().to_ascii_uppercase();
        let to = destination.trim().to_ascii_uppercase();

        if from.is_empty() || to.is_empty() {
            return Err(AirportError::invalid_pair(
                origin,
                destination,
                "airport code must not be empty",
            ));
        }

        for code in [&from, &to] {
            if !is_iata_code(code) {
                return Err(AirportError::invalid_pair(
                    origin,
                    destination,
                    format!("{code:?} is not a three-letter IATA code"),
                ));
            }
        }

        if from == to {
            return Err(AirportError::invalid_pair(
                origin,
                destination,
                "origin and destination must differ",
            ));
        }

        Ok(Self {
            origin: from,
            destination: to,
        })
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

fn is_iata_code(code: &str) -> bool {
    match IATA_RE.as_ref() {
        Ok(re) => re.is_match(code),
        Err(_) => code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()),
    }
}
