//! JSON shapes of the paginated airport listing

use serde::Deserialize;

use crate::airport::types::AirportRecord;

/// One page of the listing: `{ data: [...], links: {...} }`.
#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryPage {
    pub(crate) data: Vec<AirportResource>,
    #[serde(default)]
    pub(crate) links: Option<PageLinks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirportResource {
    pub(crate) attributes: AirportAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirportAttributes {
    #[serde(default)]
    pub(crate) iata: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) city: String,
    #[serde(default)]
    pub(crate) country: String,
}

impl AirportAttributes {
    /// `None` when the provider listed an airport without an IATA code.
    pub(crate) fn into_record(self) -> Option<AirportRecord> {
        let code = self.iata.trim().to_ascii_uppercase();
        if code.is_empty() {
            return None;
        }
        Some(AirportRecord {
            code,
            name: self.name,
            city: self.city,
            country: self.country,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageLinks {
    #[serde(rename = "self", default)]
    pub(crate) current: Option<String>,
    #[serde(default)]
    pub(crate) next: Option<String>,
    #[serde(default)]
    pub(crate) last: Option<String>,
}

impl PageLinks {
    /// URL of the following page, if the listing continues past this one.
    ///
    /// The listing is finished once `self` points at `last`, even when the
    /// provider still advertises a `next` link. Both links must be present
    /// for that check; otherwise `next` is followed.
    pub(crate) fn continuation(&self) -> Option<&str> {
        let next = self.next.as_deref().filter(|n| !n.trim().is_empty())?;
        if matches!((&self.current, &self.last), (Some(c), Some(l)) if c == l) {
            return None;
        }
        Some(next)
    }
}
