//! Typed view of the raw flight-offers response.
//!
//! Every field the provider may omit is an `Option` or defaulted, so a
//! sparse or partially malformed payload deserializes instead of failing —
//! the normalizer decides per offer what is usable.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub data: Vec<RawOffer>,
    #[serde(default)]
    pub dictionaries: Dictionaries,
}

/// Code-to-name lookup tables shipped alongside the offers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dictionaries {
    #[serde(default)]
    pub carriers: HashMap<String, String>,
    #[serde(default)]
    pub locations: HashMap<String, RawLocation>,
}

impl Dictionaries {
    pub fn carrier_name(&self, code: &str) -> String {
        self.carriers.get(code).cloned().unwrap_or_else(|| code.to_string())
    }

    pub fn city_name(&self, iata: &str) -> String {
        self.locations
            .get(iata)
            .and_then(|loc| loc.city_code.clone())
            .unwrap_or_else(|| iata.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(default)]
    pub city_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// One priced fare option, covering one itinerary (one-way) or two
/// (round trip, index 0 outbound and index 1 return by provider contract).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOffer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub itineraries: Vec<RawItinerary>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub traveler_pricings: Vec<RawTravelerPricing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawItinerary {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    #[serde(default)]
    pub carrier_code: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub departure: Option<RawStop>,
    #[serde(default)]
    pub arrival: Option<RawStop>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStop {
    #[serde(default)]
    pub iata_code: Option<String>,
    /// Local datetime, e.g. "2026-09-01T08:30:00".
    #[serde(default)]
    pub at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPrice {
    #[serde(default)]
    pub total: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTravelerPricing {
    #[serde(default)]
    pub fare_details_by_segment: Vec<RawFareDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFareDetail {
    #[serde(default)]
    pub class: Option<String>,
}
