use serde::{Deserialize, Serialize};

use crate::query::SearchParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Return,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outbound => write!(f, "outbound"),
            Self::Return => write!(f, "return"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    FirstClass,
}

impl CabinClass {
    /// Maps a provider fare-class code to a cabin. Unknown or missing codes
    /// fall back to Economy.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("W") => Self::PremiumEconomy,
            Some("C") => Self::Business,
            Some("F") => Self::FirstClass,
            _ => Self::Economy,
        }
    }
}

impl std::fmt::Display for CabinClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Economy => write!(f, "Economy"),
            Self::PremiumEconomy => write!(f, "Premium Economy"),
            Self::Business => write!(f, "Business"),
            Self::FirstClass => write!(f, "First Class"),
        }
    }
}

/// One end of an itinerary: where and when it departs or arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub airport: String,
    pub city: String,
    pub time: String,
    pub date: String,
}

/// The flat, canonical form of one directional itinerary from one offer.
/// Produced once by the normalizer and immutable afterwards; may be persisted
/// standalone with no link to its round-trip partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    /// `{offer id}-{direction}`, unique across directions of the same offer.
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
    /// Price attributable to this itinerary alone, not the full round trip.
    pub price: f64,
    /// None when the provider's duration token could not be parsed.
    pub duration_minutes: Option<u32>,
    /// The provider's duration token, kept verbatim so presentation can show
    /// something for unparsed values.
    pub duration: String,
    pub stops: u32,
    pub cabin: CabinClass,
    pub direction: Direction,
}

/// Normalizer output: directional records partitioned by direction.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResults {
    pub outbound: Vec<FlightRecord>,
    #[serde(rename = "return")]
    pub return_flights: Vec<FlightRecord>,
    /// Count of directional records, so a round-trip offer counts as two.
    pub total_results: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripKind {
    Flight,
    Vacation,
}

/// One persisted document. Flight documents wrap a `FlightRecord` plus the
/// search that produced it; vacation documents are free-form plans. There is
/// no stored link between an outbound flight and its return — that structure
/// is rebuilt at read time by the pairing engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTrip {
    /// Storage-assigned id, distinct from the flight record's own id.
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TripKind,
    pub trip_name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_params: Option<SearchParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub passengers: u32,
    pub total_cost: f64,
    pub created_at: String,
}

impl StoredTrip {
    pub fn is_flight(&self) -> bool {
        self.kind == TripKind::Flight && self.flight.is_some()
    }
}

/// Pairing-engine output: a reconstructed round trip, or a document that
/// stands alone (an unmatched leg, or any non-flight document).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TripGroup {
    #[serde(rename_all = "camelCase")]
    RoundTrip {
        /// `{outbound id}__{return id}`.
        id: String,
        trip_name: String,
        status: String,
        created_at: String,
        outbound: Box<StoredTrip>,
        return_leg: Box<StoredTrip>,
        total_cost: f64,
    },
    Single(StoredTrip),
}

impl TripGroup {
    pub fn id(&self) -> &str {
        match self {
            Self::RoundTrip { id, .. } => id,
            Self::Single(trip) => &trip.id,
        }
    }

    pub fn total_cost(&self) -> f64 {
        match self {
            Self::RoundTrip { total_cost, .. } => *total_cost,
            Self::Single(trip) => trip.total_cost,
        }
    }
}
