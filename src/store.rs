//! Flat local document store for saved flights and vacation plans.
//!
//! Documents are independent: saving both directions of a round trip writes
//! two unlinked flight documents. `pair::pair` reassembles the structure
//! when trips are listed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::TripError;
use crate::model::{FlightRecord, StoredTrip, TripKind};
use crate::query::SearchParams;

pub struct TripStore {
    path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct VacationPlan {
    pub trip_name: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub passengers: u32,
    pub budget: f64,
    pub notes: Option<String>,
}

impl TripStore {
    pub fn open_default() -> Result<Self, TripError> {
        let base = dirs::data_dir()
            .ok_or_else(|| TripError::Store("no data directory on this platform".into()))?;
        Ok(Self::at(base.join("tripr").join("trips.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<StoredTrip>, TripError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TripError::Store(e.to_string())),
        };
        serde_json::from_str(&text).map_err(|e| TripError::Store(e.to_string()))
    }

    fn persist(&self, trips: &[StoredTrip]) -> Result<(), TripError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TripError::Store(e.to_string()))?;
        }
        let text =
            serde_json::to_string_pretty(trips).map_err(|e| TripError::Store(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| TripError::Store(e.to_string()))
    }

    /// Saves one directional flight record as its own document. Cost is the
    /// per-person price times the passenger count from the search.
    pub fn save_flight(
        &self,
        user_id: &str,
        flight: FlightRecord,
        search_params: Option<&SearchParams>,
    ) -> Result<StoredTrip, TripError> {
        let passengers = search_params.map(|p| p.passengers).unwrap_or(1);
        let trip = StoredTrip {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: TripKind::Flight,
            trip_name: format!("{} to {}", flight.departure.city, flight.arrival.city),
            status: "saved".to_string(),
            total_cost: flight.price * passengers as f64,
            flight: Some(flight),
            search_params: search_params.cloned(),
            destination: None,
            start_date: None,
            end_date: None,
            notes: None,
            passengers,
            created_at: Utc::now().to_rfc3339(),
        };

        let mut trips = self.load()?;
        trips.push(trip.clone());
        self.persist(&trips)?;
        Ok(trip)
    }

    pub fn create_vacation(
        &self,
        user_id: &str,
        plan: VacationPlan,
    ) -> Result<StoredTrip, TripError> {
        if plan.trip_name.trim().is_empty() {
            return Err(TripError::Validation("trip name is required".into()));
        }
        if plan.destination.trim().is_empty() {
            return Err(TripError::Validation("destination is required".into()));
        }
        if plan.end_date <= plan.start_date {
            return Err(TripError::Validation(
                "end date must be after the start date".into(),
            ));
        }

        let trip = StoredTrip {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: TripKind::Vacation,
            trip_name: plan.trip_name,
            status: "planning".to_string(),
            flight: None,
            search_params: None,
            destination: Some(plan.destination),
            start_date: Some(plan.start_date),
            end_date: Some(plan.end_date),
            notes: plan.notes,
            passengers: plan.passengers.max(1),
            total_cost: plan.budget,
            created_at: Utc::now().to_rfc3339(),
        };

        let mut trips = self.load()?;
        trips.push(trip.clone());
        self.persist(&trips)?;
        Ok(trip)
    }

    /// All documents belonging to one user, in insertion order. The store has
    /// no join capability; callers run the result through the pairing engine.
    pub fn trips_for(&self, user_id: &str) -> Result<Vec<StoredTrip>, TripError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect())
    }

    pub fn delete(&self, trip_id: &str) -> Result<(), TripError> {
        let mut trips = self.load()?;
        let before = trips.len();
        trips.retain(|t| t.id != trip_id);
        if trips.len() == before {
            return Err(TripError::NotFound(trip_id.to_string()));
        }
        self.persist(&trips)
    }
}
