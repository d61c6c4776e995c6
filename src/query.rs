use serde::{Deserialize, Serialize};

use crate::error::TripError;

/// The parameters of one flight search. Persisted verbatim alongside any leg
/// saved from its results, so round trips can be reassembled later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub from: String,
    pub to: String,
    pub depart_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub passengers: u32,
}

fn validate_airport(code: &str) -> Result<(), TripError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(TripError::InvalidAirport(code.to_string()));
    }
    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year.is_multiple_of(4) && !year.is_multiple_of(100)) || year.is_multiple_of(400) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn validate_date(date: &str) -> Result<(), TripError> {
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
        return Err(TripError::InvalidDate(date.to_string()));
    }
    let year: u32 = parts[0]
        .parse()
        .map_err(|_| TripError::InvalidDate(date.to_string()))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| TripError::InvalidDate(date.to_string()))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| TripError::InvalidDate(date.to_string()))?;

    if year < 2000 || !(1..=12).contains(&month) {
        return Err(TripError::InvalidDate(date.to_string()));
    }

    if day < 1 || day > days_in_month(year, month) {
        return Err(TripError::InvalidDate(date.to_string()));
    }

    Ok(())
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), TripError> {
        validate_airport(&self.from)?;
        validate_airport(&self.to)?;
        validate_date(&self.depart_date)?;

        // Zero-padded ISO dates compare correctly as strings.
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        if self.depart_date < today {
            return Err(TripError::Validation(
                "departure date cannot be in the past".into(),
            ));
        }

        if let Some(ref ret) = self.return_date {
            validate_date(ret)?;
            if ret.as_str() <= self.depart_date.as_str() {
                return Err(TripError::Validation(
                    "return date must be after the departure date".into(),
                ));
            }
        }

        if self.passengers == 0 {
            return Err(TripError::Validation(
                "at least one passenger required".into(),
            ));
        }
        if self.passengers > 9 {
            return Err(TripError::Validation(format!(
                "total passengers ({}) exceeds maximum of 9",
                self.passengers
            )));
        }

        Ok(())
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}
