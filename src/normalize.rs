//! Flattens the provider's nested offer payloads into directional
//! `FlightRecord`s.
//!
//! A round-trip offer yields two records (itinerary 0 outbound, itinerary 1
//! return, by provider contract), each carrying an even share of the offer's
//! total price so that summing legs later never doubles the fare. Defective
//! offers are skipped individually; the batch never fails.

use tracing::warn;
use uuid::Uuid;

use crate::model::{CabinClass, Direction, Endpoint, FlightRecord, NormalizedResults};
use crate::provider::{Dictionaries, RawItinerary, RawResponse};
use crate::query::SearchParams;

pub fn normalize(raw: &RawResponse, params: &SearchParams) -> NormalizedResults {
    let mut outbound = Vec::new();
    let mut return_flights = Vec::new();

    for offer in &raw.data {
        let (first, second) = match offer.itineraries.as_slice() {
            [] => {
                warn!(offer_id = ?offer.id, "skipping offer with no itineraries");
                continue;
            }
            [first] => (first, None),
            [first, second, ..] => (first, Some(second)),
        };

        let total_price = match offer.price.as_ref().and_then(|p| p.total.as_deref()) {
            Some(total) => match total.parse::<f64>() {
                Ok(p) if p >= 0.0 => p,
                _ => {
                    warn!(offer_id = ?offer.id, price = total, "skipping offer with unusable price");
                    continue;
                }
            },
            None => {
                warn!(offer_id = ?offer.id, "skipping offer with no price");
                continue;
            }
        };

        // The second itinerary only counts when the caller actually searched
        // round-trip; some providers attach throwaway itineraries for
        // fare-family display on one-way searches.
        let ret_itinerary = if params.is_round_trip() { second } else { None };
        let emitted = if ret_itinerary.is_some() { 2.0 } else { 1.0 };
        let leg_price = total_price / emitted;

        let offer_id = offer
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let cabin = CabinClass::from_code(
            offer
                .traveler_pricings
                .first()
                .and_then(|tp| tp.fare_details_by_segment.first())
                .and_then(|fd| fd.class.as_deref()),
        );

        let Some(out_record) = build_record(
            first,
            &raw.dictionaries,
            &offer_id,
            Direction::Outbound,
            leg_price,
            cabin,
        ) else {
            warn!(offer_id = %offer_id, "skipping offer with incomplete outbound segments");
            continue;
        };

        if let Some(itinerary) = ret_itinerary {
            match build_record(
                itinerary,
                &raw.dictionaries,
                &offer_id,
                Direction::Return,
                leg_price,
                cabin,
            ) {
                Some(record) => {
                    outbound.push(out_record);
                    return_flights.push(record);
                }
                None => {
                    warn!(offer_id = %offer_id, "skipping offer with incomplete return segments");
                }
            }
        } else {
            outbound.push(out_record);
        }
    }

    let total_results = outbound.len() + return_flights.len();
    NormalizedResults {
        outbound,
        return_flights,
        total_results,
    }
}

fn build_record(
    itinerary: &RawItinerary,
    dictionaries: &Dictionaries,
    offer_id: &str,
    direction: Direction,
    price: f64,
    cabin: CabinClass,
) -> Option<FlightRecord> {
    let first_seg = itinerary.segments.first()?;
    let last_seg = itinerary.segments.last()?;

    let carrier = first_seg.carrier_code.as_deref()?;
    let number = first_seg.number.as_deref().unwrap_or("");

    let departure = endpoint(first_seg.departure.as_ref()?, dictionaries)?;
    let arrival = endpoint(last_seg.arrival.as_ref()?, dictionaries)?;

    let raw_duration = itinerary.duration.clone().unwrap_or_default();

    Some(FlightRecord {
        id: format!("{offer_id}-{direction}"),
        airline: dictionaries.carrier_name(carrier),
        flight_number: format!("{carrier}{number}"),
        departure,
        arrival,
        price,
        duration_minutes: parse_duration_minutes(&raw_duration),
        duration: raw_duration,
        stops: (itinerary.segments.len() - 1) as u32,
        cabin,
        direction,
    })
}

fn endpoint(stop: &crate::provider::RawStop, dictionaries: &Dictionaries) -> Option<Endpoint> {
    let airport = stop.iata_code.clone()?;
    let at = stop.at.as_deref().unwrap_or("");
    Some(Endpoint {
        city: dictionaries.city_name(&airport),
        airport,
        time: split_time(at),
        date: split_date(at),
    })
}

fn split_date(at: &str) -> String {
    at.split('T').next().unwrap_or("").to_string()
}

fn split_time(at: &str) -> String {
    at.split('T')
        .nth(1)
        .map(|t| t.chars().take(5).collect())
        .unwrap_or_default()
}

/// Parses an ISO-8601-style duration token like "PT4H30M" into minutes.
/// Returns None for anything it does not recognize; callers keep the raw
/// token instead of failing.
pub fn parse_duration_minutes(token: &str) -> Option<u32> {
    let rest = token.strip_prefix("PT")?;
    let mut minutes: u32 = 0;
    let mut digits = String::new();
    let mut any_unit = false;

    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c == 'H' {
            minutes = minutes.checked_add(digits.parse::<u32>().ok()?.checked_mul(60)?)?;
            digits.clear();
            any_unit = true;
        } else if c == 'M' {
            minutes = minutes.checked_add(digits.parse().ok()?)?;
            digits.clear();
            any_unit = true;
        } else {
            return None;
        }
    }

    if !digits.is_empty() || !any_unit {
        return None;
    }
    Some(minutes)
}
