//! Reconstructs round trips from independently saved one-way legs.
//!
//! The store keeps no link between an outbound leg and its return, so the
//! grouping is rebuilt on every read: an outbound leg pairs with the first
//! return leg from the same search (matching search-parameter key), or
//! failing that, the first return leg whose airports mirror its own. Legs
//! that match nothing surface as singles, as do all non-flight documents.

use std::collections::HashSet;

use crate::model::{Direction, StoredTrip, TripGroup};

/// Case-insensitive, whitespace-normalized identity of the search that
/// produced a leg. Absent without a return date: one-way searches are never
/// pairable by key, only by the airport-mirror fallback.
fn group_key(trip: &StoredTrip) -> Option<(String, String, String, String)> {
    let params = trip.search_params.as_ref()?;
    let ret = params.return_date.as_deref()?;
    Some((
        norm(&params.from),
        norm(&params.to),
        norm(&params.depart_date),
        norm(ret),
    ))
}

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

fn direction_of(trip: &StoredTrip) -> Option<Direction> {
    trip.flight.as_ref().map(|f| f.direction)
}

/// True when `ret`'s route is the reverse of `out`'s.
fn airports_mirror(out: &StoredTrip, ret: &StoredTrip) -> bool {
    let (Some(of), Some(rf)) = (out.flight.as_ref(), ret.flight.as_ref()) else {
        return false;
    };
    norm(&rf.departure.airport) == norm(&of.arrival.airport)
        && norm(&rf.arrival.airport) == norm(&of.departure.airport)
}

fn round_trip(outbound: &StoredTrip, ret: &StoredTrip) -> TripGroup {
    let inherit = |a: &str, b: &str| {
        if a.is_empty() { b.to_string() } else { a.to_string() }
    };
    TripGroup::RoundTrip {
        id: format!("{}__{}", outbound.id, ret.id),
        trip_name: inherit(&outbound.trip_name, &ret.trip_name),
        status: inherit(&outbound.status, &ret.status),
        created_at: inherit(&outbound.created_at, &ret.created_at),
        total_cost: outbound.total_cost + ret.total_cost,
        outbound: Box::new(outbound.clone()),
        return_leg: Box::new(ret.clone()),
    }
}

/// Groups a user's stored documents for display. Every input document lands
/// in exactly one group; pairing is greedy, first match in input order wins.
/// Assumes document ids are unique within the input.
pub fn pair(trips: &[StoredTrip]) -> Vec<TripGroup> {
    let (flights, others): (Vec<&StoredTrip>, Vec<&StoredTrip>) =
        trips.iter().partition(|t| t.is_flight());

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();

    for leg in &flights {
        if direction_of(leg) != Some(Direction::Outbound) || consumed.contains(leg.id.as_str()) {
            continue;
        }

        // Rule (a): exact same search, checked across all candidates before
        // the airport heuristic is attempted.
        let key = group_key(leg);
        let mut matched = key.as_ref().and_then(|k| {
            flights.iter().find(|m| {
                direction_of(m) == Some(Direction::Return)
                    && !consumed.contains(m.id.as_str())
                    && group_key(m).as_ref() == Some(k)
            })
        });

        // Rule (b): airports mirror, for legs saved from separate searches.
        if matched.is_none() {
            matched = flights.iter().find(|m| {
                direction_of(m) == Some(Direction::Return)
                    && !consumed.contains(m.id.as_str())
                    && airports_mirror(leg, m)
            });
        }

        consumed.insert(leg.id.as_str());
        match matched {
            Some(ret) => {
                consumed.insert(ret.id.as_str());
                groups.push(round_trip(leg, ret));
            }
            None => groups.push(TripGroup::Single((*leg).clone())),
        }
    }

    // Return legs nothing claimed.
    for leg in &flights {
        if !consumed.contains(leg.id.as_str()) {
            groups.push(TripGroup::Single((*leg).clone()));
        }
    }

    // Non-flight documents bypass pairing, order preserved.
    groups.extend(others.into_iter().cloned().map(TripGroup::Single));

    groups
}
