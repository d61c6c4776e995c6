use tripr::model::{
    CabinClass, Direction, Endpoint, FlightRecord, StoredTrip, TripGroup, TripKind,
};
use tripr::pair::pair;
use tripr::query::SearchParams;

fn endpoint(airport: &str, date: &str) -> Endpoint {
    Endpoint {
        airport: airport.into(),
        city: airport.into(),
        time: "10:00".into(),
        date: date.into(),
    }
}

fn record(direction: Direction, from: &str, to: &str, date: &str) -> FlightRecord {
    FlightRecord {
        id: format!("offer-{direction}"),
        airline: "British Airways".into(),
        flight_number: "BA112".into(),
        departure: endpoint(from, date),
        arrival: endpoint(to, date),
        price: 450.0,
        duration_minutes: Some(450),
        duration: "PT7H30M".into(),
        stops: 0,
        cabin: CabinClass::Economy,
        direction,
    }
}

fn leg(
    id: &str,
    direction: Direction,
    from: &str,
    to: &str,
    params: Option<SearchParams>,
) -> StoredTrip {
    StoredTrip {
        id: id.into(),
        user_id: "u1".into(),
        kind: TripKind::Flight,
        trip_name: format!("{from} to {to}"),
        status: "saved".into(),
        flight: Some(record(direction, from, to, "2026-06-01")),
        search_params: params,
        destination: None,
        start_date: None,
        end_date: None,
        notes: None,
        passengers: 1,
        total_cost: 450.0,
        created_at: "2026-05-01T12:00:00Z".into(),
    }
}

fn vacation(id: &str) -> StoredTrip {
    StoredTrip {
        id: id.into(),
        user_id: "u1".into(),
        kind: TripKind::Vacation,
        trip_name: "Summer Europe".into(),
        status: "planning".into(),
        flight: None,
        search_params: None,
        destination: Some("Paris, France".into()),
        start_date: Some("2026-07-01".into()),
        end_date: Some("2026-07-14".into()),
        notes: None,
        passengers: 2,
        total_cost: 3000.0,
        created_at: "2026-05-01T12:00:00Z".into(),
    }
}

fn rt_params(from: &str, to: &str) -> SearchParams {
    SearchParams {
        from: from.into(),
        to: to.into(),
        depart_date: "2026-06-01".into(),
        return_date: Some("2026-06-10".into()),
        passengers: 1,
    }
}

fn group_ids(groups: &[TripGroup]) -> Vec<String> {
    groups.iter().map(|g| g.id().to_string()).collect()
}

#[test]
fn legs_from_same_search_pair_by_key() {
    let out = leg("a", Direction::Outbound, "JFK", "LHR", Some(rt_params("JFK", "LHR")));
    let ret = leg("b", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR")));

    let groups = pair(&[out, ret]);
    assert_eq!(groups.len(), 1);
    match &groups[0] {
        TripGroup::RoundTrip {
            id, total_cost, outbound, return_leg, ..
        } => {
            assert_eq!(id, "a__b");
            assert!((total_cost - 900.0).abs() < 1e-9);
            assert_eq!(outbound.id, "a");
            assert_eq!(return_leg.id, "b");
        }
        other => panic!("expected round trip, got {other:?}"),
    }
}

#[test]
fn key_match_is_case_and_whitespace_insensitive() {
    let mut p1 = rt_params("JFK", "LHR");
    p1.from = " jfk ".into();
    let out = leg("a", Direction::Outbound, "JFK", "LHR", Some(p1));
    let ret = leg("b", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR")));

    let groups = pair(&[out, ret]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id(), "a__b");
}

#[test]
fn mirrored_airports_pair_without_shared_search() {
    // Independently searched and saved: the outbound's own search had no
    // return date, the return's search is unrelated.
    let mut one_way = rt_params("JFK", "LHR");
    one_way.return_date = None;
    let out = leg("a", Direction::Outbound, "JFK", "LHR", Some(one_way));
    let ret = leg("b", Direction::Return, "LHR", "JFK", None);

    let groups = pair(&[out, ret]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id(), "a__b");
}

#[test]
fn exact_key_beats_earlier_mirror_candidate() {
    let out = leg("a", Direction::Outbound, "JFK", "LHR", Some(rt_params("JFK", "LHR")));
    // Mirrors the route but came from a different search.
    let mirror_only = leg("m", Direction::Return, "LHR", "JFK", Some(rt_params("EWR", "LHR")));
    let same_search = leg("k", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR")));

    let groups = pair(&[out, mirror_only, same_search]);
    assert_eq!(group_ids(&groups), vec!["a__k", "m"]);
}

#[test]
fn ambiguous_mirror_candidates_first_in_input_order_wins() {
    let out = leg("a", Direction::Outbound, "JFK", "LHR", None);
    let ret1 = leg("r1", Direction::Return, "LHR", "JFK", None);
    let ret2 = leg("r2", Direction::Return, "LHR", "JFK", None);

    let groups = pair(&[out, ret1, ret2]);
    assert_eq!(group_ids(&groups), vec!["a__r1", "r2"]);
    assert!(matches!(groups[1], TripGroup::Single(_)));
}

#[test]
fn unmatched_outbound_and_return_surface_as_singles() {
    let out = leg("a", Direction::Outbound, "JFK", "LHR", None);
    let ret = leg("b", Direction::Return, "NRT", "SYD", None);

    let groups = pair(&[out.clone(), ret.clone()]);
    assert_eq!(group_ids(&groups), vec!["a", "b"]);
    assert!(groups.iter().all(|g| matches!(g, TripGroup::Single(_))));
}

#[test]
fn every_leg_lands_in_exactly_one_group() {
    let trips = vec![
        leg("a", Direction::Outbound, "JFK", "LHR", Some(rt_params("JFK", "LHR"))),
        leg("b", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR"))),
        leg("c", Direction::Outbound, "LAX", "NRT", None),
        leg("d", Direction::Return, "CDG", "AMS", None),
        vacation("v"),
    ];

    let groups = pair(&trips);
    let mut seen: Vec<&str> = Vec::new();
    for group in &groups {
        match group {
            TripGroup::RoundTrip { outbound, return_leg, .. } => {
                seen.push(&outbound.id);
                seen.push(&return_leg.id);
            }
            TripGroup::Single(trip) => seen.push(&trip.id),
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, vec!["a", "b", "c", "d", "v"]);
}

#[test]
fn pairing_is_symmetric_under_input_reordering() {
    let out = leg("a", Direction::Outbound, "JFK", "LHR", Some(rt_params("JFK", "LHR")));
    let ret = leg("b", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR")));

    let forward = pair(&[out.clone(), ret.clone()]);
    let reversed = pair(&[ret, out]);

    assert_eq!(group_ids(&forward), group_ids(&reversed));
}

#[test]
fn repairing_the_same_set_is_a_no_op() {
    let trips = vec![
        leg("a", Direction::Outbound, "JFK", "LHR", Some(rt_params("JFK", "LHR"))),
        leg("b", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR"))),
        leg("c", Direction::Return, "SYD", "NRT", None),
        vacation("v"),
    ];

    let first = pair(&trips);
    let second = pair(&trips);
    assert_eq!(group_ids(&first), group_ids(&second));
}

#[test]
fn non_flight_documents_append_after_flight_groups() {
    let trips = vec![
        vacation("v1"),
        leg("a", Direction::Outbound, "JFK", "LHR", Some(rt_params("JFK", "LHR"))),
        leg("b", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR"))),
        vacation("v2"),
    ];

    let groups = pair(&trips);
    assert_eq!(group_ids(&groups), vec!["a__b", "v1", "v2"]);
}

#[test]
fn one_way_search_key_never_pairs_different_searches() {
    // Both legs saved from one-way searches with matching dates: no group
    // key exists, so only the mirror rule may apply — and here it does not.
    let mut p1 = rt_params("JFK", "LHR");
    p1.return_date = None;
    let mut p2 = rt_params("LHR", "JFK");
    p2.return_date = None;
    let out = leg("a", Direction::Outbound, "JFK", "LHR", Some(p1));
    let ret = leg("b", Direction::Return, "AMS", "CDG", Some(p2));

    let groups = pair(&[out, ret]);
    assert_eq!(group_ids(&groups), vec!["a", "b"]);
}

#[test]
fn round_trip_metadata_inherited_from_outbound() {
    let mut out = leg("a", Direction::Outbound, "JFK", "LHR", Some(rt_params("JFK", "LHR")));
    out.trip_name = "NYC to LON".into();
    out.status = "saved".into();
    let mut ret = leg("b", Direction::Return, "LHR", "JFK", Some(rt_params("JFK", "LHR")));
    ret.trip_name = "LON to NYC".into();
    ret.status = "booked".into();

    let groups = pair(&[out, ret]);
    match &groups[0] {
        TripGroup::RoundTrip { trip_name, status, .. } => {
            assert_eq!(trip_name, "NYC to LON");
            assert_eq!(status, "saved");
        }
        other => panic!("expected round trip, got {other:?}"),
    }
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(pair(&[]).is_empty());
}
