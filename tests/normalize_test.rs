use serde_json::{json, Value};
use tripr::model::{CabinClass, Direction};
use tripr::normalize::{normalize, parse_duration_minutes};
use tripr::provider::RawResponse;
use tripr::query::SearchParams;

fn segment(carrier: &str, number: &str, from: &str, dep_at: &str, to: &str, arr_at: &str) -> Value {
    json!({
        "carrierCode": carrier,
        "number": number,
        "departure": { "iataCode": from, "at": dep_at },
        "arrival": { "iataCode": to, "at": arr_at }
    })
}

fn outbound_itinerary() -> Value {
    json!({
        "duration": "PT7H30M",
        "segments": [segment("BA", "112", "JFK", "2026-06-01T19:30:00", "LHR", "2026-06-02T07:00:00")]
    })
}

fn return_itinerary() -> Value {
    json!({
        "duration": "PT8H15M",
        "segments": [segment("BA", "117", "LHR", "2026-06-10T10:00:00", "JFK", "2026-06-10T13:15:00")]
    })
}

fn offer(id: &str, total: &str, itineraries: Vec<Value>) -> Value {
    json!({
        "id": id,
        "itineraries": itineraries,
        "price": { "total": total },
        "travelerPricings": [
            { "fareDetailsBySegment": [{ "class": "Y" }] }
        ]
    })
}

fn response(offers: Vec<Value>) -> RawResponse {
    serde_json::from_value(json!({
        "data": offers,
        "dictionaries": {
            "carriers": { "BA": "British Airways" },
            "locations": {
                "JFK": { "cityCode": "NYC", "countryCode": "US" },
                "LHR": { "cityCode": "LON", "countryCode": "GB" }
            }
        }
    }))
    .unwrap()
}

fn round_trip_params() -> SearchParams {
    SearchParams {
        from: "JFK".into(),
        to: "LHR".into(),
        depart_date: "2026-06-01".into(),
        return_date: Some("2026-06-10".into()),
        passengers: 1,
    }
}

fn one_way_params() -> SearchParams {
    SearchParams {
        return_date: None,
        ..round_trip_params()
    }
}

#[test]
fn round_trip_offer_emits_both_directions_with_split_price() {
    let raw = response(vec![offer(
        "X",
        "900.00",
        vec![outbound_itinerary(), return_itinerary()],
    )]);
    let results = normalize(&raw, &round_trip_params());

    assert_eq!(results.total_results, 2);
    assert_eq!(results.outbound.len(), 1);
    assert_eq!(results.return_flights.len(), 1);

    let out = &results.outbound[0];
    let ret = &results.return_flights[0];
    assert_eq!(out.id, "X-outbound");
    assert_eq!(ret.id, "X-return");
    assert!((out.price - 450.0).abs() < 1e-9);
    assert!((ret.price - 450.0).abs() < 1e-9);
    assert_eq!(out.direction, Direction::Outbound);
    assert_eq!(ret.direction, Direction::Return);
}

#[test]
fn one_way_search_ignores_second_itinerary() {
    // Some providers attach a throwaway second itinerary to one-way results.
    let raw = response(vec![offer(
        "X",
        "300.00",
        vec![outbound_itinerary(), return_itinerary()],
    )]);
    let results = normalize(&raw, &one_way_params());

    assert_eq!(results.total_results, 1);
    assert_eq!(results.return_flights.len(), 0);
    assert!((results.outbound[0].price - 300.0).abs() < 1e-9);
}

#[test]
fn partitioning_counts_directional_records() {
    let raw = response(vec![
        offer("A", "900.00", vec![outbound_itinerary(), return_itinerary()]),
        offer("B", "500.00", vec![outbound_itinerary()]),
    ]);
    let results = normalize(&raw, &round_trip_params());

    assert_eq!(
        results.outbound.len() + results.return_flights.len(),
        results.total_results
    );
    assert_eq!(results.total_results, 3);
}

#[test]
fn record_fields_resolved_from_dictionaries() {
    let raw = response(vec![offer("X", "450.00", vec![outbound_itinerary()])]);
    let results = normalize(&raw, &one_way_params());

    let out = &results.outbound[0];
    assert_eq!(out.airline, "British Airways");
    assert_eq!(out.flight_number, "BA112");
    assert_eq!(out.departure.airport, "JFK");
    assert_eq!(out.departure.city, "NYC");
    assert_eq!(out.departure.date, "2026-06-01");
    assert_eq!(out.departure.time, "19:30");
    assert_eq!(out.arrival.airport, "LHR");
    assert_eq!(out.arrival.city, "LON");
    assert_eq!(out.duration_minutes, Some(450));
    assert_eq!(out.stops, 0);
    assert_eq!(out.cabin, CabinClass::Economy);
}

#[test]
fn unknown_codes_fall_back_to_raw_code() {
    let raw: RawResponse = serde_json::from_value(json!({
        "data": [offer("X", "450.00", vec![json!({
            "duration": "PT2H",
            "segments": [segment("ZZ", "9", "AAA", "2026-06-01T08:00:00", "BBB", "2026-06-01T10:00:00")]
        })])],
        "dictionaries": {}
    }))
    .unwrap();
    let results = normalize(&raw, &one_way_params());

    let out = &results.outbound[0];
    assert_eq!(out.airline, "ZZ");
    assert_eq!(out.departure.city, "AAA");
    assert_eq!(out.arrival.city, "BBB");
}

#[test]
fn multi_segment_itinerary_counts_stops() {
    let raw = response(vec![offer(
        "X",
        "600.00",
        vec![json!({
            "duration": "PT11H",
            "segments": [
                segment("BA", "112", "JFK", "2026-06-01T08:00:00", "KEF", "2026-06-01T17:00:00"),
                segment("BA", "430", "KEF", "2026-06-01T18:30:00", "LHR", "2026-06-01T22:00:00")
            ]
        })],
    )]);
    let results = normalize(&raw, &one_way_params());

    let out = &results.outbound[0];
    assert_eq!(out.stops, 1);
    // Endpoints come from the first departure and the last arrival.
    assert_eq!(out.departure.airport, "JFK");
    assert_eq!(out.arrival.airport, "LHR");
}

#[test]
fn cabin_codes_map_through_fixed_enumeration() {
    for (code, expected) in [
        ("Y", CabinClass::Economy),
        ("W", CabinClass::PremiumEconomy),
        ("C", CabinClass::Business),
        ("F", CabinClass::FirstClass),
        ("Q", CabinClass::Economy),
    ] {
        let mut o = offer("X", "450.00", vec![outbound_itinerary()]);
        o["travelerPricings"][0]["fareDetailsBySegment"][0]["class"] = json!(code);
        let results = normalize(&response(vec![o]), &one_way_params());
        assert_eq!(results.outbound[0].cabin, expected, "code {code}");
    }
}

#[test]
fn missing_offer_id_synthesized_per_direction() {
    let mut o = offer("X", "900.00", vec![outbound_itinerary(), return_itinerary()]);
    o.as_object_mut().unwrap().remove("id");
    let results = normalize(&response(vec![o]), &round_trip_params());

    let out_id = &results.outbound[0].id;
    let ret_id = &results.return_flights[0].id;
    assert!(out_id.ends_with("-outbound"));
    assert!(ret_id.ends_with("-return"));
    assert_ne!(out_id, ret_id);
    // Same synthesized base for both directions of the offer.
    assert_eq!(
        out_id.trim_end_matches("-outbound"),
        ret_id.trim_end_matches("-return")
    );
}

#[test]
fn offer_without_segments_skipped_batch_continues() {
    let raw = response(vec![
        offer("BAD", "450.00", vec![json!({ "duration": "PT1H", "segments": [] })]),
        offer("GOOD", "450.00", vec![outbound_itinerary()]),
    ]);
    let results = normalize(&raw, &one_way_params());

    assert_eq!(results.total_results, 1);
    assert_eq!(results.outbound[0].id, "GOOD-outbound");
}

#[test]
fn offer_with_unusable_price_skipped() {
    let raw = response(vec![
        offer("BAD", "not-a-number", vec![outbound_itinerary()]),
        offer("GOOD", "450.00", vec![outbound_itinerary()]),
    ]);
    let results = normalize(&raw, &one_way_params());

    assert_eq!(results.total_results, 1);
    assert_eq!(results.outbound[0].id, "GOOD-outbound");
}

#[test]
fn empty_data_yields_zero_results() {
    let raw: RawResponse = serde_json::from_value(json!({ "data": [] })).unwrap();
    let results = normalize(&raw, &round_trip_params());
    assert_eq!(results.total_results, 0);
    assert!(results.outbound.is_empty());
    assert!(results.return_flights.is_empty());
}

#[test]
fn missing_data_field_deserializes_to_empty() {
    let raw: RawResponse = serde_json::from_value(json!({})).unwrap();
    let results = normalize(&raw, &one_way_params());
    assert_eq!(results.total_results, 0);
}

#[test]
fn malformed_duration_token_passes_through_unparsed() {
    let mut o = offer("X", "450.00", vec![outbound_itinerary()]);
    o["itineraries"][0]["duration"] = json!("4h30m");
    let results = normalize(&response(vec![o]), &one_way_params());

    let out = &results.outbound[0];
    assert_eq!(out.duration_minutes, None);
    assert_eq!(out.duration, "4h30m");
}

#[test]
fn duration_token_edge_cases() {
    assert_eq!(parse_duration_minutes("PT4H30M"), Some(270));
    assert_eq!(parse_duration_minutes("PT45M"), Some(45));
    assert_eq!(parse_duration_minutes("PT2H"), Some(120));
    assert_eq!(parse_duration_minutes("PT0M"), Some(0));
    assert_eq!(parse_duration_minutes("PT"), None);
    assert_eq!(parse_duration_minutes("PT4H30"), None);
    assert_eq!(parse_duration_minutes("4H30M"), None);
    assert_eq!(parse_duration_minutes("PT4X"), None);
    assert_eq!(parse_duration_minutes(""), None);
}
