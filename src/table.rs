use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::model::{FlightRecord, NormalizedResults, TripGroup};

pub fn format_price(price: f64, currency: &str) -> String {
    match currency {
        "USD" => format!("${price:.2}"),
        "EUR" => format!("€{price:.2}"),
        "GBP" => format!("£{price:.2}"),
        "JPY" | "CNY" => format!("¥{price:.0}"),
        "KRW" => format!("₩{price:.0}"),
        "INR" => format!("₹{price:.2}"),
        _ => format!("{price:.2} {currency}"),
    }
}

pub fn format_duration(record: &FlightRecord) -> String {
    match record.duration_minutes {
        Some(total) => format!("{}h {:02}m", total / 60, total % 60),
        // Unparsed provider token passes through as-is.
        None if !record.duration.is_empty() => record.duration.clone(),
        None => "—".to_string(),
    }
}

fn flight_rows(table: &mut Table, records: &[FlightRecord], currency: &str) {
    for record in records {
        let stops = match record.stops {
            0 => "Nonstop".to_string(),
            n => n.to_string(),
        };
        table.add_row(vec![
            format!("{} {}", record.airline, record.flight_number),
            format!("{} → {}", record.departure.airport, record.arrival.airport),
            format!("{} {}", record.departure.date, record.departure.time),
            format!("{} {}", record.arrival.date, record.arrival.time),
            format_duration(record),
            stops,
            record.cabin.to_string(),
            format_price(record.price, currency),
        ]);
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_results(results: &NormalizedResults, currency: &str) -> String {
    let header = vec![
        "Flight", "Route", "Depart", "Arrive", "Duration", "Stops", "Cabin", "Price",
    ];

    let mut out = String::new();

    let mut outbound = new_table();
    outbound.set_header(header.clone());
    flight_rows(&mut outbound, &results.outbound, currency);
    out.push_str("Outbound\n");
    out.push_str(&outbound.to_string());

    if !results.return_flights.is_empty() {
        let mut ret = new_table();
        ret.set_header(header);
        flight_rows(&mut ret, &results.return_flights, currency);
        out.push_str("\n\nReturn\n");
        out.push_str(&ret.to_string());
    }

    out
}

pub fn render_trips(groups: &[TripGroup], currency: &str) -> String {
    let mut table = new_table();
    table.set_header(vec!["Id", "Trip", "Type", "Route", "Status", "Cost"]);

    for group in groups {
        match group {
            TripGroup::RoundTrip {
                id,
                trip_name,
                status,
                outbound,
                return_leg,
                total_cost,
                ..
            } => {
                let route = match (&outbound.flight, &return_leg.flight) {
                    (Some(out), Some(ret)) => format!(
                        "{} → {} → {}",
                        out.departure.airport, out.arrival.airport, ret.arrival.airport
                    ),
                    _ => "—".to_string(),
                };
                table.add_row(vec![
                    id.clone(),
                    trip_name.clone(),
                    "Round trip".to_string(),
                    route,
                    status.clone(),
                    format_price(*total_cost, currency),
                ]);
            }
            TripGroup::Single(trip) => {
                let (kind, route) = match &trip.flight {
                    Some(flight) => (
                        "Flight",
                        format!("{} → {}", flight.departure.airport, flight.arrival.airport),
                    ),
                    None => (
                        "Vacation",
                        trip.destination.clone().unwrap_or_else(|| "—".to_string()),
                    ),
                };
                table.add_row(vec![
                    trip.id.clone(),
                    trip.trip_name.clone(),
                    kind.to_string(),
                    route,
                    trip.status.clone(),
                    format_price(trip.total_cost, currency),
                ]);
            }
        }
    }

    table.to_string()
}
