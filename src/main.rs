use std::process;

use clap::Parser;

use tripr::error::TripError;
use tripr::fetch::{Credentials, FetchOptions, TokenCache};
use tripr::model::{NormalizedResults, TripGroup};
use tripr::query::SearchParams;
use tripr::store::{TripStore, VacationPlan};
use tripr::{pair, table};

#[derive(Parser)]
#[command(
    name = "tripr",
    about = "Plan trips from the terminal",
    version,
    after_help = "\
Examples:
  tripr search -f JFK -t LHR -d 2026-09-01
  tripr search -f JFK -t LHR -d 2026-09-01 --return-date 2026-09-10 --json
  tripr search -f LAX -t NRT -d 2026-10-05 --save 1 --save-return 2
  tripr trips
  tripr plan --name \"Summer Europe\" --destination \"Paris, France\" --start 2026-07-01 --end 2026-07-14
  tripr weather \"Lisbon\"

Credentials are read from TRIPR_API_KEY / TRIPR_API_SECRET (flight search)
and OPENWEATHER_API_KEY (weather)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Search for flights",
        long_about = "Search one-way or round-trip flights. Round-trip results list outbound \
            and return options separately; each side carries half the offer fare, so saved \
            legs sum to the real total."
    )]
    Search(SearchArgs),
    #[command(about = "List saved trips, grouping round trips from saved legs")]
    Trips(TripsArgs),
    #[command(about = "Create a vacation plan")]
    Plan(PlanArgs),
    #[command(about = "Delete a saved trip or vacation plan by id")]
    Delete(DeleteArgs),
    #[command(about = "Five-day weather forecast for a city")]
    Weather(WeatherArgs),
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(short, long, value_name = "IATA", help = "Departure airport code (3 letters)")]
    from: String,

    #[arg(short, long, value_name = "IATA", help = "Arrival airport code (3 letters)")]
    to: String,

    #[arg(short, long, value_name = "YYYY-MM-DD", help = "Departure date")]
    date: String,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Return date (makes the search round-trip)"
    )]
    return_date: Option<String>,

    #[arg(long, default_value = "1", value_name = "N", help = "Number of passengers (1-9)")]
    passengers: u32,

    #[arg(long, value_name = "N", help = "Show only the N cheapest results per direction")]
    top: Option<usize>,

    #[arg(
        long,
        value_name = "N",
        help = "Save the Nth outbound result (1-based) to your trips"
    )]
    save: Option<usize>,

    #[arg(
        long,
        value_name = "N",
        help = "Save the Nth return result (1-based) to your trips"
    )]
    save_return: Option<usize>,

    #[arg(long, default_value = "local", value_name = "ID", help = "User id for saved trips")]
    user: String,

    #[arg(long, default_value = "USD", value_name = "CODE", help = "Display currency code")]
    currency: String,

    #[arg(long, help = "One-line-per-flight output (for scripts and AI agents)")]
    compact: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[arg(long, value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,
}

#[derive(clap::Args)]
struct TripsArgs {
    #[arg(long, default_value = "local", value_name = "ID", help = "User id")]
    user: String,

    #[arg(long, default_value = "USD", value_name = "CODE", help = "Display currency code")]
    currency: String,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,
}

#[derive(clap::Args)]
struct PlanArgs {
    #[arg(long, value_name = "NAME", help = "Vacation name")]
    name: String,

    #[arg(long, value_name = "PLACE", help = "Destination, e.g. \"Paris, France\"")]
    destination: String,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Start date")]
    start: String,

    #[arg(long, value_name = "YYYY-MM-DD", help = "End date")]
    end: String,

    #[arg(long, default_value = "1", value_name = "N", help = "Number of travelers")]
    travelers: u32,

    #[arg(long, default_value = "0", value_name = "AMOUNT", help = "Budget")]
    budget: f64,

    #[arg(long, value_name = "TEXT", help = "Free-form notes")]
    notes: Option<String>,

    #[arg(long, default_value = "local", value_name = "ID", help = "User id")]
    user: String,
}

#[derive(clap::Args)]
struct DeleteArgs {
    #[arg(value_name = "ID", help = "Stored trip id (see `tripr trips`)")]
    id: String,
}

#[derive(clap::Args)]
struct WeatherArgs {
    #[arg(value_name = "CITY", help = "City name, e.g. \"Lisbon\" or \"Tokyo,JP\"")]
    city: String,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,
}

const POPULAR_DESTINATIONS: &[(&str, &str)] = &[
    ("New York", "JFK"),
    ("Los Angeles", "LAX"),
    ("Chicago", "ORD"),
    ("Miami", "MIA"),
    ("San Francisco", "SFO"),
    ("London", "LHR"),
    ("Paris", "CDG"),
    ("Tokyo", "NRT"),
    ("Amsterdam", "AMS"),
];

fn error_code(err: &TripError) -> i32 {
    match err {
        TripError::InvalidAirport(_)
        | TripError::InvalidDate(_)
        | TripError::Validation(_)
        | TripError::MissingCredentials(_) => 2,
        TripError::Timeout
        | TripError::ConnectionFailed(_)
        | TripError::DnsResolution(_)
        | TripError::TlsError(_)
        | TripError::ProxyError(_) => 3,
        TripError::RateLimited | TripError::AuthFailed(_) => 4,
        TripError::HttpStatus(_) | TripError::ApiError(_) => 5,
        TripError::JsonParse(_) => 6,
        TripError::Store(_) | TripError::NotFound(_) => 7,
    }
}

fn error_kind(err: &TripError) -> &'static str {
    match err {
        TripError::InvalidAirport(_) => "invalid_airport",
        TripError::InvalidDate(_) => "invalid_date",
        TripError::Validation(_) => "validation_error",
        TripError::MissingCredentials(_) => "missing_credentials",
        TripError::Timeout => "timeout",
        TripError::ConnectionFailed(_) => "connection_failed",
        TripError::DnsResolution(_) => "dns_error",
        TripError::TlsError(_) => "tls_error",
        TripError::ProxyError(_) => "proxy_error",
        TripError::RateLimited => "rate_limited",
        TripError::AuthFailed(_) => "auth_failed",
        TripError::HttpStatus(_) => "http_error",
        TripError::ApiError(_) => "api_error",
        TripError::JsonParse(_) => "parse_error",
        TripError::Store(_) => "store_error",
        TripError::NotFound(_) => "not_found",
    }
}

fn die(err: &TripError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{}", serde_json::to_string(&json).unwrap());
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn is_json(args: &SearchArgs) -> bool {
    args.json || args.pretty
}

fn apply_top(results: &mut NormalizedResults, n: usize) {
    let by_price = |a: &tripr::model::FlightRecord, b: &tripr::model::FlightRecord| {
        a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal)
    };
    results.outbound.sort_by(by_price);
    results.outbound.truncate(n);
    results.return_flights.sort_by(by_price);
    results.return_flights.truncate(n);
    results.total_results = results.outbound.len() + results.return_flights.len();
}

fn print_compact(results: &NormalizedResults, currency: &str) {
    let line = |direction: &str, record: &tripr::model::FlightRecord| {
        println!(
            "{direction} | {} | {} {}>{} {} | {} | {} stops | {} {} | {}",
            table::format_price(record.price, currency),
            record.departure.date,
            record.departure.airport,
            record.arrival.airport,
            record.departure.time,
            table::format_duration(record),
            record.stops,
            record.airline,
            record.flight_number,
            record.cabin,
        );
    };
    for record in &results.outbound {
        line("out", record);
    }
    for record in &results.return_flights {
        line("ret", record);
    }
}

fn print_no_results() {
    println!("No flights found. Try different cities or dates.");
    println!("Popular destinations:");
    for (city, code) in POPULAR_DESTINATIONS {
        println!("  {city} ({code})");
    }
}

fn print_results(results: &NormalizedResults, args: &SearchArgs) {
    if args.compact {
        if results.total_results == 0 {
            println!("No flights found.");
            return;
        }
        print_compact(results, &args.currency);
    } else if is_json(args) {
        let output = if args.pretty {
            serde_json::to_string_pretty(results).unwrap()
        } else {
            serde_json::to_string(results).unwrap()
        };
        println!("{output}");
    } else if results.total_results == 0 {
        print_no_results();
    } else {
        println!(
            "Found {} flights from {} to {}\n",
            results.total_results, args.from, args.to
        );
        println!("{}", table::render_results(results, &args.currency));
    }
}

fn save_leg(
    store: &TripStore,
    records: &[tripr::model::FlightRecord],
    index: usize,
    which: &str,
    args: &SearchArgs,
    params: &SearchParams,
) -> Result<(), TripError> {
    if index == 0 || index > records.len() {
        return Err(TripError::Validation(format!(
            "--save{which} index {index} out of range (1-{})",
            records.len()
        )));
    }
    let saved = store.save_flight(&args.user, records[index - 1].clone(), Some(params))?;
    if !is_json(args) {
        println!("Saved {} ({})", saved.trip_name, saved.id);
    }
    Ok(())
}

async fn run_search(args: SearchArgs) {
    let json_mode = is_json(&args);

    let params = SearchParams {
        from: args.from.trim().to_uppercase(),
        to: args.to.trim().to_uppercase(),
        depart_date: args.date.clone(),
        return_date: args.return_date.clone(),
        passengers: args.passengers,
    };

    if let Err(e) = params.validate() {
        die(&e, json_mode);
    }

    let creds = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => die(&e, json_mode),
    };
    let options = FetchOptions {
        proxy: args.proxy.clone(),
        timeout: args.timeout,
    };
    let mut tokens = TokenCache::new();

    let mut results = match tripr::search(&params, &creds, &mut tokens, &options).await {
        Ok(r) => r,
        Err(e) => die(&e, json_mode),
    };

    if let Some(n) = args.top {
        apply_top(&mut results, n);
    }

    if args.save.is_some() || args.save_return.is_some() {
        let store = match TripStore::open_default() {
            Ok(s) => s,
            Err(e) => die(&e, json_mode),
        };
        if let Some(n) = args.save {
            if let Err(e) = save_leg(&store, &results.outbound, n, "", &args, &params) {
                die(&e, json_mode);
            }
        }
        if let Some(n) = args.save_return {
            if let Err(e) = save_leg(&store, &results.return_flights, n, "-return", &args, &params)
            {
                die(&e, json_mode);
            }
        }
    }

    print_results(&results, &args);
}

fn run_trips(args: TripsArgs) {
    let json_mode = args.json || args.pretty;

    let store = match TripStore::open_default() {
        Ok(s) => s,
        Err(e) => die(&e, json_mode),
    };
    let trips = match store.trips_for(&args.user) {
        Ok(t) => t,
        Err(e) => die(&e, json_mode),
    };

    let groups: Vec<TripGroup> = pair::pair(&trips);

    if json_mode {
        let output = if args.pretty {
            serde_json::to_string_pretty(&groups).unwrap()
        } else {
            serde_json::to_string(&groups).unwrap()
        };
        println!("{output}");
    } else if groups.is_empty() {
        println!("No trips saved yet. Search flights with `tripr search` and save your favorites.");
    } else {
        println!("{}", table::render_trips(&groups, &args.currency));
    }
}

fn run_plan(args: PlanArgs) {
    let store = match TripStore::open_default() {
        Ok(s) => s,
        Err(e) => die(&e, false),
    };
    let plan = VacationPlan {
        trip_name: args.name,
        destination: args.destination,
        start_date: args.start,
        end_date: args.end,
        passengers: args.travelers,
        budget: args.budget,
        notes: args.notes,
    };
    match store.create_vacation(&args.user, plan) {
        Ok(trip) => println!("Created vacation plan {} ({})", trip.trip_name, trip.id),
        Err(e) => die(&e, false),
    }
}

fn run_delete(args: DeleteArgs) {
    let store = match TripStore::open_default() {
        Ok(s) => s,
        Err(e) => die(&e, false),
    };
    match store.delete(&args.id) {
        Ok(()) => println!("Deleted {}", args.id),
        Err(e) => die(&e, false),
    }
}

async fn run_weather(args: WeatherArgs) {
    let api_key = match std::env::var("OPENWEATHER_API_KEY") {
        Ok(k) => k,
        Err(_) => die(
            &TripError::MissingCredentials("OPENWEATHER_API_KEY".into()),
            args.json,
        ),
    };
    let options = FetchOptions {
        proxy: None,
        timeout: args.timeout,
    };

    match tripr::weather::city_forecast(&args.city, &api_key, &options).await {
        Ok(forecast) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&forecast).unwrap());
            } else {
                println!("{} ({} units)", forecast.city, forecast.units);
                for day in &forecast.days {
                    println!(
                        "  {}  {:>5.1} / {:<5.1}  {}",
                        day.date, day.min_temp, day.max_temp, day.description
                    );
                }
            }
        }
        Err(e) => die(&e, args.json),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Trips(args) => run_trips(args),
        Commands::Plan(args) => run_plan(args),
        Commands::Delete(args) => run_delete(args),
        Commands::Weather(args) => run_weather(args).await,
    }
}
