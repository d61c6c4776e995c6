//! Five-day city forecast for trip planning.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use wreq::Client;

use crate::error::{self, TripError};
use crate::fetch::FetchOptions;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const UNITS: &str = "imperial";
const MAX_DAYS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub city: String,
    pub units: String,
    pub days: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub list: Vec<RawForecastEntry>,
    pub city: RawCity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCity {
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastEntry {
    /// "YYYY-MM-DD HH:MM:SS" local slot timestamp.
    pub dt_txt: String,
    pub main: RawMain,
    #[serde(default)]
    pub weather: Vec<RawWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeather {
    pub description: String,
}

/// Collapses three-hourly forecast slots into at most five per-day summaries:
/// min/max temperature and the most frequent description.
pub fn summarize(entries: &[RawForecastEntry]) -> Vec<ForecastDay> {
    let mut by_day: BTreeMap<&str, Vec<&RawForecastEntry>> = BTreeMap::new();
    for entry in entries {
        let date = entry.dt_txt.split(' ').next().unwrap_or("");
        if date.is_empty() {
            continue;
        }
        by_day.entry(date).or_default().push(entry);
    }

    by_day
        .into_iter()
        .take(MAX_DAYS)
        .map(|(date, slots)| {
            let mut min_temp = f64::INFINITY;
            let mut max_temp = f64::NEG_INFINITY;
            let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

            for (idx, slot) in slots.iter().enumerate() {
                min_temp = min_temp.min(slot.main.temp);
                max_temp = max_temp.max(slot.main.temp);
                if let Some(w) = slot.weather.first() {
                    counts.entry(&w.description).or_insert((0, idx)).0 += 1;
                }
            }

            // Highest count wins; earliest slot breaks ties.
            let description = counts
                .into_iter()
                .max_by(|(_, (ca, ia)), (_, (cb, ib))| ca.cmp(cb).then(ib.cmp(ia)))
                .map(|(desc, _)| desc.to_string())
                .unwrap_or_default();

            ForecastDay {
                date: date.to_string(),
                min_temp,
                max_temp,
                description,
            }
        })
        .collect()
}

pub async fn city_forecast(
    city: &str,
    api_key: &str,
    options: &FetchOptions,
) -> Result<Forecast, TripError> {
    if city.trim().is_empty() {
        return Err(TripError::Validation(
            "missing city name for weather lookup".into(),
        ));
    }

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(options.timeout))
        .build()
        .map_err(error::from_http_error)?;

    let query = vec![
        ("q".to_string(), city.to_string()),
        ("units".to_string(), UNITS.to_string()),
        ("appid".to_string(), api_key.to_string()),
    ];

    let response = client
        .get(format!("{BASE_URL}/forecast"))
        .query(&query)
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    let text = response.text().await.map_err(error::from_http_error)?;

    if status != 200 {
        let detail = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v["message"].as_str().map(String::from))
            .unwrap_or_else(|| format!("HTTP {status}"));
        return Err(TripError::ApiError(format!("weather lookup failed: {detail}")));
    }

    let raw: RawForecast =
        serde_json::from_str(&text).map_err(|e| TripError::JsonParse(e.to_string()))?;

    Ok(Forecast {
        city: format!("{}, {}", raw.city.name, raw.city.country),
        units: UNITS.to_string(),
        days: summarize(&raw.list),
    })
}
