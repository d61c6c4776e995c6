use std::time::{Duration, SystemTime};

use serde::Deserialize;
use wreq::Client;

use crate::error::{self, TripError};
use crate::provider::RawResponse;
use crate::query::SearchParams;

const MAX_RESULTS: u32 = 20;
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 1799;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, TripError> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| TripError::MissingCredentials(name.to_string()))
        };
        Ok(Self {
            api_key: var("TRIPR_API_KEY")?,
            api_secret: var("TRIPR_API_SECRET")?,
            base_url: std::env::var("TRIPR_API_BASE_URL")
                .unwrap_or_else(|_| "https://test.api.amadeus.com".to_string()),
        })
    }
}

/// Caller-owned bearer-token cache. The provider's OAuth tokens live about
/// thirty minutes; a still-valid token is reused across searches within one
/// invocation instead of re-authenticating per request.
#[derive(Debug, Default)]
pub struct TokenCache {
    token: Option<String>,
    expires_at: Option<SystemTime>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn valid_token(&self) -> Option<&str> {
        let expires_at = self.expires_at?;
        if SystemTime::now() < expires_at {
            self.token.as_deref()
        } else {
            None
        }
    }

    fn store(&mut self, token: String, lifetime_secs: u64) {
        self.token = Some(token);
        self.expires_at = Some(SystemTime::now() + Duration::from_secs(lifetime_secs));
    }
}

#[derive(Clone)]
pub struct FetchOptions {
    pub proxy: Option<String>,
    pub timeout: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: 30,
        }
    }
}

fn build_client(options: &FetchOptions) -> Result<Client, TripError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(options.timeout));

    if let Some(ref proxy) = options.proxy {
        builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
    }

    builder.build().map_err(error::from_http_error)
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

async fn fetch_token(
    client: &Client,
    creds: &Credentials,
) -> Result<(String, u64), TripError> {
    let body = format!(
        "grant_type=client_credentials&client_id={}&client_secret={}",
        creds.api_key, creds.api_secret
    );

    let response = client
        .post(format!("{}/v1/security/oauth2/token", creds.base_url))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    let text = response.text().await.map_err(error::from_http_error)?;

    if status != 200 {
        return Err(TripError::AuthFailed(api_error_detail(&text, status)));
    }

    let parsed: TokenResponse =
        serde_json::from_str(&text).map_err(|e| TripError::JsonParse(e.to_string()))?;
    Ok((
        parsed.access_token,
        parsed.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
    ))
}

/// Pulls the first human-readable detail out of a provider error body,
/// falling back to the raw status.
fn api_error_detail(body: &str, status: u16) -> String {
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(body);
    if let Ok(value) = parsed {
        if let Some(detail) = value["errors"][0]["detail"]
            .as_str()
            .or_else(|| value["errors"][0]["title"].as_str())
            .or_else(|| value["error_description"].as_str())
        {
            return detail.to_string();
        }
    }
    format!("HTTP {status}")
}

async fn bearer_token(
    client: &Client,
    creds: &Credentials,
    tokens: &mut TokenCache,
) -> Result<String, TripError> {
    if let Some(token) = tokens.valid_token() {
        return Ok(token.to_string());
    }
    let (token, lifetime) = fetch_token(client, creds).await?;
    tokens.store(token.clone(), lifetime);
    Ok(token)
}

/// Runs one flight-offers search against the provider and returns the raw,
/// still-nested response for the normalizer.
pub async fn search_offers(
    params: &SearchParams,
    creds: &Credentials,
    tokens: &mut TokenCache,
    options: &FetchOptions,
) -> Result<RawResponse, TripError> {
    let client = build_client(options)?;
    let token = bearer_token(&client, creds, tokens).await?;

    let mut query = vec![
        ("originLocationCode".to_string(), params.from.clone()),
        ("destinationLocationCode".to_string(), params.to.clone()),
        ("departureDate".to_string(), params.depart_date.clone()),
        ("adults".to_string(), params.passengers.to_string()),
        ("max".to_string(), MAX_RESULTS.to_string()),
        ("currencyCode".to_string(), "USD".to_string()),
    ];
    if let Some(ref ret) = params.return_date {
        query.push(("returnDate".to_string(), ret.clone()));
    }

    let response = client
        .get(format!("{}/v2/shopping/flight-offers", creds.base_url))
        .header("authorization", format!("Bearer {token}"))
        .query(&query)
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    let text = response.text().await.map_err(error::from_http_error)?;

    match status {
        200 => {}
        401 => return Err(TripError::AuthFailed(api_error_detail(&text, status))),
        429 => return Err(TripError::RateLimited),
        400 => return Err(TripError::ApiError(api_error_detail(&text, status))),
        _ => return Err(TripError::HttpStatus(status)),
    }

    serde_json::from_str(&text).map_err(|e| TripError::JsonParse(e.to_string()))
}
