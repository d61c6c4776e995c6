pub mod error;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod pair;
pub mod provider;
pub mod query;
pub mod store;
pub mod table;
pub mod weather;

use error::TripError;
use fetch::{Credentials, FetchOptions, TokenCache};
use model::NormalizedResults;
use query::SearchParams;

/// Validates the search, runs it against the provider, and normalizes the
/// response into flat directional records.
pub async fn search(
    params: &SearchParams,
    creds: &Credentials,
    tokens: &mut TokenCache,
    options: &FetchOptions,
) -> Result<NormalizedResults, TripError> {
    params.validate()?;
    let raw = fetch::search_offers(params, creds, tokens, options).await?;
    Ok(normalize::normalize(&raw, params))
}
