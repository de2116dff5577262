//! Nearby-places lookup over the RapidAPI places endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::RetrievalError;
use crate::config::PlacesConfig;

/// One nearby-place result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub name: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
}

/// Points-of-interest lookup for a destination
///
/// Not guaranteed to succeed; callers treat failures as empty results.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Up to `limit` places of the given category near `place`
    async fn lookup_nearby(
        &self,
        place: &str,
        category: &str,
        limit: usize,
    ) -> Result<Vec<NearbyPlace>, RetrievalError>;
}

/// RapidAPI-backed nearby-search client
pub struct RapidApiPlaces {
    api_key: Option<String>,
    host: String,
    radius_m: u32,
    http: Client,
}

impl RapidApiPlaces {
    /// Create a client from configuration
    ///
    /// A missing API key is not fatal here: lookups fail at request time
    /// and the augmentor degrades them to empty results.
    pub fn from_config(config: &PlacesConfig) -> Result<Self, RetrievalError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(
                env = %config.api_key_env,
                "places API key not set, nearby lookups will be skipped"
            );
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            api_key,
            host: config.host.clone(),
            radius_m: config.radius_m,
            http,
        })
    }
}

#[async_trait]
impl PlacesProvider for RapidApiPlaces {
    async fn lookup_nearby(
        &self,
        place: &str,
        category: &str,
        limit: usize,
    ) -> Result<Vec<NearbyPlace>, RetrievalError> {
        debug!(%place, %category, limit, "lookup_nearby: called");
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RetrievalError::MissingCredential("places API key".to_string()))?;

        let url = format!("https://{}/maps/api/place/nearbysearch/json", self.host);
        let radius = self.radius_m.to_string();
        let response = self
            .http
            .get(url)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(&[
                ("location", city_center(place)),
                ("radius", radius.as_str()),
                ("type", category),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(RetrievalError::InvalidResponse(format!(
                "places lookup returned status {status}"
            )));
        }

        let body: NearbySearchResponse = response.json().await?;
        let places = body
            .results
            .into_iter()
            .take(limit)
            .map(|p| NearbyPlace {
                name: p.name,
                address: p.vicinity,
                rating: p.rating,
                rating_count: p.user_ratings_total,
            })
            .collect();

        Ok(places)
    }
}

/// Center coordinates for destinations the places API needs a location for
fn city_center(city: &str) -> &'static str {
    match city {
        "Tokyo" => "35.6895,139.6917",
        "Bangkok" => "13.7563,100.5018",
        "Paris" => "48.8566,2.3522",
        "Singapore" => "1.3521,103.8198",
        _ => "0,0",
    }
}

// Places API response types

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: Option<String>,
    vicinity: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u64>,
}
