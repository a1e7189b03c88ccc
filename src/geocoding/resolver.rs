use crate::cache::TtlCache;
use crate::geocoding::error::GeocodingError;
use crate::types::location::Location;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    // The service omits the key entirely when nothing matched.
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
    elevation: Option<f64>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Location {
            latitude: result.latitude,
            longitude: result.longitude,
            name: result.name,
            country: result.country.unwrap_or_default(),
            elevation: result.elevation.unwrap_or(0.0),
        }
    }
}

/// Turns free-text place queries into coordinates via the geocoding endpoint.
///
/// Lookups ask for the single best match in Italian locale and memoize it for
/// the resolver's lifetime, so each distinct query leaves the process at most
/// once.
pub struct LocationResolver {
    client: Client,
    base_url: String,
    cache: TtlCache<String, Location>,
}

impl LocationResolver {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url,
            cache: TtlCache::new(None),
        }
    }

    pub async fn resolve(&self, query: &str) -> Result<Location, GeocodingError> {
        if let Some(hit) = self.cache.get(&query.to_string()).await {
            info!("Location cache hit for '{}'", query);
            return Ok(hit);
        }
        let location = self.lookup(query).await?;
        Ok(self.cache.insert(query.to_string(), location).await)
    }

    async fn lookup(&self, query: &str) -> Result<Location, GeocodingError> {
        match self.fetch_best_match(query).await {
            Ok(Some(location)) => Ok(location),
            Ok(None) => {
                warn!("Geocoding returned no match for '{}'", query);
                Err(GeocodingError::LocationNotFound {
                    query: query.to_string(),
                })
            }
            Err(cause) => {
                // The caller only learns "not found"; the cause survives in the log.
                warn!("Geocoding request for '{}' failed: {}", query, cause);
                Err(GeocodingError::LocationNotFound {
                    query: query.to_string(),
                })
            }
        }
    }

    async fn fetch_best_match(&self, query: &str) -> Result<Option<Location>, reqwest::Error> {
        info!("Resolving '{}' via {}", query, self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", "1"),
                ("language", "it"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let decoded: GeocodingResponse = response.json().await?;
        Ok(decoded
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Location::from))
    }
}
