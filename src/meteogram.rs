//! This module provides the main entry point for fetching meteogram data.
//! A [`Meteogram`] client resolves free-form place names to coordinates and
//! serves normalized hourly forecast tables for a window of civil days.

use crate::clients::hourly_client::HourlyClient;
use crate::error::MeteogramError;
use crate::forecast::table_fetcher::TableFetcher;
use crate::geocoding::resolver::LocationResolver;
use crate::types::hourly_table::HourlyTable;
use crate::types::location::{LatLon, Location};
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;

/// Public geocoding endpoint queried by [`Meteogram::resolve_location`].
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Public forecast endpoint behind the hourly table operations.
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// How long a fetched forecast frame is served from memory before the
/// service is asked again.
pub const FORECAST_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Connection settings for a [`Meteogram`] client.
///
/// The defaults point at the public Open-Meteo endpoints; overriding the URLs
/// is mainly useful for tests and self-hosted mirrors.
///
/// # Examples
///
/// ```
/// use meteogram::{Meteogram, MeteogramSettings};
/// use std::time::Duration;
///
/// let client = Meteogram::with_settings(MeteogramSettings {
///     forecast_ttl: Duration::from_secs(600),
///     ..MeteogramSettings::default()
/// });
/// ```
#[derive(Debug, Clone)]
pub struct MeteogramSettings {
    /// Base URL of the geocoding search endpoint.
    pub geocoding_url: String,
    /// Base URL of the forecast endpoint.
    pub forecast_url: String,
    /// Lifetime of a cached forecast frame.
    pub forecast_ttl: Duration,
}

impl Default for MeteogramSettings {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            forecast_ttl: FORECAST_CACHE_TTL,
        }
    }
}

/// The main client for building hourly meteogram tables.
///
/// The client resolves place names through the Open-Meteo geocoding service
/// and fetches hourly forecasts, normalizing them into a fixed-schema
/// [`HourlyTable`]. Successful geocoding lookups are memoized for the life of
/// the client and fetched forecast frames are reused for
/// [`FORECAST_CACHE_TTL`], so repeated queries do not hit the network again.
///
/// Create an instance with [`Meteogram::new()`] for the public endpoints or
/// [`Meteogram::with_settings()`] to point it elsewhere.
///
/// # Examples
///
/// ```
/// use meteogram::Meteogram;
///
/// let client = Meteogram::new();
/// // client.hourly() starts a request builder.
/// ```
pub struct Meteogram {
    resolver: LocationResolver,
    fetcher: TableFetcher,
}

impl Meteogram {
    /// Creates a client talking to the public Open-Meteo endpoints.
    pub fn new() -> Self {
        Self::with_settings(MeteogramSettings::default())
    }

    /// Creates a client with custom endpoints and cache lifetime.
    ///
    /// # Arguments
    ///
    /// * `settings` - The [`MeteogramSettings`] to use. `..Default::default()`
    ///   fills in whatever a caller does not care about.
    pub fn with_settings(settings: MeteogramSettings) -> Self {
        let client = Client::new();
        Self {
            resolver: LocationResolver::new(client.clone(), settings.geocoding_url),
            fetcher: TableFetcher::new(client, settings.forecast_url, settings.forecast_ttl),
        }
    }

    /// Resolves a free-form place name to a [`Location`].
    ///
    /// The query is sent to the geocoding service and the best match is
    /// returned. Every failure mode, including network trouble, collapses to
    /// [`GeocodingError::LocationNotFound`]; the underlying cause is logged.
    ///
    /// # Arguments
    ///
    /// * `query` - A place name such as `"Livorno"` or `"Pisa, Toscana"`.
    ///
    /// # Errors
    ///
    /// Returns [`MeteogramError::Geocoding`] when no location matches.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use meteogram::{Meteogram, MeteogramError};
    /// # async fn run() -> Result<(), MeteogramError> {
    /// let client = Meteogram::new();
    /// let livorno = client.resolve_location("Livorno").await?;
    /// println!("{} sits at {:?}", livorno.name, livorno.coordinate());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// [`GeocodingError::LocationNotFound`]: crate::GeocodingError::LocationNotFound
    pub async fn resolve_location(&self, query: &str) -> Result<Location, MeteogramError> {
        Ok(self.resolver.resolve(query).await?)
    }

    /// Starts a builder for fetching an hourly meteogram table.
    ///
    /// Follow up with `.location(LatLon)` or `.place(&str)` to pick the spot,
    /// set the date window and finish with `.call().await`. See
    /// [`HourlyClient`] for the full builder surface.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use meteogram::{LatLon, Meteogram, MeteogramError};
    /// # use chrono::NaiveDate;
    /// # async fn run() -> Result<(), MeteogramError> {
    /// let client = Meteogram::new();
    /// let table = client
    ///     .hourly()
    ///     .location(LatLon(43.5518, 10.3080))
    ///     .start_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    ///     .end_date(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
    ///     .call()
    ///     .await?;
    /// println!("{}", table.frame);
    /// # Ok(())
    /// # }
    /// ```
    pub fn hourly(&self) -> HourlyClient<'_> {
        HourlyClient::new(self)
    }

    /// Validates the window and fetches the normalized table for a coordinate.
    pub(crate) async fn table_for_coordinate(
        &self,
        coordinate: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HourlyTable, MeteogramError> {
        if start_date > end_date {
            return Err(MeteogramError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(self
            .fetcher
            .table_for(coordinate, start_date, end_date)
            .await?)
    }
}

impl Default for Meteogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(geocoding: &MockServer, forecast: &MockServer) -> Meteogram {
        Meteogram::with_settings(MeteogramSettings {
            geocoding_url: format!("{}/v1/search", geocoding.uri()),
            forecast_url: format!("{}/v1/forecast", forecast.uri()),
            forecast_ttl: Duration::from_secs(3600),
        })
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn forecast_body(days: u32) -> serde_json::Value {
        let time: Vec<String> = (0..days)
            .flat_map(|d| (0..24).map(move |h| format!("2025-03-{:02}T{:02}:00", d + 1, h)))
            .collect();
        let rain: Vec<f64> = time.iter().map(|_| 0.5).collect();
        json!({ "hourly": { "time": time, "rain": rain } })
    }

    #[test]
    fn default_settings_point_at_the_public_endpoints() {
        let settings = MeteogramSettings::default();
        assert_eq!(settings.geocoding_url, GEOCODING_URL);
        assert_eq!(settings.forecast_url, FORECAST_URL);
        assert_eq!(settings.forecast_ttl, FORECAST_CACHE_TTL);
    }

    #[tokio::test]
    async fn resolve_location_returns_the_best_match() -> Result<(), MeteogramError> {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "latitude": 43.5518,
                    "longitude": 10.3080,
                    "name": "Livorno",
                    "country": "Italia",
                    "elevation": 3.0
                }]
            })))
            .mount(&geocoding)
            .await;

        let client = client_for(&geocoding, &forecast);
        let location = client.resolve_location("Livorno").await?;

        assert_eq!(location.name, "Livorno");
        assert_eq!(location.coordinate(), LatLon(43.5518, 10.3080));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_a_backwards_date_range() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;
        // A backwards window must fail before any request goes out.
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1)))
            .expect(0)
            .mount(&forecast)
            .await;

        let client = client_for(&geocoding, &forecast);
        let err = client
            .hourly()
            .location(LatLon(43.5518, 10.3080))
            .start_date(march(5))
            .end_date(march(1))
            .call()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MeteogramError::InvalidDateRange { start, end }
                if start == march(5) && end == march(1)
        ));
    }

    #[tokio::test]
    async fn identical_windows_reuse_the_cached_frame() -> Result<(), MeteogramError> {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(2)))
            .expect(1)
            .mount(&forecast)
            .await;

        let client = client_for(&geocoding, &forecast);
        let first = client
            .hourly()
            .location(LatLon(43.5518, 10.3080))
            .start_date(march(1))
            .end_date(march(2))
            .call()
            .await?;
        let second = client
            .hourly()
            .location(LatLon(43.5518, 10.3080))
            .start_date(march(1))
            .end_date(march(2))
            .call()
            .await?;

        assert_eq!(first.len(), 48);
        assert!(first.frame.equals_missing(&second.frame));
        Ok(())
    }
}
