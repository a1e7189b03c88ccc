use crate::forecast::error::ForecastError;
use crate::types::location::LatLon;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Hourly parameters requested from the forecast endpoint, in request order.
pub(crate) const HOURLY_PARAMS: [&str; 13] = [
    "temperature_2m",
    "dew_point_2m",
    "relative_humidity_2m",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "rain",
    "snowfall",
    "freezing_level_height",
];

/// Timezone the hourly timestamps are reported in.
pub(crate) const FORECAST_TIMEZONE: &str = "Europe/Rome";

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub hourly: Option<HourlySeries>,
}

/// One entry of the hourly block: either a measurement sequence or a scalar
/// metadata value such as an interval marker.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeriesValues {
    Data(Vec<Option<f64>>),
    Metadata(serde_json::Value),
}

/// The raw parallel arrays of an hourly forecast block, as served.
///
/// `time` is split off by name; every other key lands in `values`, so
/// parameters the service returns without being asked for still take part in
/// length reconciliation. Obtained through [`crate::Meteogram::hourly`]
/// internally; it is public as the input type of
/// [`crate::normalize_hourly`].
#[derive(Debug, Clone, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(flatten)]
    pub values: BTreeMap<String, SeriesValues>,
}

/// Fetches raw hourly forecast blocks for a coordinate and civil-day range.
pub struct ForecastLoader {
    client: Client,
    base_url: String,
}

impl ForecastLoader {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn fetch_hourly(
        &self,
        coordinate: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HourlySeries, ForecastError> {
        let LatLon(latitude, longitude) = coordinate;
        info!(
            "Fetching forecast for {}, {} from {} ({} to {})",
            latitude, longitude, self.base_url, start_date, end_date
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", HOURLY_PARAMS.join(",")),
                ("timezone", FORECAST_TIMEZONE.to_string()),
                ("start_date", start_date.format("%Y-%m-%d").to_string()),
                ("end_date", end_date.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .map_err(|e| ForecastError::NetworkRequest(self.base_url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error from {}: {:?}", self.base_url, e);
                return Err(if let Some(status) = e.status() {
                    ForecastError::HttpStatus {
                        url: self.base_url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    ForecastError::NetworkRequest(self.base_url.clone(), e)
                });
            }
        };

        let decoded: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::PayloadDecode(self.base_url.clone(), e))?;

        decoded.hourly.ok_or(ForecastError::NoHourlyData {
            latitude,
            longitude,
        })
    }
}
