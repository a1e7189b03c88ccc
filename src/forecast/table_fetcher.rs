//! Cached fetch-and-normalize pipeline behind the hourly table operations.

use crate::cache::TtlCache;
use crate::forecast::error::ForecastError;
use crate::forecast::loader::ForecastLoader;
use crate::forecast::normalize::normalize_hourly;
use crate::types::hourly_table::HourlyTable;
use crate::types::location::LatLon;
use chrono::NaiveDate;
use log::info;
use ordered_float::OrderedFloat;
use polars::prelude::DataFrame;
use reqwest::Client;
use std::time::Duration;

/// Cache key for one fetched window. Coordinates go through [`OrderedFloat`]
/// so the pair can live in a hash map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ForecastKey {
    latitude: OrderedFloat<f64>,
    longitude: OrderedFloat<f64>,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ForecastKey {
    fn new(coordinate: LatLon, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            latitude: OrderedFloat(coordinate.0),
            longitude: OrderedFloat(coordinate.1),
            start_date,
            end_date,
        }
    }
}

/// Fetches hourly forecasts, normalizes them and memoizes the resulting
/// frames per coordinate/window pair.
pub(crate) struct TableFetcher {
    loader: ForecastLoader,
    cache: TtlCache<ForecastKey, DataFrame>,
}

impl TableFetcher {
    pub(crate) fn new(client: Client, base_url: String, ttl: Duration) -> Self {
        Self {
            loader: ForecastLoader::new(client, base_url),
            cache: TtlCache::new(Some(ttl)),
        }
    }

    /// Returns the normalized hourly table for a coordinate and window,
    /// reusing a cached frame while its entry lives.
    pub(crate) async fn table_for(
        &self,
        coordinate: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HourlyTable, ForecastError> {
        let key = ForecastKey::new(coordinate, start_date, end_date);
        if let Some(frame) = self.cache.get(&key).await {
            info!(
                "Forecast cache hit for ({}, {}) {} to {}",
                coordinate.0, coordinate.1, start_date, end_date
            );
            return Ok(HourlyTable::new(frame));
        }

        let series = self
            .loader
            .fetch_hourly(coordinate, start_date, end_date)
            .await?;
        let table = normalize_hourly(&series, coordinate, start_date, end_date)?;
        // Concurrent misses race; every caller ends up with the same frame.
        let frame = self.cache.insert(key, table.frame).await;
        Ok(HourlyTable::new(frame))
    }
}
