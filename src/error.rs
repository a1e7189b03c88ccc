use crate::forecast::error::ForecastError;
use crate::geocoding::error::GeocodingError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteogramError {
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("DataFrame operation failed")]
    DataFrame(#[from] PolarsError),

    #[error("Column '{0}' not found in the hourly table")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Row {0} of the hourly table has no timestamp")]
    MissingTimestamp(usize),
}
