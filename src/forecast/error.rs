use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode forecast payload from {0}")]
    PayloadDecode(String, #[source] reqwest::Error),

    /// The response carried no hourly measurements at all. Distinct from a
    /// window that merely selects zero rows, which is an empty table, not an
    /// error.
    #[error("Forecast for {latitude}, {longitude} contained no hourly data")]
    NoHourlyData { latitude: f64, longitude: f64 },

    #[error("Failed to parse timestamp '{value}'")]
    TimestampParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("DataFrame processing failed")]
    DataFrameProcessing(#[from] polars::error::PolarsError),
}
