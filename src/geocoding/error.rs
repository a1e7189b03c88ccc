use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodingError {
    /// The single lookup outcome besides success. Transport failures, bad
    /// HTTP statuses and undecodable payloads all collapse into this variant;
    /// the underlying cause is only emitted to the log.
    #[error("No location found for query '{query}'")]
    LocationNotFound { query: String },
}
