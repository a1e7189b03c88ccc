mod cache;
mod clients;
mod error;
mod forecast;
mod geocoding;
mod meteogram;
mod types;

pub use error::MeteogramError;
pub use meteogram::*;

pub use clients::hourly_client::*;

pub use types::hourly_record::*;
pub use types::hourly_table::*;
pub use types::location::*;

pub use forecast::loader::{HourlySeries, SeriesValues};
pub use forecast::normalize::normalize_hourly;

pub use forecast::error::ForecastError;
pub use geocoding::error::GeocodingError;
