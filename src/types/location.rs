/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use meteogram::LatLon;
///
/// let livorno = LatLon(43.5518, 10.3080);
/// assert_eq!(livorno.0, 43.5518); // Latitude
/// assert_eq!(livorno.1, 10.3080); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A place resolved from a free-text query via the geocoding endpoint.
///
/// Only the first (best) match is ever kept; `country` falls back to an empty
/// string and `elevation` to `0.0` when the geocoding response omits them.
///
/// # Examples
///
/// ```no_run
/// # use meteogram::{Meteogram, MeteogramError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), MeteogramError> {
/// let client = Meteogram::new();
/// let place = client.resolve_location("Livorno").await?;
/// println!("{} ({}) at {}, {}", place.name, place.country, place.latitude, place.longitude);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country: String,
    pub elevation: f64,
}

impl Location {
    /// The coordinate pair of this place.
    pub fn coordinate(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }
}
