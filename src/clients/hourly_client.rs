//! Provides the `HourlyClient` for initiating hourly meteogram requests.
//!
//! This client acts as an intermediate builder, obtained via
//! [`Meteogram::hourly()`], allowing the user to pick the spot (a coordinate
//! or a free-form place name) and the window of civil days before executing
//! the request for a normalized hourly table.

use crate::{HourlyTable, LatLon, Meteogram, MeteogramError};
use bon::bon;
use chrono::NaiveDate;

/// A request builder for hourly meteogram tables.
///
/// Instances are created by calling [`Meteogram::hourly()`]. Start the
/// builder with `.location()` or `.place()`, set the date window with
/// `.start_date()` and `.end_date()`, then execute it with `.call().await`.
pub struct HourlyClient<'a> {
    client: &'a Meteogram,
}

#[bon]
impl<'a> HourlyClient<'a> {
    /// Creates a new `HourlyClient`.
    ///
    /// This is called internally by [`Meteogram::hourly()`] and not directly
    /// by users.
    ///
    /// # Arguments
    ///
    /// * `client` - A reference to the configured `Meteogram` instance.
    pub(crate) fn new(client: &'a Meteogram) -> Self {
        Self { client }
    }

    /// Initiates a builder to fetch the hourly table for a coordinate.
    ///
    /// No geocoding is involved; the coordinate goes straight to the forecast
    /// service. Finish with `.call().await` to execute the fetch.
    ///
    /// # Arguments (Initial Builder Method)
    ///
    /// * `coordinate` - The [`LatLon`] to fetch the forecast for.
    ///
    /// # Required Builder Methods
    ///
    /// * `.start_date(NaiveDate)`: First civil day of the window, inclusive.
    /// * `.end_date(NaiveDate)`: Last civil day of the window, inclusive. The
    ///   table keeps every hour up to 23:59:59 of this day.
    ///
    /// # Returns
    ///
    /// After `.call().await`, returns a `Result` containing the normalized
    /// [`HourlyTable`] for the window. A window the forecast does not cover
    /// yields an empty table, not an error.
    ///
    /// # Errors
    ///
    /// Can return:
    /// *   [`MeteogramError::InvalidDateRange`]: if the start day lies after
    ///     the end day.
    /// *   [`MeteogramError::Forecast`]: if fetching or decoding the forecast
    ///     fails, or the response carries no hourly data at all.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meteogram::{LatLon, Meteogram, MeteogramError};
    /// use chrono::NaiveDate;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MeteogramError> {
    /// let client = Meteogram::new();
    ///
    /// let table = client
    ///     .hourly()
    ///     .location(LatLon(43.5518, 10.3080))       // Livorno
    ///     .start_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    ///     .end_date(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
    ///     .call()
    ///     .await?;
    ///
    /// for record in table.records()? {
    ///     println!("{} {:?}", record.time, record.temperature);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = location)]
    #[doc(hidden)]
    pub async fn build_location(
        &self,
        #[builder(start_fn)] coordinate: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HourlyTable, MeteogramError> {
        self.client
            .table_for_coordinate(coordinate, start_date, end_date)
            .await
    }

    /// Initiates a builder to fetch the hourly table for a place name.
    ///
    /// The name is first resolved to a coordinate through the geocoding
    /// service; the rest of the pipeline is identical to
    /// [the coordinate form](HourlyClient::location). Finish with
    /// `.call().await`.
    ///
    /// # Arguments (Initial Builder Method)
    ///
    /// * `place` - A free-form place name such as `"Livorno"`.
    ///
    /// # Required Builder Methods
    ///
    /// * `.start_date(NaiveDate)`: First civil day of the window, inclusive.
    /// * `.end_date(NaiveDate)`: Last civil day of the window, inclusive.
    ///
    /// # Returns
    ///
    /// After `.call().await`, returns a `Result` containing the normalized
    /// [`HourlyTable`] for the resolved location and window.
    ///
    /// # Errors
    ///
    /// Can return:
    /// *   [`MeteogramError::Geocoding`]: if the name resolves to nothing.
    ///     Network trouble during geocoding collapses into the same error;
    ///     the cause is logged.
    /// *   [`MeteogramError::InvalidDateRange`]: if the start day lies after
    ///     the end day.
    /// *   [`MeteogramError::Forecast`]: if fetching or decoding the forecast
    ///     fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meteogram::{Meteogram, MeteogramError};
    /// use chrono::NaiveDate;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MeteogramError> {
    /// let client = Meteogram::new();
    ///
    /// let table = client
    ///     .hourly()
    ///     .place("Livorno")
    ///     .start_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    ///     .end_date(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
    ///     .call()
    ///     .await?;
    ///
    /// println!("{}", table.frame);
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = place)]
    #[doc(hidden)]
    pub async fn build_place(
        &self,
        #[builder(start_fn)] place: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HourlyTable, MeteogramError> {
        let location = self.client.resolve_location(place).await?;
        self.client
            .table_for_coordinate(location.coordinate(), start_date, end_date)
            .await
    }
}
