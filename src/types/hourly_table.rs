//! Contains the `HourlyTable` structure holding a normalized hourly forecast.

use crate::error::MeteogramError;
use crate::types::hourly_record::HourlyRecord;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;

pub(crate) const TIME_COL: &str = "time";

/// Datetime rendering used for CSV export; `read_csv` parses it back.
pub(crate) const CSV_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A normalized hourly forecast, wrapped around a Polars `DataFrame`.
///
/// The frame always carries the 17 columns of [`HourlyTable::COLUMNS`] in that
/// order: the local civil `time` column plus the hourly measurements, the
/// derived `cloud_cover_total`, and the two running precipitation totals.
/// Instances are produced by [`crate::Meteogram::hourly`] or restored from a
/// CSV export via [`HourlyTable::read_csv`].
///
/// A table can be empty. An empty result from a date-range fetch or from
/// [`HourlyTable::filter_range`] is a normal outcome, not an error; use
/// [`HourlyTable::is_empty`] to detect it.
///
/// # Note on Timestamps
///
/// The `time` column is timezone-naive local civil time, exactly as the
/// forecast service reports it for the requested timezone. No conversion to
/// UTC happens anywhere in the pipeline.
#[derive(Clone, Debug)]
pub struct HourlyTable {
    /// The underlying Polars DataFrame containing the hourly data.
    pub frame: DataFrame,
}

/// Predicate selecting rows with `start 00:00:00 <= time <= end 23:59:59`.
pub(crate) fn civil_range_expr(start: NaiveDate, end: NaiveDate) -> Expr {
    let start_at = start.and_time(NaiveTime::MIN);
    let end_at = end.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1);
    col(TIME_COL)
        .gt_eq(lit(start_at))
        .and(col(TIME_COL).lt_eq(lit(end_at)))
}

fn get_opt_float(column: &Column, idx: usize) -> Option<f64> {
    column.f64().ok().and_then(|ca| ca.get(idx))
}

fn get_datetime(column: &Column, idx: usize) -> Option<NaiveDateTime> {
    let ca = column.datetime().ok()?;
    let raw = ca.get(idx)?;
    match ca.time_unit() {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(raw),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(raw)),
    }
    .map(|dt| dt.naive_utc())
}

impl HourlyTable {
    /// Column names of a normalized hourly table, in schema order.
    pub const COLUMNS: [&'static str; 17] = [
        TIME_COL,
        "temperature",
        "dew_point",
        "relative_humidity",
        "cloud_cover_low",
        "cloud_cover_mid",
        "cloud_cover_high",
        "cloud_cover_total",
        "surface_pressure",
        "wind_speed",
        "wind_gusts",
        "wind_direction",
        "rain_mm",
        "snowfall_cm",
        "accumulated_rain_mm",
        "accumulated_snow_cm",
        "freezing_level_height",
    ];

    /// Creates a new `HourlyTable` wrapping the given Polars `DataFrame`.
    ///
    /// This is typically called internally by the [`crate::Meteogram`] client
    /// methods; the frame is assumed to carry the [`HourlyTable::COLUMNS`]
    /// schema.
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Number of hourly rows in the table.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Filters the table to the given civil-day range, both days inclusive.
    ///
    /// The bounds are interpreted as `[start 00:00:00, end 23:59:59]` in the
    /// table's own local time. Filtering an already-filtered table with the
    /// same bounds returns an identical table.
    ///
    /// # Arguments
    ///
    /// * `start` - The first day to keep (inclusive).
    /// * `end` - The last day to keep (inclusive).
    ///
    /// # Returns
    ///
    /// A new `HourlyTable` holding the rows inside the range; possibly empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use meteogram::{Meteogram, MeteogramError, LatLon};
    /// use chrono::NaiveDate;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MeteogramError> {
    /// let client = Meteogram::new();
    /// let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    ///
    /// let table = client
    ///     .hourly()
    ///     .location(LatLon(43.5518, 10.3080))
    ///     .start_date(start)
    ///     .end_date(end)
    ///     .call()
    ///     .await?;
    ///
    /// // Narrow the three fetched days down to the middle one.
    /// let middle = table.filter_range(
    ///     NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
    /// )?;
    /// println!("{} hours on March 2nd", middle.len());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`MeteogramError::DataFrame`] if the underlying frame cannot be
    /// filtered, e.g. because the `time` column is missing after a hand-built
    /// or foreign CSV import.
    pub fn filter_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HourlyTable, MeteogramError> {
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(civil_range_expr(start, end))
            .collect()?;
        Ok(HourlyTable::new(frame))
    }

    /// Collects the table into typed [`HourlyRecord`] rows.
    ///
    /// Missing measurements come back as `None`; the timestamp itself must be
    /// present in every row.
    ///
    /// # Errors
    ///
    /// Returns [`MeteogramError::ColumnNotFound`] if one of the schema columns
    /// is absent and [`MeteogramError::MissingTimestamp`] if a row has a null
    /// `time` cell.
    pub fn records(&self) -> Result<Vec<HourlyRecord>, MeteogramError> {
        macro_rules! get_column {
            ($name:expr) => {
                self.frame
                    .column($name)
                    .map_err(|e| MeteogramError::ColumnNotFound($name.to_string(), e))?
            };
        }

        let time = get_column!(TIME_COL);
        let temperature = get_column!("temperature");
        let dew_point = get_column!("dew_point");
        let relative_humidity = get_column!("relative_humidity");
        let cloud_cover_low = get_column!("cloud_cover_low");
        let cloud_cover_mid = get_column!("cloud_cover_mid");
        let cloud_cover_high = get_column!("cloud_cover_high");
        let cloud_cover_total = get_column!("cloud_cover_total");
        let surface_pressure = get_column!("surface_pressure");
        let wind_speed = get_column!("wind_speed");
        let wind_gusts = get_column!("wind_gusts");
        let wind_direction = get_column!("wind_direction");
        let rain_mm = get_column!("rain_mm");
        let snowfall_cm = get_column!("snowfall_cm");
        let accumulated_rain_mm = get_column!("accumulated_rain_mm");
        let accumulated_snow_cm = get_column!("accumulated_snow_cm");
        let freezing_level_height = get_column!("freezing_level_height");

        let mut records = Vec::with_capacity(self.frame.height());
        for idx in 0..self.frame.height() {
            let stamp =
                get_datetime(time, idx).ok_or(MeteogramError::MissingTimestamp(idx))?;
            records.push(HourlyRecord {
                time: stamp,
                temperature: get_opt_float(temperature, idx),
                dew_point: get_opt_float(dew_point, idx),
                relative_humidity: get_opt_float(relative_humidity, idx),
                cloud_cover_low: get_opt_float(cloud_cover_low, idx),
                cloud_cover_mid: get_opt_float(cloud_cover_mid, idx),
                cloud_cover_high: get_opt_float(cloud_cover_high, idx),
                cloud_cover_total: get_opt_float(cloud_cover_total, idx),
                surface_pressure: get_opt_float(surface_pressure, idx),
                wind_speed: get_opt_float(wind_speed, idx),
                wind_gusts: get_opt_float(wind_gusts, idx),
                wind_direction: get_opt_float(wind_direction, idx),
                rain_mm: get_opt_float(rain_mm, idx),
                snowfall_cm: get_opt_float(snowfall_cm, idx),
                accumulated_rain_mm: get_opt_float(accumulated_rain_mm, idx),
                accumulated_snow_cm: get_opt_float(accumulated_snow_cm, idx),
                freezing_level_height: get_opt_float(freezing_level_height, idx),
            });
        }
        Ok(records)
    }

    /// Writes the table as CSV with a header row.
    ///
    /// Timestamps are rendered as `%Y-%m-%dT%H:%M:%S`, numbers use a dot as
    /// the decimal separator, and missing values become empty cells. The
    /// output can be restored with [`HourlyTable::read_csv`].
    ///
    /// # Errors
    ///
    /// Returns [`MeteogramError::DataFrame`] when serialization or the
    /// underlying writer fails.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), MeteogramError> {
        let mut frame = self.frame.clone();
        CsvWriter::new(writer)
            .include_header(true)
            .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
            .finish(&mut frame)?;
        Ok(())
    }

    /// Reads a table back from CSV produced by [`HourlyTable::write_csv`].
    ///
    /// The `time` column is parsed back into a datetime column; every other
    /// column keeps its inferred numeric type.
    ///
    /// # Errors
    ///
    /// Returns [`MeteogramError::DataFrame`] when the input is not parseable
    /// as CSV.
    pub fn read_csv<R: MmapBytesReader>(reader: R) -> Result<HourlyTable, MeteogramError> {
        let frame = CsvReadOptions::default()
            .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
            .into_reader_with_file_handle(reader)
            .finish()?;
        Ok(HourlyTable::new(frame))
    }
}
