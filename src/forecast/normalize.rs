//! Turns the raw parallel arrays of an hourly forecast into a typed table.

use crate::forecast::error::ForecastError;
use crate::forecast::loader::{HourlySeries, SeriesValues};
use crate::types::hourly_table::{civil_range_expr, HourlyTable, TIME_COL};
use crate::types::location::LatLon;
use chrono::{NaiveDate, NaiveDateTime};
use log::warn;
use polars::prelude::*;

/// Keys of the hourly block that never carry measurements.
const METADATA_KEYS: [&str; 2] = ["time", "interval"];

/// Wire format of the hourly timestamps: local civil time, no zone suffix.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Prefix sum that skips nulls: a null sample leaves a null at its own
/// position and carries the running total forward unchanged.
fn running_total(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut total = 0.0;
    values
        .iter()
        .copied()
        .map(|value| {
            value.map(|v| {
                total += v;
                total
            })
        })
        .collect()
}

/// Builds a normalized [`HourlyTable`] from the raw parallel arrays of an
/// hourly forecast block.
///
/// The steps, in order:
///
/// 1. Every data-bearing sequence is truncated to the shortest one, so a
///    service hiccup that leaves one parameter short can never misalign rows.
///    Timestamps and interval markers do not take part in the minimum, but
///    the row count never exceeds the timestamp sequence either.
/// 2. `cloud_cover_total` is derived as the plain sum of the three layers,
///    null whenever a layer is null and deliberately not clamped to 100.
/// 3. `accumulated_rain_mm` and `accumulated_snow_cm` are running totals over
///    the whole fetched series, computed before any windowing so a narrowed
///    window keeps the accumulation history of the hours before it.
/// 4. Rows outside `[start_date 00:00:00, end_date 23:59:59]` are dropped.
///    A window that selects nothing yields an empty table, not an error.
///
/// Parameters that were requested but are absent from the response become
/// all-null columns; parameters the service returned unrequested still take
/// part in step 1.
///
/// # Errors
///
/// Returns [`ForecastError::NoHourlyData`] when the block has no data-bearing
/// sequences at all (or nothing but empty ones),
/// [`ForecastError::TimestampParse`] for a malformed timestamp, and
/// [`ForecastError::DataFrameProcessing`] when the frame cannot be built or
/// filtered.
pub fn normalize_hourly(
    series: &HourlySeries,
    coordinate: LatLon,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<HourlyTable, ForecastError> {
    let LatLon(latitude, longitude) = coordinate;

    let data_lengths: Vec<usize> = series
        .values
        .iter()
        .filter(|(key, _)| !METADATA_KEYS.contains(&key.as_str()))
        .filter_map(|(_, entry)| match entry {
            SeriesValues::Data(values) => Some(values.len()),
            SeriesValues::Metadata(_) => None,
        })
        .collect();

    let longest = data_lengths.iter().copied().max().unwrap_or(0);
    if longest == 0 {
        // No sequences at all, or nothing but empty ones.
        return Err(ForecastError::NoHourlyData {
            latitude,
            longitude,
        });
    }
    let shortest = data_lengths.iter().copied().min().unwrap_or(0);
    let rows = shortest.min(series.time.len());
    if rows < longest {
        warn!(
            "Hourly sequences disagree on length, truncating to {} rows",
            rows
        );
    }

    let mut time = Vec::with_capacity(rows);
    for raw in series.time.iter().take(rows) {
        let stamp = NaiveDateTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|source| {
            ForecastError::TimestampParse {
                value: raw.clone(),
                source,
            }
        })?;
        time.push(stamp);
    }

    let sequence = |name: &str| -> Vec<Option<f64>> {
        match series.values.get(name) {
            Some(SeriesValues::Data(values)) => values.iter().take(rows).copied().collect(),
            _ => vec![None; rows],
        }
    };

    let cloud_low = sequence("cloud_cover_low");
    let cloud_mid = sequence("cloud_cover_mid");
    let cloud_high = sequence("cloud_cover_high");
    let cloud_total: Vec<Option<f64>> = (0..rows)
        .map(|i| match (cloud_low[i], cloud_mid[i], cloud_high[i]) {
            (Some(low), Some(mid), Some(high)) => Some(low + mid + high),
            _ => None,
        })
        .collect();

    let rain = sequence("rain");
    let snowfall = sequence("snowfall");
    let accumulated_rain = running_total(&rain);
    let accumulated_snow = running_total(&snowfall);

    let frame = df!(
        TIME_COL => time,
        "temperature" => sequence("temperature_2m"),
        "dew_point" => sequence("dew_point_2m"),
        "relative_humidity" => sequence("relative_humidity_2m"),
        "cloud_cover_low" => cloud_low,
        "cloud_cover_mid" => cloud_mid,
        "cloud_cover_high" => cloud_high,
        "cloud_cover_total" => cloud_total,
        "surface_pressure" => sequence("surface_pressure"),
        "wind_speed" => sequence("wind_speed_10m"),
        "wind_gusts" => sequence("wind_gusts_10m"),
        "wind_direction" => sequence("wind_direction_10m"),
        "rain_mm" => rain,
        "snowfall_cm" => snowfall,
        "accumulated_rain_mm" => accumulated_rain,
        "accumulated_snow_cm" => accumulated_snow,
        "freezing_level_height" => sequence("freezing_level_height")
    )?;

    let frame = frame
        .lazy()
        .filter(civil_range_expr(start_date, end_date))
        .collect()?;
    if frame.height() == 0 && rows > 0 {
        warn!("No data for the selected period {} to {}", start_date, end_date);
    }
    Ok(HourlyTable::new(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeteogramError;
    use serde_json::json;

    fn livorno() -> LatLon {
        LatLon(43.5518, 10.3080)
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    /// Hourly stamps covering `days` whole days from March 1st 2025.
    fn stamps(days: u32) -> Vec<String> {
        (0..days)
            .flat_map(|d| (0..24).map(move |h| format!("2025-03-{:02}T{:02}:00", d + 1, h)))
            .collect()
    }

    fn data(values: Vec<Option<f64>>) -> SeriesValues {
        SeriesValues::Data(values)
    }

    fn filled(len: usize, value: f64) -> SeriesValues {
        data(vec![Some(value); len])
    }

    fn series(time: Vec<String>, entries: Vec<(&str, SeriesValues)>) -> HourlySeries {
        HourlySeries {
            time,
            values: entries
                .into_iter()
                .map(|(key, entry)| (key.to_string(), entry))
                .collect(),
        }
    }

    #[test]
    fn truncates_to_the_shortest_data_sequence() -> Result<(), MeteogramError> {
        // 72 hourly stamps, one parameter two samples short.
        let input = series(
            stamps(3),
            vec![
                ("rain", filled(72, 0.5)),
                ("temperature_2m", filled(72, 10.0)),
                ("surface_pressure", filled(70, 1013.0)),
            ],
        );

        let table = normalize_hourly(&input, livorno(), march(1), march(3))?;
        assert_eq!(table.len(), 70);

        let records = table.records()?;
        let last = records.last().unwrap();
        assert_eq!(
            last.time,
            march(3).and_hms_opt(21, 0, 0).unwrap(),
            "row 70 is 21:00 on the third day"
        );
        // The running total covers exactly the 70 surviving rows.
        assert_eq!(last.accumulated_rain_mm, Some(35.0));
        Ok(())
    }

    #[test]
    fn row_count_never_exceeds_the_timestamp_sequence() -> Result<(), MeteogramError> {
        // Data sequences longer than `time`: the extra samples have no stamp.
        let input = series(stamps(1), vec![("rain", filled(30, 0.5))]);
        let table = normalize_hourly(&input, livorno(), march(1), march(1))?;
        assert_eq!(table.len(), 24);
        Ok(())
    }

    #[test]
    fn no_data_bearing_sequences_is_an_error() {
        let input = series(stamps(1), vec![]);
        let err = normalize_hourly(&input, livorno(), march(1), march(1)).unwrap_err();
        assert!(matches!(err, ForecastError::NoHourlyData { .. }));
    }

    #[test]
    fn metadata_alone_is_not_data() {
        let input = series(
            stamps(1),
            vec![("interval", SeriesValues::Metadata(json!(3600)))],
        );
        let err = normalize_hourly(&input, livorno(), march(1), march(1)).unwrap_err();
        assert!(matches!(err, ForecastError::NoHourlyData { .. }));
    }

    #[test]
    fn only_empty_sequences_is_an_error() {
        let input = series(
            stamps(1),
            vec![("rain", data(vec![])), ("snowfall", data(vec![]))],
        );
        let err = normalize_hourly(&input, livorno(), march(1), march(1)).unwrap_err();
        assert!(matches!(err, ForecastError::NoHourlyData { .. }));
    }

    #[test]
    fn one_empty_sequence_yields_an_empty_table() -> Result<(), MeteogramError> {
        // One parameter produced nothing; the minimum is zero but data exists,
        // so the outcome is an empty table rather than the no-data failure.
        let input = series(
            stamps(1),
            vec![("rain", data(vec![])), ("temperature_2m", filled(24, 10.0))],
        );
        let table = normalize_hourly(&input, livorno(), march(1), march(1))?;
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn interval_markers_never_join_the_reconciliation() -> Result<(), MeteogramError> {
        // Even in sequence form, interval is metadata and must not shorten the table.
        let input = series(
            stamps(1),
            vec![
                ("rain", filled(24, 0.5)),
                ("interval", data(vec![Some(3600.0); 2])),
            ],
        );
        let table = normalize_hourly(&input, livorno(), march(1), march(1))?;
        assert_eq!(table.len(), 24);
        Ok(())
    }

    #[test]
    fn unrequested_parameters_take_part_in_reconciliation() -> Result<(), MeteogramError> {
        let input = series(
            stamps(1),
            vec![
                ("rain", filled(24, 0.5)),
                ("soil_moisture_0_to_1cm", filled(10, 0.3)),
            ],
        );
        let table = normalize_hourly(&input, livorno(), march(1), march(1))?;
        assert_eq!(table.len(), 10);
        Ok(())
    }

    #[test]
    fn absent_parameters_become_null_columns() -> Result<(), MeteogramError> {
        let input = series(stamps(1), vec![("rain", filled(24, 0.5))]);
        let records = normalize_hourly(&input, livorno(), march(1), march(1))?.records()?;
        assert_eq!(records.len(), 24);
        assert!(records.iter().all(|r| r.temperature.is_none()));
        assert!(records.iter().all(|r| r.freezing_level_height.is_none()));
        assert_eq!(records[0].rain_mm, Some(0.5));
        Ok(())
    }

    #[test]
    fn every_requested_parameter_feeds_its_own_column() -> Result<(), MeteogramError> {
        // Distinct constants per parameter, so a swapped or dropped mapping
        // shows up as the wrong value in the typed record.
        let time = stamps(1).into_iter().take(2).collect();
        let input = series(
            time,
            vec![
                ("temperature_2m", filled(2, 1.0)),
                ("dew_point_2m", filled(2, 2.0)),
                ("relative_humidity_2m", filled(2, 3.0)),
                ("cloud_cover_low", filled(2, 4.0)),
                ("cloud_cover_mid", filled(2, 5.0)),
                ("cloud_cover_high", filled(2, 6.0)),
                ("surface_pressure", filled(2, 7.0)),
                ("wind_speed_10m", filled(2, 8.0)),
                ("wind_direction_10m", filled(2, 9.0)),
                ("wind_gusts_10m", filled(2, 10.0)),
                ("rain", filled(2, 11.0)),
                ("snowfall", filled(2, 12.0)),
                ("freezing_level_height", filled(2, 13.0)),
            ],
        );

        let records = normalize_hourly(&input, livorno(), march(1), march(1))?.records()?;
        assert_eq!(records.len(), 2);

        let second = &records[1];
        assert_eq!(second.temperature, Some(1.0));
        assert_eq!(second.dew_point, Some(2.0));
        assert_eq!(second.relative_humidity, Some(3.0));
        assert_eq!(second.cloud_cover_low, Some(4.0));
        assert_eq!(second.cloud_cover_mid, Some(5.0));
        assert_eq!(second.cloud_cover_high, Some(6.0));
        assert_eq!(second.cloud_cover_total, Some(15.0));
        assert_eq!(second.surface_pressure, Some(7.0));
        assert_eq!(second.wind_speed, Some(8.0));
        assert_eq!(second.wind_direction, Some(9.0));
        assert_eq!(second.wind_gusts, Some(10.0));
        assert_eq!(second.rain_mm, Some(11.0));
        assert_eq!(second.snowfall_cm, Some(12.0));
        assert_eq!(second.accumulated_rain_mm, Some(22.0));
        assert_eq!(second.accumulated_snow_cm, Some(24.0));
        assert_eq!(second.freezing_level_height, Some(13.0));
        Ok(())
    }

    #[test]
    fn cloud_total_is_the_plain_layer_sum() -> Result<(), MeteogramError> {
        let time = stamps(1).into_iter().take(3).collect();
        let input = series(
            time,
            vec![
                ("cloud_cover_low", data(vec![Some(60.0), Some(10.0), None])),
                ("cloud_cover_mid", data(vec![Some(60.0), Some(20.0), Some(5.0)])),
                ("cloud_cover_high", data(vec![Some(30.0), Some(0.0), Some(5.0)])),
            ],
        );
        let records = normalize_hourly(&input, livorno(), march(1), march(1))?.records()?;
        // Overlapping layers may exceed 100; the sum is deliberately unclamped.
        assert_eq!(records[0].cloud_cover_total, Some(150.0));
        assert_eq!(records[1].cloud_cover_total, Some(30.0));
        assert_eq!(records[2].cloud_cover_total, None);
        Ok(())
    }

    #[test]
    fn accumulations_skip_nulls_and_keep_the_total() -> Result<(), MeteogramError> {
        let time = stamps(1).into_iter().take(4).collect();
        let input = series(
            time,
            vec![("rain", data(vec![Some(1.0), None, Some(2.0), Some(0.0)]))],
        );
        let records = normalize_hourly(&input, livorno(), march(1), march(1))?.records()?;
        let totals: Vec<Option<f64>> = records.iter().map(|r| r.accumulated_rain_mm).collect();
        assert_eq!(totals, vec![Some(1.0), None, Some(3.0), Some(3.0)]);
        Ok(())
    }

    #[test]
    fn accumulations_never_decrease() -> Result<(), MeteogramError> {
        let rain: Vec<Option<f64>> = (0..24)
            .map(|h| {
                if h % 3 == 0 {
                    None
                } else {
                    Some((h % 5) as f64 * 0.25)
                }
            })
            .collect();
        let input = series(stamps(1), vec![("rain", data(rain))]);
        let records = normalize_hourly(&input, livorno(), march(1), march(1))?.records()?;

        let mut last = 0.0;
        for record in &records {
            if let Some(total) = record.accumulated_rain_mm {
                assert!(total >= last, "running total fell from {} to {}", last, total);
                last = total;
            }
        }
        Ok(())
    }

    #[test]
    fn single_day_window_keeps_earlier_accumulation() -> Result<(), MeteogramError> {
        // Two fetched days, window narrowed to the second: the running totals
        // must still include the first day's precipitation.
        let mut rain = vec![Some(1.0); 24];
        rain.extend(vec![Some(0.5); 24]);
        let input = series(
            stamps(2),
            vec![("rain", data(rain)), ("snowfall", filled(48, 0.0))],
        );

        let table = normalize_hourly(&input, livorno(), march(2), march(2))?;
        assert_eq!(table.len(), 24);

        let records = table.records()?;
        assert_eq!(records[0].time, march(2).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(records[0].rain_mm, Some(0.5));
        assert_eq!(
            records[0].accumulated_rain_mm,
            Some(24.5),
            "the first visible hour carries the whole first day's rain"
        );
        Ok(())
    }

    #[test]
    fn window_with_no_rows_is_ok_and_empty() -> Result<(), MeteogramError> {
        let input = series(stamps(1), vec![("rain", filled(24, 0.5))]);
        let table = normalize_hourly(&input, livorno(), march(5), march(6))?;
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn builds_the_declared_schema_in_order() -> Result<(), MeteogramError> {
        let input = series(stamps(1), vec![("rain", filled(24, 0.0))]);
        let table = normalize_hourly(&input, livorno(), march(1), march(1))?;
        let names: Vec<&str> = table
            .frame
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(names, HourlyTable::COLUMNS);
        Ok(())
    }

    #[test]
    fn malformed_timestamps_are_reported() {
        let input = series(
            vec!["yesterday-ish".to_string()],
            vec![("rain", filled(1, 0.0))],
        );
        let err = normalize_hourly(&input, livorno(), march(1), march(1)).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::TimestampParse { ref value, .. } if value == "yesterday-ish"
        ));
    }
}
