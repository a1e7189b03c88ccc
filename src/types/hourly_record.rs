use chrono::NaiveDateTime;

/// One row of a normalized hourly forecast table.
///
/// Field order matches the table's column order. Every measurement is an
/// `Option<f64>` because the upstream service reports individually missing
/// samples as nulls; only the timestamp is always present.
#[derive(Debug, PartialEq, Clone)]
pub struct HourlyRecord {
    /// Local civil time of the forecast hour (no zone attached).
    pub time: NaiveDateTime,
    /// Air temperature at 2 m, °C.
    pub temperature: Option<f64>,
    /// Dew point at 2 m, °C.
    pub dew_point: Option<f64>,
    /// Relative humidity at 2 m, %.
    pub relative_humidity: Option<f64>,
    /// Low-layer cloud cover, %.
    pub cloud_cover_low: Option<f64>,
    /// Mid-layer cloud cover, %.
    pub cloud_cover_mid: Option<f64>,
    /// High-layer cloud cover, %.
    pub cloud_cover_high: Option<f64>,
    /// Sum of the three layers, %; null when any layer is null. Not clamped,
    /// so overlapping layers can push it past 100.
    pub cloud_cover_total: Option<f64>,
    /// Surface pressure, hPa.
    pub surface_pressure: Option<f64>,
    /// Wind speed at 10 m, km/h.
    pub wind_speed: Option<f64>,
    /// Wind gusts at 10 m, km/h.
    pub wind_gusts: Option<f64>,
    /// Wind direction at 10 m, degrees.
    pub wind_direction: Option<f64>,
    /// Rain during the hour, mm.
    pub rain_mm: Option<f64>,
    /// Snowfall during the hour, cm.
    pub snowfall_cm: Option<f64>,
    /// Running rain total since the start of the fetched series, mm.
    pub accumulated_rain_mm: Option<f64>,
    /// Running snowfall total since the start of the fetched series, cm.
    pub accumulated_snow_cm: Option<f64>,
    /// Freezing level height, m.
    pub freezing_level_height: Option<f64>,
}
