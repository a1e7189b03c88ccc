//! demos/meteogram.rs
//!
//! Fetches a week of hourly forecast data for a place name and renders the
//! classic meteogram panels: temperature and dew point, cloud layers with
//! humidity, precipitation with its running totals, wind with gusts and
//! direction, surface pressure, and the freezing level.
//!
//! To run this demo:
//! cargo run --example meteogram --features plotting -- "Livorno"

use std::env;
use std::error::Error;

use chrono::{Duration, Local};
use meteogram::Meteogram;
use plotlars::{Axis, Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;

/// Render options for the meteogram panels.
///
/// The style travels as an explicit value into [`plot_meteogram`], so two
/// renders with different looks can coexist in one process.
struct MeteogramStyle {
    title: String,
    temperature: Rgb,
    dew_point: Rgb,
    rain: Rgb,
    accumulated_rain: Rgb,
    show_grid: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let client = Meteogram::new();

    // 1. Pick the place and the window: today plus six days
    let place = env::args().nth(1).unwrap_or_else(|| "Livorno".to_string());
    let start_date = Local::now().date_naive();
    let end_date = start_date + Duration::days(6);

    // 2. Fetch the normalized hourly table
    println!("Fetching the hourly meteogram for {}...", place);
    let table = client
        .hourly()
        .place(&place)
        .start_date(start_date)
        .end_date(end_date)
        .call()
        .await?;
    if table.is_empty() {
        println!("No data for the selected period.");
        return Ok(());
    }

    // 3. Render the panels
    let style = MeteogramStyle {
        title: format!("Meteogram for {}", place),
        temperature: Rgb(235, 117, 0),
        dew_point: Rgb(69, 157, 230),
        rain: Rgb(0, 106, 167),
        accumulated_rain: Rgb(120, 180, 220),
        show_grid: false,
    };
    println!("Rendering {} hourly rows...", table.len());
    plot_meteogram(&table.frame, style);
    println!("Plots shown in browser.");

    Ok(())
}

// --- Plotting Helper Function ---

/// Draws the six meteogram panels from the table's columns: temperature,
/// clouds, precipitation, wind, pressure and freezing level.
fn plot_meteogram(data: &DataFrame, style: MeteogramStyle) {
    // 1. Temperature and dew point
    TimeSeriesPlot::builder()
        .data(data)
        .x("time")
        .y("temperature")
        .additional_series(vec!["dew_point"])
        .colors(vec![style.temperature, style.dew_point])
        .lines(vec![Line::Solid, Line::Dash])
        .plot_title(
            Text::from(format!("{}: temperature", style.title).as_str())
                .font("Arial")
                .size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from("°C").color(Rgb(0, 0, 0)))
        .y_axis(
            &Axis::new()
                .value_color(Rgb(0, 0, 0))
                .show_grid(style.show_grid)
                .zero_line_color(Rgb(0, 0, 0)),
        )
        .build()
        .plot();

    // 2. Cloud layers with the humidity overlay, all on one percent scale
    TimeSeriesPlot::builder()
        .data(data)
        .x("time")
        .y("cloud_cover_total")
        .additional_series(vec![
            "cloud_cover_low",
            "cloud_cover_mid",
            "cloud_cover_high",
            "relative_humidity",
        ])
        .colors(vec![
            Rgb(90, 90, 90),
            Rgb(150, 150, 150),
            Rgb(180, 180, 180),
            Rgb(210, 210, 210),
            Rgb(40, 90, 220),
        ])
        .lines(vec![
            Line::Solid,
            Line::Dot,
            Line::Dot,
            Line::Dot,
            Line::Dash,
        ])
        .plot_title(
            Text::from(format!("{}: cloud cover and humidity", style.title).as_str())
                .font("Arial")
                .size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from("%").color(Rgb(0, 0, 0)))
        .y_axis(&Axis::new().show_grid(style.show_grid))
        .build()
        .plot();

    // 3. Hourly precipitation and the running totals
    TimeSeriesPlot::builder()
        .data(data)
        .x("time")
        .y("rain_mm")
        .additional_series(vec![
            "snowfall_cm",
            "accumulated_rain_mm",
            "accumulated_snow_cm",
        ])
        .colors(vec![
            style.rain,
            Rgb(176, 196, 222),
            style.accumulated_rain,
            Rgb(128, 0, 128),
        ])
        .lines(vec![Line::Solid, Line::Solid, Line::Dot, Line::Dot])
        .plot_title(
            Text::from(format!("{}: precipitation", style.title).as_str())
                .font("Arial")
                .size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from("mm / cm").color(Rgb(0, 0, 0)))
        .y_axis(&Axis::new().show_grid(style.show_grid))
        .build()
        .plot();

    // 4. Wind speed and gusts, direction in degrees on the right
    TimeSeriesPlot::builder()
        .data(data)
        .x("time")
        .y("wind_speed")
        .additional_series(vec!["wind_gusts", "wind_direction"])
        .colors(vec![Rgb(44, 160, 44), Rgb(0, 31, 206), Rgb(128, 0, 128)])
        .lines(vec![Line::Solid, Line::Dash, Line::Dot])
        .plot_title(
            Text::from(format!("{}: wind and gusts", style.title).as_str())
                .font("Arial")
                .size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from("km/h").color(Rgb(0, 0, 0)))
        .y_title2(Text::from("direction °").color(Rgb(128, 0, 128)))
        .y_axis(&Axis::new().show_grid(style.show_grid))
        .y_axis2(
            &Axis::new()
                .axis_side(plotlars::AxisSide::Right)
                .value_color(Rgb(128, 0, 128))
                .show_grid(false),
        )
        .build()
        .plot();

    // 5. Surface pressure
    TimeSeriesPlot::builder()
        .data(data)
        .x("time")
        .y("surface_pressure")
        .colors(vec![Rgb(255, 165, 0)])
        .lines(vec![Line::Solid])
        .plot_title(
            Text::from(format!("{}: surface pressure", style.title).as_str())
                .font("Arial")
                .size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from("hPa").color(Rgb(0, 0, 0)))
        .y_axis(&Axis::new().show_grid(style.show_grid))
        .build()
        .plot();

    // 6. Freezing level altitude
    TimeSeriesPlot::builder()
        .data(data)
        .x("time")
        .y("freezing_level_height")
        .colors(vec![Rgb(200, 30, 30)])
        .lines(vec![Line::Solid])
        .plot_title(
            Text::from(format!("{}: freezing level", style.title).as_str())
                .font("Arial")
                .size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from("m").color(Rgb(0, 0, 0)))
        .y_axis(&Axis::new().show_grid(style.show_grid))
        .build()
        .plot();
}
