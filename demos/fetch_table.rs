use chrono::{Duration, Local};
use meteogram::Meteogram;
use std::env;
use std::error::Error;
use std::fs::File;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    configure_polars_display();
    let client = Meteogram::new();

    let place = env::args().nth(1).unwrap_or_else(|| "Livorno".to_string());
    let start_date = Local::now().date_naive();
    let end_date = start_date + Duration::days(6);

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
    println!("{:#?}", table.frame);

    let path = "meteogram.csv";
    table.write_csv(File::create(path)?)?;
    println!("Wrote {} rows to {}.", table.len(), path);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
