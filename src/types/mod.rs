pub mod hourly_record;
pub mod hourly_table;
pub mod location;
