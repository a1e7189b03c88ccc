pub mod hourly_client;
