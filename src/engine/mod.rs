pub mod analytics;
pub mod auth;
pub mod crypto;
pub mod csv_import;
pub mod triggers;
