//! Application constants and configuration

pub const API_DATA_PATH: &str = "/api/v1/data";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const ERROR_PREFIX: &str = "Error fetching data: ";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Oldest request log rows are dropped past this count
pub const REQUEST_LOG_CAP: usize = 50;
