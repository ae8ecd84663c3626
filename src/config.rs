//! Store connection settings and row handling policy.

use clap::ValueEnum;

pub const DEFAULT_URL: &str = "http://localhost:8086";
pub const DEFAULT_DATABASE: &str = "podvolts";
pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_PASSWORD: &str = "root";
pub const DEFAULT_MEASUREMENT: &str = "podvolts";

/// Connection parameters for the InfluxDB instance receiving the points.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub url: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Series name every point is written under
    pub measurement: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            measurement: DEFAULT_MEASUREMENT.to_string(),
        }
    }
}

/// What to do with a row that cannot be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RowPolicy {
    /// Fail the whole run, nothing is written
    #[default]
    Abort,
    /// Log the row and keep going
    Skip,
}
