//! Error types for the loader.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while turning one CSV row into a data point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("expected 3 columns, found {found}")]
    MissingColumns { found: usize },

    #[error("offset '{0}' is not in the form M:S")]
    MissingColon(String),

    #[error("invalid minutes in offset '{0}'")]
    InvalidMinutes(String),

    #[error("invalid seconds in offset '{0}'")]
    InvalidSeconds(String),

    #[error("invalid raw reading '{value}' in channel {channel}")]
    InvalidReading { channel: u8, value: String },

    #[error("offset '{0}' moves the timestamp out of range")]
    TimestampOutOfRange(String),
}

/// Main error type for a load run
#[derive(Error, Debug)]
pub enum LoadError {
    /// Filename does not carry a usable YYYYMMDDHH anchor
    #[error("invalid filename '{filename}': {reason}. Expected filename in the form '2018121523.csv'")]
    InvalidFilename { filename: String, reason: String },

    /// Malformed row in the capture
    #[error("line {line}: {source}")]
    RowParse {
        line: u64,
        #[source]
        source: RowError,
    },

    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Backend rejected the batch or could not be reached
    #[error("failed to write points: {0}")]
    StoreWrite(#[from] influxdb::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;

impl LoadError {
    pub(crate) fn invalid_filename(filename: &str, reason: impl Into<String>) -> Self {
        LoadError::InvalidFilename {
            filename: filename.to_string(),
            reason: reason.into(),
        }
    }
}
