//! station_wx Library
//!
//! A Rust library for recording airport weather observations for a single
//! station: decoding METAR/SPECI report text, logging daily forecasts and
//! precipitation events, and aggregating them for display.
//!
//! This library provides tools for:
//! - Decoding raw METAR/SPECI text into structured records, tolerating
//!   omitted, reordered and malformed groups
//! - Classifying present weather into a rain indicator and rain type
//! - Append-only SQLite storage of reports, forecasts and rain events
//! - Daily aggregation and configurable rain intensity series for charting
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use station_wx::{DecodeContext, Decoder};
//!
//! let context = DecodeContext::new(NaiveDate::from_ymd_opt(2024, 7, 12).unwrap());
//! let report = Decoder::new().decode("STN1 121230Z 03005G12KT 6000 -RA BKN012 18/15", &context);
//!
//! assert!(report.is_rain());
//! assert_eq!(report.rain_type(), "light rain");
//! ```

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod metar_decoder;
        pub mod rain_analysis;
        pub mod store;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    CloudLayer, Coverage, DecodedReport, Forecast, RainEvent, RainLevel, ReportRow, StationId,
    Visibility, Wind, WindDirection,
};
pub use app::services::metar_decoder::{DecodeContext, Decoder, Decoding, decode};
pub use app::services::store::Store;
pub use config::Config;

/// Result type alias for station_wx
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for decoding, validation, configuration and storage
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller passed an input the operation cannot accept at all
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// A manually entered record failed validation
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A timestamp or date string could not be parsed
    #[error("Invalid timestamp '{value}': expected {expected}")]
    InvalidTimestamp {
        value: String,
        expected: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The storage backend failed; the operation can be retried
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored row could not be converted back into a record
    #[error("Corrupt stored record in {table}: {message}")]
    CorruptRecord { table: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("Configuration file '{path}' is invalid")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed
    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an invalid timestamp error
    pub fn invalid_timestamp(
        value: impl Into<String>,
        expected: impl Into<String>,
        source: chrono::ParseError,
    ) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            expected: expected.into(),
            source,
        }
    }

    /// Create a storage error with context
    pub fn storage(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source,
        }
    }

    /// Create a corrupt record error
    pub fn corrupt_record(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptRecord {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Whether retrying the failed operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage {
            message: "database operation failed".to_string(),
            source: error,
        }
    }
}
