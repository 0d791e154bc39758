//! ISD Processor Library
//!
//! A Rust library for retrieving NOAA Integrated Surface Database (ISD)
//! hourly observations and turning them into typed, unit-scaled records.
//!
//! This library provides tools for:
//! - Decoding fixed-width ISD records, including the tagged additional-data groups
//! - Loading and indexing the ISD station catalog for O(1) lookups and filtered search
//! - Converting observation times to station-local time and regularizing to an hourly grid
//! - Resolving station-years from a local cache or the NCEI archive with atomic persistence
//! - Aggregating monthly observation inventories

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod acquisition;
        pub mod inventory;
        pub mod record_decoder;
        pub mod station_index;
        pub mod time_localizer;
        pub mod weather;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    InventoryRow, Measurements, ObservationRecord, StationMetadata, TempUnit, WeatherRow,
};
pub use app::services::station_index::StationIndex;
pub use app::services::weather::{WeatherData, WeatherRequest, WeatherService, YearSelection};
pub use config::Config;

/// Result type alias for the ISD processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ISD retrieval and decoding operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Station id is not present in the station catalog
    #[error("Station not found: {station_id}")]
    NotFound { station_id: String },

    /// A caller-supplied argument was rejected
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A record line could not be decoded
    #[error(
        "Decode error in {station_id} {year}, line {line}, byte offset {offset}: {message}"
    )]
    Decode {
        station_id: String,
        year: i32,
        line: usize,
        offset: usize,
        message: String,
    },

    /// A station-year archive was unusable and could not be replaced
    #[error("Corrupt archive at '{path}': {reason}")]
    CacheCorruption { path: String, reason: String },

    /// Transport failure after the retry budget was exhausted
    #[error("Network error: {message}")]
    Network { message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Station catalog or inventory file could not be parsed
    #[error("Catalog error: {message}")]
    Catalog {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Operation cancelled by the caller
    #[error("Operation cancelled: {reason}")]
    Cancelled { reason: String },
}

impl Error {
    /// Create a station not found error
    pub fn not_found(station_id: impl Into<String>) -> Self {
        Self::NotFound {
            station_id: station_id.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a decode error with station-year and line context
    pub fn decode(
        station_id: impl Into<String>,
        year: i32,
        line: usize,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode {
            station_id: station_id.into(),
            year,
            line,
            offset,
            message: message.into(),
        }
    }

    /// Create a cache corruption error
    pub fn cache_corruption(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CacheCorruption {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
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

    /// Create a catalog parsing error
    pub fn catalog(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::Catalog {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
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

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Catalog {
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}
