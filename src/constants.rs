//! Application constants for ISD processor
//!
//! This module contains the archive locations, the fixed-width layout of the
//! ISD mandatory data section, sentinel values, scale factors and quality
//! code sets used throughout the ISD processor.

// =============================================================================
// Archive Locations and File Names
// =============================================================================

/// Root of the NCEI ISD archive
pub const BASE_URL: &str = "https://www.ncei.noaa.gov/pub/data/noaa";

/// Station catalog published alongside the archive
pub const STATION_CATALOG_FILE: &str = "isd-history.csv";

/// Per station-year record counts published alongside the archive
pub const INVENTORY_FILE: &str = "isd-inventory.csv";

/// Extension of a cached station-year archive (gzip container)
pub const ARCHIVE_EXTENSION: &str = "gz";

/// First year with ISD archive files
pub const FIRST_ARCHIVE_YEAR: i32 = 1901;

/// Deterministic file name of a station-year archive
pub fn archive_file_name(station_id: &str, year: i32) -> String {
    format!("{}-{}.{}", station_id, year, ARCHIVE_EXTENSION)
}

// =============================================================================
// Mandatory Data Section Layout
// =============================================================================

/// Byte offsets of the fixed-width mandatory section (0-based, exclusive end)
pub mod layout {
    use std::ops::Range;

    pub const VARIABLE_LENGTH: Range<usize> = 0..4;
    pub const USAF: Range<usize> = 4..10;
    pub const WBAN: Range<usize> = 10..15;
    pub const DATE: Range<usize> = 15..23;
    pub const TIME: Range<usize> = 23..27;
    pub const DATA_SOURCE: usize = 27;
    pub const LATITUDE: Range<usize> = 28..34;
    pub const LONGITUDE: Range<usize> = 34..41;
    pub const REPORT_TYPE: Range<usize> = 41..46;
    pub const ELEVATION: Range<usize> = 46..51;
    pub const CALL_LETTERS: Range<usize> = 51..56;
    pub const QC_PROCESS: Range<usize> = 56..60;
    pub const WIND_DIRECTION: Range<usize> = 60..63;
    pub const WIND_DIRECTION_QC: usize = 63;
    pub const WIND_TYPE: usize = 64;
    pub const WIND_SPEED: Range<usize> = 65..69;
    pub const WIND_SPEED_QC: usize = 69;
    pub const CEILING: Range<usize> = 70..75;
    pub const CEILING_QC: usize = 75;
    pub const CEILING_DETERMINATION: usize = 76;
    pub const CAVOK: usize = 77;
    pub const VISIBILITY: Range<usize> = 78..84;
    pub const VISIBILITY_QC: usize = 84;
    pub const VISIBILITY_VARIABILITY: usize = 85;
    pub const VISIBILITY_VARIABILITY_QC: usize = 86;
    pub const TEMPERATURE: Range<usize> = 87..92;
    pub const TEMPERATURE_QC: usize = 92;
    pub const DEW_POINT: Range<usize> = 93..98;
    pub const DEW_POINT_QC: usize = 98;
    pub const SEA_LEVEL_PRESSURE: Range<usize> = 99..104;
    pub const SEA_LEVEL_PRESSURE_QC: usize = 104;

    /// Length of the mandatory section; additional data starts here
    pub const MANDATORY_LENGTH: usize = 105;
}

// =============================================================================
// Sentinel Values and Scale Factors
// =============================================================================

/// Raw values meaning "no measurement"
pub mod sentinels {
    pub const LATITUDE: i64 = 99999;
    pub const LONGITUDE: i64 = 999999;
    pub const ELEVATION: i64 = 9999;
    pub const WIND_DIRECTION: i64 = 999;
    pub const WIND_SPEED: i64 = 9999;
    pub const CEILING: i64 = 99999;
    pub const VISIBILITY: i64 = 999999;
    pub const TEMPERATURE: i64 = 9999;
    pub const DEW_POINT: i64 = 9999;
    pub const SEA_LEVEL_PRESSURE: i64 = 99999;
    pub const PRECIPITATION_DEPTH: i64 = 9999;
    pub const PRECIPITATION_PERIOD: i64 = 99;
    pub const GUST_SPEED: i64 = 9999;
    pub const PRESSURE: i64 = 99999;
}

/// Divisors turning raw integers into physical units
pub mod scale {
    pub const COORDINATE: f64 = 1000.0;
    pub const WIND_SPEED: f64 = 10.0;
    pub const TEMPERATURE: f64 = 10.0;
    pub const PRESSURE: f64 = 10.0;
    pub const PRECIPITATION: f64 = 10.0;
}

/// Ceiling height reported for an unlimited ceiling (meters)
pub const CEILING_UNLIMITED_M: i32 = 22000;

/// Upper bound applied to decoded visibility (meters, 10 statute miles)
pub const VISIBILITY_CAP_M: i32 = 16093;

/// Catalog elevations below this value are placeholders
pub const CATALOG_ELEVATION_FLOOR_M: f64 = -900.0;

// =============================================================================
// Quality Control Codes
// =============================================================================

/// ISD data quality codes attached to mandatory-section fields
pub mod quality_codes {
    /// Suspect after automated or manual checks (NCEI and source data)
    pub const SUSPECT: &[u8] = b"26";

    /// Erroneous after automated or manual checks (NCEI and source data)
    pub const ERRONEOUS: &[u8] = b"37";

    /// Value is missing (or passed gross limits check if present)
    pub const MISSING: u8 = b'9';
}

// =============================================================================
// Humidity Derivation
// =============================================================================

/// Magnus-form saturation vapour pressure coefficients (Alduchov & Eskridge)
pub mod magnus {
    pub const B: f64 = 17.625;
    pub const C: f64 = 243.04;
}

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Default timeout for a single transport attempt (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default number of retries after the first failed transport attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial backoff between transport attempts (milliseconds)
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Upper limit on concurrently resolved station-years
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Directory name used under the platform cache directory
pub const CACHE_DIR_NAME: &str = "isd-processor";
