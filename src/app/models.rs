//! Data models for ISD processing
//!
//! This module contains the core data structures for representing ISD weather station
//! metadata, decoded observation records and inventory counts, following the NOAA
//! Integrated Surface Database format.

use crate::constants::quality_codes;
use crate::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Station Metadata Structure
// =============================================================================

/// Build the catalog identifier for a USAF/WBAN pair
pub fn station_id(usaf: &str, wban: &str) -> String {
    format!("{}-{}", usaf.trim(), wban.trim())
}

/// Station metadata structure containing ISD catalog information
///
/// Each row of the station catalog becomes one `StationMetadata`. The `id`
/// (`usaf` + "-" + `wban`) uniquely identifies a row.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationMetadata {
    /// Catalog identifier in USAF-WBAN form (e.g. "725030-14732")
    pub id: String,

    /// Air Force station identifier
    pub usaf: String,

    /// NCDC WBAN identifier
    pub wban: String,

    /// Station name (e.g. "LA GUARDIA AIRPORT")
    pub name: Option<String>,

    /// ISO 3166-1 alpha-2 country code
    pub country_code: Option<String>,

    /// Country name
    pub country: Option<String>,

    /// US state or territory code
    pub state: Option<String>,

    /// ICAO identifier
    pub icao: Option<String>,

    /// Latitude in decimal degrees
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees
    pub longitude: Option<f64>,

    /// Elevation above sea level in meters
    pub elevation: Option<f64>,

    /// First date with data in the archive
    pub begin_date: Option<NaiveDate>,

    /// Last date with data in the archive
    pub end_date: Option<NaiveDate>,

    /// IANA timezone name (e.g. "America/New_York")
    pub timezone: Option<String>,
}

impl StationMetadata {
    /// Create a station with only its identity populated
    pub fn new(usaf: impl Into<String>, wban: impl Into<String>) -> Self {
        let usaf = usaf.into();
        let wban = wban.into();
        Self {
            id: station_id(&usaf, &wban),
            usaf,
            wban,
            name: None,
            country_code: None,
            country: None,
            state: None,
            icao: None,
            latitude: None,
            longitude: None,
            elevation: None,
            begin_date: None,
            end_date: None,
            timezone: None,
        }
    }

    /// Validate station data for consistency and valid ranges
    pub fn validate(&self) -> Result<()> {
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(Error::invalid_parameter(format!(
                    "Station {}: invalid latitude {}, must be between -90 and 90 degrees",
                    self.id, lat
                )));
            }
        }

        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(Error::invalid_parameter(format!(
                    "Station {}: invalid longitude {}, must be between -180 and 180 degrees",
                    self.id, lon
                )));
            }
        }

        if let (Some(begin), Some(end)) = (self.begin_date, self.end_date) {
            if begin > end {
                return Err(Error::invalid_parameter(format!(
                    "Station {}: begin date {} is after end date {}",
                    self.id, begin, end
                )));
            }
        }

        Ok(())
    }

    /// Years covered by the station's begin/end dates, if both are known
    pub fn coverage_years(&self) -> Option<Vec<i32>> {
        match (self.begin_date, self.end_date) {
            (Some(begin), Some(end)) => Some((begin.year()..=end.year()).collect()),
            _ => None,
        }
    }

    /// Parsed timezone, if the catalog carries a recognizable zone name
    pub fn tz(&self) -> Option<Tz> {
        self.timezone.as_deref().and_then(|name| name.parse().ok())
    }
}

// =============================================================================
// Quality Codes
// =============================================================================

/// Classification of an ISD quality code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityClass {
    /// Passed checks, or no failing determination was made
    Passed,
    /// Suspect after automated or manual checks
    Suspect,
    /// Erroneous after automated or manual checks
    Erroneous,
    /// Missing, or passed gross limits when a value is present
    Missing,
}

impl QualityClass {
    /// Classify a raw single-character quality code
    pub fn from_code(code: u8) -> Self {
        if quality_codes::ERRONEOUS.contains(&code) {
            QualityClass::Erroneous
        } else if quality_codes::SUSPECT.contains(&code) {
            QualityClass::Suspect
        } else if code == quality_codes::MISSING {
            QualityClass::Missing
        } else {
            QualityClass::Passed
        }
    }
}

// =============================================================================
// Temperature Units
// =============================================================================

/// Output unit for air temperature and dew point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TempUnit {
    /// Convert a Celsius value into this unit; null stays null
    pub fn convert_celsius(self, value: Option<f64>) -> Option<f64> {
        value.map(|c| match self {
            TempUnit::Celsius => c,
            TempUnit::Fahrenheit => c * 9.0 / 5.0 + 32.0,
            TempUnit::Kelvin => c + 273.15,
        })
    }
}

impl FromStr for TempUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "celsius" => Ok(TempUnit::Celsius),
            "f" | "fahrenheit" => Ok(TempUnit::Fahrenheit),
            "k" | "kelvin" => Ok(TempUnit::Kelvin),
            _ => Err(Error::invalid_parameter(format!(
                "temp_unit '{}' must be 'c', 'celsius', 'f', 'fahrenheit', 'k', or 'kelvin'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for TempUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TempUnit::Celsius => "celsius",
            TempUnit::Fahrenheit => "fahrenheit",
            TempUnit::Kelvin => "kelvin",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Observation Records
// =============================================================================

/// Nullable measurement fields of one observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Air temperature (°C unless converted)
    pub temperature: Option<f64>,

    /// Dew point temperature (°C unless converted)
    pub dew_point: Option<f64>,

    /// Relative humidity in percent
    pub relative_humidity: Option<f64>,

    /// Wind direction in degrees (0-360, direction the wind blows from)
    pub wind_direction: Option<i32>,

    /// Wind speed in m/s
    pub wind_speed: Option<f64>,

    /// Sea-level pressure in hPa
    pub sea_level_pressure: Option<f64>,

    /// Ceiling height in meters (22000 means unlimited)
    pub ceiling_height: Option<i32>,

    /// Horizontal visibility in meters
    pub visibility: Option<i32>,

    /// Liquid precipitation depth in mm
    pub precipitation: Option<f64>,

    /// Accumulation period of `precipitation` in hours
    pub precipitation_period: Option<i32>,

    /// Present weather code (WMO manual or automated)
    pub present_weather: Option<u8>,

    /// Wind gust speed in m/s
    pub wind_gust: Option<f64>,

    /// Altimeter setting in hPa
    pub altimeter_setting: Option<f64>,

    /// Station pressure in hPa
    pub station_pressure: Option<f64>,
}

impl Measurements {
    /// True when every measurement is null
    pub fn is_empty(&self) -> bool {
        *self == Measurements::default()
    }

    /// Express the temperature fields in the requested unit
    pub fn with_temp_unit(mut self, unit: TempUnit) -> Self {
        self.temperature = unit.convert_celsius(self.temperature);
        self.dew_point = unit.convert_celsius(self.dew_point);
        self
    }
}

/// One decoded, unit-scaled observation with a UTC timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Station identifier in USAF-WBAN form
    pub station_id: String,

    /// Observation time (UTC, minute precision)
    pub time: DateTime<Utc>,

    /// Measured values; temperatures are in °C
    pub measurements: Measurements,
}

/// Observation projected into the caller's output timezone and unit
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRow {
    /// Station identifier in USAF-WBAN form
    pub station_id: String,

    /// Observation time in the output timezone
    pub time: DateTime<Tz>,

    /// Measured values in the requested temperature unit
    pub measurements: Measurements,
}

// =============================================================================
// Inventory
// =============================================================================

/// Number of observations for one station, year and month
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InventoryRow {
    pub station_id: String,
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    pub count: u64,
}
