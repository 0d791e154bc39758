//! Station catalog loading
//!
//! Parses the ISD station history file (`isd-history.csv`) into an index.
//! The catalog uses FIPS country codes; rows are translated to ISO 3166-1
//! alpha-2 codes on the way in. Malformed rows are logged and skipped so
//! that one bad entry never hides the rest of the catalog.

use super::codes::{fips_country_name, fips_to_iso};
use super::metadata::LoadStats;
use super::{StationIndex, ZoneLookup};
use crate::app::models::StationMetadata;
use crate::constants::CATALOG_ELEVATION_FLOOR_M;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// One raw row of the station catalog
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "USAF")]
    usaf: String,
    #[serde(rename = "WBAN")]
    wban: String,
    #[serde(rename = "STATION NAME", default)]
    name: Option<String>,
    #[serde(rename = "CTRY", default)]
    country: Option<String>,
    #[serde(rename = "STATE", default)]
    state: Option<String>,
    #[serde(rename = "ICAO", default)]
    icao: Option<String>,
    #[serde(rename = "LAT", default)]
    latitude: Option<f64>,
    #[serde(rename = "LON", default)]
    longitude: Option<f64>,
    #[serde(rename = "ELEV(M)", default)]
    elevation: Option<f64>,
    #[serde(rename = "BEGIN", default)]
    begin: Option<String>,
    #[serde(rename = "END", default)]
    end: Option<String>,
    #[serde(rename = "TZ", default)]
    timezone: Option<String>,
}

impl StationIndex {
    /// Load the station catalog from a file
    pub fn load_catalog(path: &Path) -> Result<(Self, LoadStats)> {
        info!("Loading station catalog from {}", path.display());
        let file = std::fs::File::open(path).map_err(|e| {
            Error::io(format!("Failed to open station catalog {}", path.display()), e)
        })?;
        Self::from_catalog_reader(file)
    }

    /// Load the station catalog from a file and fill missing zones from coordinates
    pub fn load_catalog_with_zones(
        path: &Path,
        zones: &dyn ZoneLookup,
    ) -> Result<(Self, LoadStats)> {
        info!("Loading station catalog from {}", path.display());
        let file = std::fs::File::open(path).map_err(|e| {
            Error::io(format!("Failed to open station catalog {}", path.display()), e)
        })?;
        Self::from_catalog_reader_with_zones(file, zones)
    }

    /// Load the station catalog from any CSV source
    pub fn from_catalog_reader<R: Read>(reader: R) -> Result<(Self, LoadStats)> {
        let start_time = Instant::now();
        let mut index = Self::new();
        let mut stats = LoadStats::new();

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::catalog("Station catalog has no readable header", Some(e)))?
            .clone();
        for required in ["USAF", "WBAN"] {
            if !headers.iter().any(|h| h == required) {
                return Err(Error::catalog(
                    format!("Station catalog is missing the '{}' column", required),
                    None,
                ));
            }
        }

        for (row_number, result) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            stats.total_records_found += 1;

            let station = result
                .map_err(|e| e.to_string())
                .and_then(|row| into_station(row).map_err(|e| e.to_string()));

            match station {
                Ok(station) => {
                    if index.insert(station) {
                        stats.stations_loaded += 1;
                    } else {
                        stats.duplicates += 1;
                    }
                }
                Err(e) => {
                    warn!("Skipping catalog row {}: {}", row_number + 2, e);
                    stats.records_rejected += 1;
                    stats.errors.push(format!("row {}: {}", row_number + 2, e));
                }
            }
        }

        stats.load_duration = start_time.elapsed();
        info!("Station catalog loaded: {}", stats.summary());

        Ok((index, stats))
    }

    /// Load the station catalog and fill missing zones from coordinates
    pub fn from_catalog_reader_with_zones<R: Read>(
        reader: R,
        zones: &dyn ZoneLookup,
    ) -> Result<(Self, LoadStats)> {
        let (mut index, mut stats) = Self::from_catalog_reader(reader)?;
        stats.timezones_assigned = index.assign_timezones(zones);
        info!(
            "Assigned timezones to {} stations from coordinates",
            stats.timezones_assigned
        );
        Ok((index, stats))
    }
}

fn into_station(row: CatalogRow) -> Result<StationMetadata> {
    if row.usaf.is_empty() || row.wban.is_empty() {
        return Err(Error::invalid_parameter("USAF and WBAN are required"));
    }

    let mut station = StationMetadata::new(row.usaf, row.wban);
    station.name = row.name;
    station.icao = row.icao;
    station.state = row.state.map(|s| s.to_uppercase());

    if let Some(fips) = row.country {
        station.country_code = fips_to_iso(&fips).map(str::to_string);
        station.country = fips_country_name(&fips).map(str::to_string);
    }

    station.latitude = row.latitude;
    station.longitude = row.longitude;
    station.elevation = row
        .elevation
        .filter(|&elev| elev >= CATALOG_ELEVATION_FLOOR_M);
    station.begin_date = parse_catalog_date(row.begin.as_deref(), "BEGIN")?;
    station.end_date = parse_catalog_date(row.end.as_deref(), "END")?;

    station.timezone = match row.timezone {
        Some(name) if name.parse::<chrono_tz::Tz>().is_ok() => Some(name),
        Some(name) => {
            warn!("Station {}: unknown timezone '{}' ignored", station.id, name);
            None
        }
        None => None,
    };

    station.validate()?;
    Ok(station)
}

fn parse_catalog_date(value: Option<&str>, column: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| {
                Error::invalid_parameter(format!("{} date '{}' is not YYYYMMDD", column, s))
            })
        })
        .transpose()
}
