//! Command-line argument definitions for the ISD processor
//!
//! This module defines the CLI interface using the clap derive API. Every
//! subcommand shares the cache and verbosity options in [`CommonArgs`].

use crate::app::models::TempUnit;
use crate::app::services::station_index::{NameMatch, StationQuery};
use crate::config::{Config, DecodeErrorPolicy, QualityPolicy};
use crate::{Error, Result};
use chrono_tz::Tz;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// CLI arguments for the ISD weather data processor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "isd-processor",
    version,
    about = "Retrieve and decode NOAA Integrated Surface Database hourly observations",
    long_about = "Fetches station-year archives from the NCEI ISD archive (or a local cache), \
                  decodes the fixed-width records into unit-scaled observations, and writes \
                  them as CSV or JSON. Also searches the 29,000+ station catalog and the \
                  published observation inventory."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Retrieve observations for one station
    Weather(WeatherArgs),
    /// Search the station catalog
    Stations(StationsArgs),
    /// Show monthly observation counts from the published inventory
    Inventory(InventoryArgs),
    /// List country codes known to the catalog
    Countries(CountriesArgs),
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Weather(args) => &args.common,
            Commands::Stations(args) => &args.common,
            Commands::Inventory(args) => &args.common,
            Commands::Countries(args) => &args.common,
        }
    }
}

/// Options shared by every subcommand
#[derive(Debug, Clone, ClapArgs)]
pub struct CommonArgs {
    /// Directory for cached archives and catalog files
    ///
    /// Defaults to the platform cache directory (e.g. ~/.cache/isd-processor).
    #[arg(long = "cache-dir", value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Do not look for cached archives in the current directory
    #[arg(long = "no-cwd-cache")]
    pub no_cwd_cache: bool,

    /// Download the station catalog and inventory again
    #[arg(long = "refresh-catalog")]
    pub refresh_catalog: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the weather command
#[derive(Debug, Clone, Parser)]
pub struct WeatherArgs {
    /// Station id in USAF-WBAN form (e.g. 725030-14732)
    #[arg(value_name = "STATION")]
    pub station: String,

    /// Years to retrieve: a list (2019,2021) or a range (2015-2020)
    ///
    /// Rows are returned in the order given. Defaults to the station's
    /// catalog coverage.
    #[arg(short = 'y', long = "years", value_name = "YEARS")]
    pub years: Option<YearList>,

    /// Temperature unit (c, f, k or the full names)
    #[arg(short = 'u', long = "unit", value_name = "UNIT", default_value = "celsius")]
    pub unit: TempUnit,

    /// Regularize to one row per hour
    #[arg(long = "hourly")]
    pub hourly: bool,

    /// Express times in the station's local timezone
    #[arg(long = "local")]
    pub local: bool,

    /// Express times in this IANA zone instead (implies --local)
    #[arg(long = "timezone", value_name = "ZONE")]
    pub timezone: Option<Tz>,

    /// Add station name, location and country columns
    #[arg(long = "station-info")]
    pub station_info: bool,

    /// Which quality codes null out a value
    #[arg(long = "quality", value_enum, default_value = "drop-erroneous")]
    pub quality: QualityArg,

    /// Skip lines that fail to decode instead of aborting
    #[arg(long = "skip-bad-lines")]
    pub skip_bad_lines: bool,

    /// Retries after a failed download
    #[arg(long = "retries", value_name = "COUNT")]
    pub retries: Option<u32>,

    /// Per-attempt download timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Station-years downloaded concurrently
    #[arg(short = 'j', long = "jobs", value_name = "COUNT")]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the stations command
#[derive(Debug, Clone, Parser)]
pub struct StationsArgs {
    /// ISO 3166-1 alpha-2 country code
    #[arg(long = "country-code", value_name = "CODE")]
    pub country_code: Option<String>,

    /// Country name (substring unless --exact-country)
    #[arg(long = "country", value_name = "NAME")]
    pub country: Option<String>,

    /// Match --country against the whole name
    #[arg(long = "exact-country", requires = "country")]
    pub exact_country: bool,

    /// US state or territory code
    #[arg(long = "state", value_name = "CODE")]
    pub state: Option<String>,

    /// Station name substring
    #[arg(long = "name", value_name = "TEXT")]
    pub name: Option<String>,

    /// Bounding box as min_lat,max_lat,min_lon,max_lon
    #[arg(long = "region", value_name = "BBOX")]
    pub region: Option<BoundingBox>,

    /// Only stations reporting since January 1 of last year
    #[arg(long = "recent")]
    pub recent: bool,

    /// Show at most this many stations
    #[arg(long = "limit", value_name = "COUNT")]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the inventory command
#[derive(Debug, Clone, Parser)]
pub struct InventoryArgs {
    /// Restrict to one station id
    #[arg(value_name = "STATION")]
    pub station: Option<String>,

    /// Print yearly totals instead of monthly rows
    #[arg(long = "yearly", requires = "station")]
    pub yearly: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the countries command
#[derive(Debug, Clone, Parser)]
pub struct CountriesArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Human,
    /// JSON for scripting
    Json,
    /// CSV for data analysis
    Csv,
}

/// Quality code handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    /// Keep every value
    KeepAll,
    /// Null values flagged erroneous
    DropErroneous,
    /// Null values flagged suspect or erroneous
    DropSuspect,
}

impl From<QualityArg> for QualityPolicy {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::KeepAll => QualityPolicy::KeepAll,
            QualityArg::DropErroneous => QualityPolicy::DropErroneous,
            QualityArg::DropSuspect => QualityPolicy::DropSuspect,
        }
    }
}

/// Comma-separated years and inclusive year ranges, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearList {
    pub years: Vec<i32>,
}

impl FromStr for YearList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse_year = |text: &str| {
            text.trim()
                .parse::<i32>()
                .map_err(|_| Error::invalid_parameter(format!("'{}' is not a year", text.trim())))
        };

        let mut years = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_year(start)?, parse_year(end)?);
                    if start > end {
                        return Err(Error::invalid_parameter(format!(
                            "year range {} is reversed",
                            part
                        )));
                    }
                    years.extend(start..=end);
                }
                None => years.push(parse_year(part)?),
            }
        }

        if years.is_empty() {
            return Err(Error::invalid_parameter("year list cannot be empty"));
        }
        Ok(YearList { years })
    }
}

/// Inclusive latitude/longitude bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl FromStr for BoundingBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| {
                p.trim().parse::<f64>().map_err(|_| {
                    Error::invalid_parameter(format!("'{}' is not a coordinate", p.trim()))
                })
            })
            .collect::<Result<_>>()?;

        match parts.as_slice() {
            &[min_lat, max_lat, min_lon, max_lon] => Ok(BoundingBox {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            }),
            _ => Err(Error::invalid_parameter(
                "region must be in format: min_lat,max_lat,min_lon,max_lon",
            )),
        }
    }
}

impl CommonArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Cache directory, falling back to the platform cache location
    pub fn resolve_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::cache_dir()
                .map(|dir| dir.join("isd-processor"))
                .ok_or_else(|| {
                    Error::configuration("no platform cache directory; pass --cache-dir")
                }),
        }
    }

    /// Base configuration for every command
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::default().with_cache_dir(self.resolve_cache_dir()?);
        if self.no_cwd_cache {
            config = config.without_working_dir_lookup();
        }
        Ok(config)
    }
}

impl WeatherArgs {
    /// Configuration with this command's download and decode options applied
    pub fn config(&self) -> Result<Config> {
        let mut config = self
            .common
            .config()?
            .with_quality_policy(self.quality.into());
        if self.skip_bad_lines {
            config = config.with_decode_error_policy(DecodeErrorPolicy::Skip);
        }
        if let Some(retries) = self.retries {
            let backoff = Duration::from_millis(config.retry_backoff_ms);
            config = config.with_retries(retries, backoff);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_fetches(jobs);
        }
        config.validate()?;
        Ok(config)
    }
}

impl StationsArgs {
    /// Translate the filters into a catalog query
    pub fn query(&self) -> StationQuery {
        let mut query = StationQuery::new();
        query.country_code = self.country_code.clone();
        query.state = self.state.clone();
        query.name = self.name.clone();
        if let Some(country) = &self.country {
            let matching = if self.exact_country {
                NameMatch::Exact
            } else {
                NameMatch::Contains
            };
            query = query.with_country(country.clone(), matching);
        }
        if let Some(region) = self.region {
            query = query
                .with_lat_range(region.min_lat, region.max_lat)
                .with_lon_range(region.min_lon, region.max_lon);
        }
        if self.recent {
            query = query.with_recent_data();
        }
        query
    }
}
