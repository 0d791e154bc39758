//! Weather retrieval service
//!
//! Ties the station index, acquisition manager, record decoder and time
//! localizer together behind one query surface. A request names a station
//! and a set of years; the service resolves each station-year to an
//! archive, decodes it, projects timestamps into the output zone and hands
//! back rows grouped in the order the years were requested.

use crate::app::models::{InventoryRow, StationMetadata, TempUnit, WeatherRow};
use crate::app::services::acquisition::{AcquisitionManager, CacheEntry, Transport};
use crate::app::services::inventory::Inventory;
use crate::app::services::record_decoder::{DecodeOptions, DecodeStats, RecordDecoder};
use crate::app::services::station_index::{StationIndex, StationQuery};
use crate::app::services::time_localizer::TimeLocalizer;
use crate::config::Config;
use crate::constants::FIRST_ARCHIVE_YEAR;
use crate::{Error, Result};
use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Which years a request covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearSelection {
    Single(i32),
    /// Years in the order results should be returned
    List(Vec<i32>),
    /// Every year in the station's catalog coverage
    #[default]
    All,
}

impl From<i32> for YearSelection {
    fn from(year: i32) -> Self {
        YearSelection::Single(year)
    }
}

impl From<Vec<i32>> for YearSelection {
    fn from(years: Vec<i32>) -> Self {
        YearSelection::List(years)
    }
}

impl From<&[i32]> for YearSelection {
    fn from(years: &[i32]) -> Self {
        YearSelection::List(years.to_vec())
    }
}

/// Parameters of a weather data request
#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub station_id: String,
    pub years: YearSelection,
    pub temp_unit: TempUnit,
    /// Attach the station's catalog metadata to the result
    pub include_station_info: bool,
    /// Regularize onto a one-row-per-hour grid
    pub make_hourly: bool,
    /// Express timestamps in the station's local zone instead of UTC
    pub convert_to_local: bool,
    /// Cache directory for this request only
    pub cache_dir: Option<PathBuf>,
    /// Output zone overriding the station's catalog zone
    pub timezone: Option<Tz>,
}

impl WeatherRequest {
    pub fn new(station_id: impl Into<String>) -> Self {
        Self {
            station_id: station_id.into(),
            years: YearSelection::All,
            temp_unit: TempUnit::Celsius,
            include_station_info: false,
            make_hourly: false,
            convert_to_local: false,
            cache_dir: None,
            timezone: None,
        }
    }

    pub fn with_years(mut self, years: impl Into<YearSelection>) -> Self {
        self.years = years.into();
        self
    }

    pub fn with_temp_unit(mut self, unit: TempUnit) -> Self {
        self.temp_unit = unit;
        self
    }

    pub fn with_station_info(mut self) -> Self {
        self.include_station_info = true;
        self
    }

    pub fn hourly(mut self) -> Self {
        self.make_hourly = true;
        self
    }

    pub fn local_time(mut self) -> Self {
        self.convert_to_local = true;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Convert to this zone regardless of the station's own
    pub fn with_timezone(mut self, zone: Tz) -> Self {
        self.timezone = Some(zone);
        self.convert_to_local = true;
        self
    }
}

/// Result of a weather data request
#[derive(Debug, Clone)]
pub struct WeatherData {
    /// Rows grouped by requested year, time-ordered within each year
    pub rows: Vec<WeatherRow>,
    /// Station metadata, when requested
    pub station: Option<StationMetadata>,
    /// Zone the row timestamps are expressed in
    pub timezone: Tz,
    /// Where each resolved station-year came from
    pub sources: Vec<CacheEntry>,
    /// Years with no published archive
    pub missing_years: Vec<i32>,
    pub stats: DecodeStats,
    /// Monthly counts of the decoded observations, by UTC month
    pub observed: Inventory,
}

/// Query surface over the station catalog and observation archive
#[derive(Debug)]
pub struct WeatherService<T> {
    index: Arc<StationIndex>,
    acquisition: AcquisitionManager<T>,
    decoder: RecordDecoder,
    inventory: Option<Arc<Inventory>>,
}

impl<T: Transport> WeatherService<T> {
    /// Create a service over a loaded index
    pub fn new(index: Arc<StationIndex>, transport: T, config: Config) -> Result<Self> {
        config.validate()?;
        let decoder = RecordDecoder::new(
            DecodeOptions {
                quality_policy: config.quality_policy,
                derive_humidity: true,
            },
            config.decode_error_policy,
        );
        Ok(Self {
            index,
            acquisition: AcquisitionManager::new(transport, config),
            decoder,
            inventory: None,
        })
    }

    /// Attach the published inventory
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = Some(Arc::new(inventory));
        self
    }

    /// Share a cancellation token for outstanding fetches
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.acquisition = self.acquisition.with_cancellation(token);
        self
    }

    pub fn index(&self) -> &StationIndex {
        &self.index
    }

    pub fn acquisition(&self) -> &AcquisitionManager<T> {
        &self.acquisition
    }

    /// Retrieve decoded observations for one station
    ///
    /// Unknown stations fail with [`Error::NotFound`] before anything is
    /// fetched. Years without a published archive contribute no rows.
    pub async fn get_weather_data(&self, request: &WeatherRequest) -> Result<WeatherData> {
        let station = self.index.lookup(&request.station_id)?;
        let years = self.requested_years(station, &request.years)?;
        info!(
            "Retrieving {} for years {:?} ({})",
            station.id, years, request.temp_unit
        );

        let resolved = self
            .acquisition
            .resolve_years(&station.id, &years, request.cache_dir.as_deref())
            .await?;

        let mut records = Vec::new();
        let mut stats = DecodeStats::new();
        let mut sources = Vec::new();
        let mut missing_years = Vec::new();
        let mut published_years = Vec::new();

        for (year, station_year) in resolved {
            let Some(station_year) = station_year else {
                missing_years.push(year);
                continue;
            };
            let result = self
                .decoder
                .decode_text(&station_year.text, &station.id, year)?;
            records.extend(result.observations);
            stats.merge(result.stats);
            sources.push(station_year.entry);
            published_years.push(year);
        }

        let localizer =
            TimeLocalizer::for_station(station, request.timezone, request.convert_to_local);

        let rows = if request.make_hourly {
            let mut rows = Vec::new();
            for &year in &published_years {
                rows.extend(localizer.make_hourly(
                    &station.id,
                    &records,
                    year,
                    request.temp_unit,
                )?);
            }
            rows
        } else {
            let rows = localizer.localize(&records, request.temp_unit);
            localizer.order_by_years(rows, &years)
        };

        debug!(
            "{}: {} rows from {} observations, {} years missing",
            station.id,
            rows.len(),
            records.len(),
            missing_years.len()
        );

        let observed = Inventory::from_observations(&records);

        Ok(WeatherData {
            rows,
            station: request.include_station_info.then(|| station.clone()),
            timezone: localizer.zone(),
            sources,
            missing_years,
            stats,
            observed,
        })
    }

    /// Stations matching every predicate set in `query`, in catalog order
    pub fn search_stations(&self, query: &StationQuery) -> Result<Vec<&StationMetadata>> {
        self.index.search(query)
    }

    /// The whole station catalog in catalog order
    pub fn get_station_metadata(&self) -> &[StationMetadata] {
        self.index.get_all()
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.inventory.as_deref()
    }

    /// Monthly observation counts from the attached inventory
    pub fn get_inventory(&self) -> Result<&[InventoryRow]> {
        self.inventory
            .as_deref()
            .map(Inventory::rows)
            .ok_or_else(|| Error::configuration("no inventory has been loaded"))
    }

    /// (ISO code, country name) pairs present in the catalog, sorted by name
    pub fn get_countries(&self) -> Vec<(String, String)> {
        let unique: BTreeSet<(&str, &str)> = self
            .index
            .get_all()
            .iter()
            .filter_map(|s| Some((s.country_code.as_deref()?, s.country.as_deref()?)))
            .collect();
        let mut countries: Vec<(String, String)> = unique
            .into_iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        countries.sort_by(|a, b| a.1.cmp(&b.1));
        countries
    }

    /// Years with data for a station
    ///
    /// Uses the inventory when attached, else the catalog coverage dates.
    pub fn years_for_station(&self, station_id: &str) -> Result<Vec<i32>> {
        let station = self.index.lookup(station_id)?;
        if let Some(inventory) = &self.inventory {
            return Ok(inventory.years_for_station(&station.id));
        }
        Ok(station.coverage_years().unwrap_or_default())
    }

    /// Expand and validate the requested years, keeping request order
    fn requested_years(
        &self,
        station: &StationMetadata,
        selection: &YearSelection,
    ) -> Result<Vec<i32>> {
        let years = match selection {
            YearSelection::Single(year) => vec![*year],
            YearSelection::List(years) => years.clone(),
            YearSelection::All => station.coverage_years().ok_or_else(|| {
                Error::invalid_parameter(format!(
                    "station {} has no coverage dates; years must be given",
                    station.id
                ))
            })?,
        };
        if years.is_empty() {
            return Err(Error::invalid_parameter("at least one year is required"));
        }

        let current = Utc::now().year();
        let mut unique = Vec::with_capacity(years.len());
        for year in years {
            if !(FIRST_ARCHIVE_YEAR..=current).contains(&year) {
                return Err(Error::invalid_parameter(format!(
                    "year {} is outside {}..={}",
                    year, FIRST_ARCHIVE_YEAR, current
                )));
            }
            if !unique.contains(&year) {
                unique.push(year);
            }
        }
        Ok(unique)
    }
}
