//! Station index service for O(1) station metadata lookups
//!
//! Loads the ISD station catalog once and answers id lookups and filtered
//! searches against it. Rows keep their catalog order so that listings and
//! search results are reproducible.

use crate::app::models::StationMetadata;
use crate::{Error, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

pub mod codes;
pub mod loader;
pub mod metadata;
pub mod query;
pub mod zones;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use metadata::LoadStats;
pub use query::{NameMatch, StationQuery};
pub use zones::CoordinateZones;

/// Resolves a coordinate to an IANA timezone name
///
/// Used at index build time for catalog rows that carry no zone of their
/// own. Any `Fn(f64, f64) -> Option<String>` closure works as a lookup.
pub trait ZoneLookup {
    fn zone_at(&self, latitude: f64, longitude: f64) -> Option<String>;
}

impl<F> ZoneLookup for F
where
    F: Fn(f64, f64) -> Option<String>,
{
    fn zone_at(&self, latitude: f64, longitude: f64) -> Option<String> {
        self(latitude, longitude)
    }
}

/// Station index providing O(1) lookups over catalog-ordered rows
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    /// Stations in catalog order
    pub(crate) stations: Vec<StationMetadata>,

    /// Position of each station id in `stations`
    pub(crate) by_id: HashMap<String, usize>,
}

impl StationIndex {
    /// Create a new empty station index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from stations in catalog order; the first row per id wins
    pub fn from_stations(stations: impl IntoIterator<Item = StationMetadata>) -> Self {
        let mut index = Self::new();
        for station in stations {
            index.insert(station);
        }
        index
    }

    /// Add a station; returns false (and keeps the existing row) for a duplicate id
    pub fn insert(&mut self, station: StationMetadata) -> bool {
        match self.by_id.entry(station.id.clone()) {
            Entry::Vacant(e) => {
                e.insert(self.stations.len());
                self.stations.push(station);
                true
            }
            Entry::Occupied(_) => {
                warn!(
                    "Duplicate station found: id = {}, name = '{}', keeping existing",
                    station.id,
                    station.name.as_deref().unwrap_or("")
                );
                false
            }
        }
    }

    /// Get station metadata by id (O(1) lookup)
    pub fn lookup(&self, station_id: &str) -> Result<&StationMetadata> {
        self.get(station_id)
            .ok_or_else(|| Error::not_found(station_id))
    }

    /// Get station metadata by id if present
    pub fn get(&self, station_id: &str) -> Option<&StationMetadata> {
        self.by_id.get(station_id).map(|&i| &self.stations[i])
    }

    /// Check if a station exists in the index
    pub fn contains(&self, station_id: &str) -> bool {
        self.by_id.contains_key(station_id)
    }

    /// Every station, in catalog order
    pub fn get_all(&self) -> &[StationMetadata] {
        &self.stations
    }

    /// Get the total number of stations in the index
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Fill in missing timezones from station coordinates
    ///
    /// Stations that already carry a zone, or lack coordinates, are left
    /// alone. Names the lookup returns that are not valid IANA zones are
    /// ignored. Returns the number of stations assigned a zone.
    pub fn assign_timezones(&mut self, lookup: &dyn ZoneLookup) -> usize {
        let mut assigned = 0;
        for station in self.stations.iter_mut().filter(|s| s.timezone.is_none()) {
            let (Some(lat), Some(lon)) = (station.latitude, station.longitude) else {
                continue;
            };
            match lookup.zone_at(lat, lon) {
                Some(name) if name.parse::<chrono_tz::Tz>().is_ok() => {
                    station.timezone = Some(name);
                    assigned += 1;
                }
                Some(name) => {
                    debug!("Ignoring unknown zone '{}' for station {}", name, station.id)
                }
                None => {}
            }
        }
        assigned
    }
}
