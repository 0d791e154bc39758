//! Observation inventory
//!
//! Counts observations per station, year and month. The same long-form
//! shape is produced from decoded observations and from the published
//! `isd-inventory.csv`, so the two can be compared directly. Months with no
//! observations are left out of both.

use crate::app::models::{InventoryRow, ObservationRecord, station_id};
use crate::{Error, Result};
use chrono::Datelike;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One station-year row of the published inventory
#[derive(Debug, Deserialize)]
struct InventoryCsvRow {
    #[serde(rename = "USAF")]
    usaf: String,
    #[serde(rename = "WBAN")]
    wban: String,
    #[serde(rename = "YEAR")]
    year: i32,
    #[serde(rename = "JAN")]
    jan: u64,
    #[serde(rename = "FEB")]
    feb: u64,
    #[serde(rename = "MAR")]
    mar: u64,
    #[serde(rename = "APR")]
    apr: u64,
    #[serde(rename = "MAY")]
    may: u64,
    #[serde(rename = "JUN")]
    jun: u64,
    #[serde(rename = "JUL")]
    jul: u64,
    #[serde(rename = "AUG")]
    aug: u64,
    #[serde(rename = "SEP")]
    sep: u64,
    #[serde(rename = "OCT")]
    oct: u64,
    #[serde(rename = "NOV")]
    nov: u64,
    #[serde(rename = "DEC")]
    dec: u64,
}

impl InventoryCsvRow {
    fn monthly_counts(&self) -> [u64; 12] {
        [
            self.jan, self.feb, self.mar, self.apr, self.may, self.jun, self.jul, self.aug,
            self.sep, self.oct, self.nov, self.dec,
        ]
    }
}

/// Monthly observation counts sorted by station, year and month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    rows: Vec<InventoryRow>,
}

impl Inventory {
    /// Aggregate decoded observations by their UTC year and month
    pub fn from_observations<'a>(
        records: impl IntoIterator<Item = &'a ObservationRecord>,
    ) -> Self {
        let mut counts: BTreeMap<(String, i32, u32), u64> = BTreeMap::new();
        for record in records {
            *counts
                .entry((
                    record.station_id.clone(),
                    record.time.year(),
                    record.time.month(),
                ))
                .or_default() += 1;
        }

        let rows = counts
            .into_iter()
            .map(|((station_id, year, month), count)| InventoryRow {
                station_id,
                year,
                month,
                count,
            })
            .collect();
        Self { rows }
    }

    /// Load the published inventory file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading inventory from {}", path.display());
        let file = std::fs::File::open(path).map_err(|e| {
            Error::io(format!("Failed to open inventory {}", path.display()), e)
        })?;
        Self::from_csv_reader(file)
    }

    /// Parse inventory CSV (`USAF, WBAN, YEAR, JAN..DEC`) into long form
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (row_number, result) in csv_reader.deserialize::<InventoryCsvRow>().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping inventory row {}: {}", row_number + 2, e);
                    skipped += 1;
                    continue;
                }
            };

            let id = station_id(&record.usaf, &record.wban);
            for (month, count) in (1u32..).zip(record.monthly_counts()) {
                if count > 0 {
                    rows.push(InventoryRow {
                        station_id: id.clone(),
                        year: record.year,
                        month,
                        count,
                    });
                }
            }
        }

        if skipped > 0 && rows.is_empty() {
            return Err(Error::catalog(
                format!("Inventory has no readable rows ({} rejected)", skipped),
                None,
            ));
        }

        rows.sort();
        info!("Inventory loaded: {} station-months", rows.len());
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<InventoryRow> {
        self.rows
    }

    /// Rows for a single station
    pub fn for_station<'a>(&'a self, station_id: &'a str) -> impl Iterator<Item = &'a InventoryRow> {
        self.rows.iter().filter(move |row| row.station_id == station_id)
    }

    /// Years with at least one observation for a station, ascending
    pub fn years_for_station(&self, station_id: &str) -> Vec<i32> {
        let mut years: Vec<i32> = self.for_station(station_id).map(|row| row.year).collect();
        years.dedup();
        years
    }

    /// Total observations per year for a station, ascending by year
    pub fn yearly_totals(&self, station_id: &str) -> Vec<(i32, u64)> {
        let mut totals: BTreeMap<i32, u64> = BTreeMap::new();
        for row in self.for_station(station_id) {
            *totals.entry(row.year).or_default() += row.count;
        }
        totals.into_iter().collect()
    }
}
