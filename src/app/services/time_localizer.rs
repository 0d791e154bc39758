//! Time localization and hourly regularization
//!
//! Observations arrive stamped in UTC. This service projects them into an
//! output timezone (the station's IANA zone, an explicit override, or UTC)
//! and can regularize them onto an hourly grid.
//!
//! Zone rules are resolved per timestamp through `chrono-tz`, so historical
//! offset changes are honoured. In raw mode two observations either side of
//! a "fall back" transition can carry the same local wall-clock time; both
//! rows are kept. Hourly mode emits one slot per `HH:00` instant, so its
//! slots sit on clock hours and are strictly increasing even across
//! transitions.

use crate::app::models::{ObservationRecord, StationMetadata, TempUnit, WeatherRow};
use crate::{Error, Result};
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Projects UTC observations into an output timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLocalizer {
    zone: Tz,
}

impl Default for TimeLocalizer {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimeLocalizer {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Localizer that leaves timestamps in UTC
    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Pick the output zone for a station
    ///
    /// An explicit override wins, then the station's catalog zone. With
    /// `convert_to_local` off, or no zone known, output stays in UTC.
    pub fn for_station(
        station: &StationMetadata,
        zone_override: Option<Tz>,
        convert_to_local: bool,
    ) -> Self {
        if !convert_to_local {
            return Self::utc();
        }
        match zone_override.or_else(|| station.tz()) {
            Some(zone) => Self::new(zone),
            None => {
                warn!(
                    "Station {} has no timezone, times stay in UTC",
                    station.id
                );
                Self::utc()
            }
        }
    }

    /// The output timezone
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Convert every observation to the output zone, keeping input order
    pub fn localize(&self, records: &[ObservationRecord], unit: TempUnit) -> Vec<WeatherRow> {
        records
            .iter()
            .map(|record| WeatherRow {
                station_id: record.station_id.clone(),
                time: record.time.with_timezone(&self.zone),
                measurements: record.measurements.clone().with_temp_unit(unit),
            })
            .collect()
    }

    /// Bucket rows by the calendar year of their output timestamp
    ///
    /// Buckets are emitted in `years` order and sorted by time within each
    /// year. Rows outside the requested years are dropped. Rows with equal
    /// timestamps keep their relative order.
    pub fn order_by_years(&self, rows: Vec<WeatherRow>, years: &[i32]) -> Vec<WeatherRow> {
        let mut buckets: HashMap<i32, Vec<WeatherRow>> = HashMap::new();
        let mut dropped = 0usize;
        for row in rows {
            let year = row.time.year();
            if years.contains(&year) {
                buckets.entry(year).or_default().push(row);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!("Dropped {} rows outside the requested years", dropped);
        }

        let mut ordered = Vec::new();
        for year in years {
            if let Some(mut bucket) = buckets.remove(year) {
                bucket.sort_by_key(|row| row.time);
                ordered.extend(bucket);
            }
        }
        ordered
    }

    /// Regularize one year onto an hourly grid in the output zone
    ///
    /// Slots are the instants in the year at which the local clock reads
    /// `HH:00`, in order. A wall-clock hour skipped by a transition has no
    /// slot; a wall-clock hour that repeats gets one slot per pass. Each slot
    /// takes the most recent observation carrying at least one measurement
    /// whose local time falls in the slot's clock hour, up to the next slot.
    /// An empty slot keeps its timestamp and station id with every
    /// measurement null.
    pub fn make_hourly(
        &self,
        station_id: &str,
        records: &[ObservationRecord],
        year: i32,
        unit: TempUnit,
    ) -> Result<Vec<WeatherRow>> {
        let slots = self.clock_hours(year)?;
        let (Some(&(_, start)), Some(&(_, last))) = (slots.first(), slots.last()) else {
            return Ok(Vec::new());
        };
        let end = last + Duration::hours(1);

        let mut candidates: Vec<(&ObservationRecord, NaiveDateTime)> = records
            .iter()
            .filter(|r| r.time >= start && r.time < end && !r.measurements.is_empty())
            .map(|r| (r, clock_hour(r.time.with_timezone(&self.zone).naive_local())))
            .collect();
        candidates.sort_by_key(|(r, _)| r.time);

        let mut rows = Vec::with_capacity(slots.len());
        let mut next = 0;
        for (i, &(label, slot)) in slots.iter().enumerate() {
            let slot_end = slots.get(i + 1).map_or(end, |&(_, t)| t);
            let mut chosen = None;
            while next < candidates.len() && candidates[next].0.time < slot_end {
                let (record, hour) = candidates[next];
                if hour == label {
                    chosen = Some(record);
                }
                next += 1;
            }

            rows.push(WeatherRow {
                station_id: station_id.to_string(),
                time: slot.with_timezone(&self.zone),
                measurements: chosen
                    .map(|r| r.measurements.clone().with_temp_unit(unit))
                    .unwrap_or_default(),
            });
        }

        debug!(
            "Hourly grid for {} {}: {} slots from {} observations",
            station_id,
            year,
            rows.len(),
            candidates.len()
        );
        Ok(rows)
    }

    /// Every `HH:00` instant of a calendar year in the output zone
    ///
    /// Pairs each instant with its wall-clock label, sorted by instant.
    fn clock_hours(&self, year: i32) -> Result<Vec<(NaiveDateTime, DateTime<Utc>)>> {
        let midnight = |y: i32| {
            NaiveDate::from_ymd_opt(y, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or_else(|| Error::invalid_parameter(format!("year {} is out of range", y)))
        };
        let first = midnight(year)?;
        let stop = midnight(year + 1)?;

        let mut slots = Vec::with_capacity(8785);
        let mut skipped = 0usize;
        let mut label = first;
        while label < stop {
            match self.zone.from_local_datetime(&label) {
                LocalResult::Single(t) => slots.push((label, t.with_timezone(&Utc))),
                LocalResult::Ambiguous(earlier, later) => {
                    slots.push((label, earlier.with_timezone(&Utc)));
                    slots.push((label, later.with_timezone(&Utc)));
                }
                LocalResult::None => skipped += 1,
            }
            label += Duration::hours(1);
        }
        if skipped > 0 {
            debug!("{} clock hours of {} do not exist in {}", skipped, year, self.zone);
        }

        slots.sort_by_key(|&(_, t)| t);
        Ok(slots)
    }
}

/// Truncate a wall-clock time to the start of its hour
fn clock_hour(local: NaiveDateTime) -> NaiveDateTime {
    local
        .date()
        .and_hms_opt(local.hour(), 0, 0)
        .unwrap_or(local)
}
