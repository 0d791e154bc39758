//! Station search
//!
//! A [`StationQuery`] collects optional predicates; only the predicates that
//! are set constrain the result and they combine with logical AND. Country
//! and state identifiers are checked against the canonical code tables when
//! the search runs, so a typo fails loudly instead of matching nothing.

use super::StationIndex;
use super::codes::{canonical_country_code, canonical_state_code};
use crate::app::models::StationMetadata;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How a country name predicate compares against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
    /// Whole name, case-insensitive
    Exact,
    /// Substring, case-insensitive
    #[default]
    Contains,
}

/// Search predicates for [`StationIndex::search`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationQuery {
    /// ISO 3166-1 alpha-2 country code (case-insensitive)
    pub country_code: Option<String>,

    /// Country name and how to match it
    pub country: Option<(String, NameMatch)>,

    /// US state or territory code (case-insensitive)
    pub state: Option<String>,

    /// Station name substring (case-insensitive)
    pub name: Option<String>,

    /// Inclusive latitude range (min, max)
    pub lat_range: Option<(f64, f64)>,

    /// Inclusive longitude range (min, max)
    pub lon_range: Option<(f64, f64)>,

    /// Only stations with data since January 1 of the previous year
    pub has_recent_data: bool,
}

impl StationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    pub fn with_country(mut self, name: impl Into<String>, matching: NameMatch) -> Self {
        self.country = Some((name.into(), matching));
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_lat_range(mut self, min: f64, max: f64) -> Self {
        self.lat_range = Some((min, max));
        self
    }

    pub fn with_lon_range(mut self, min: f64, max: f64) -> Self {
        self.lon_range = Some((min, max));
        self
    }

    pub fn with_recent_data(mut self) -> Self {
        self.has_recent_data = true;
        self
    }

    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Query with identifiers canonicalized and ranges checked
struct ResolvedQuery {
    country_code: Option<&'static str>,
    country: Option<(String, NameMatch)>,
    state: Option<&'static str>,
    name: Option<String>,
    lat_range: Option<(f64, f64)>,
    lon_range: Option<(f64, f64)>,
    recent_cutoff: Option<NaiveDate>,
}

impl ResolvedQuery {
    fn resolve(query: &StationQuery, today: NaiveDate) -> Result<Self> {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let country_code = non_empty(&query.country_code)
            .map(|c| canonical_country_code(&c))
            .transpose()?;
        let state = non_empty(&query.state)
            .map(|s| canonical_state_code(&s))
            .transpose()?;

        let country = query
            .country
            .as_ref()
            .map(|(name, matching)| (name.trim().to_lowercase(), *matching))
            .filter(|(name, _)| !name.is_empty());

        let recent_cutoff = if query.has_recent_data {
            NaiveDate::from_ymd_opt(today.year() - 1, 1, 1)
        } else {
            None
        };

        Ok(Self {
            country_code,
            country,
            state,
            name: non_empty(&query.name).map(|n| n.to_lowercase()),
            lat_range: check_range(query.lat_range, 90.0, "lat_range")?,
            lon_range: check_range(query.lon_range, 180.0, "lon_range")?,
            recent_cutoff,
        })
    }

    fn matches(&self, station: &StationMetadata) -> bool {
        if let Some(code) = self.country_code {
            if station.country_code.as_deref() != Some(code) {
                return false;
            }
        }

        if let Some((ref pattern, matching)) = self.country {
            let Some(country) = station.country.as_deref() else {
                return false;
            };
            let country = country.to_lowercase();
            let hit = match matching {
                NameMatch::Exact => country == *pattern,
                NameMatch::Contains => country.contains(pattern.as_str()),
            };
            if !hit {
                return false;
            }
        }

        if let Some(state) = self.state {
            if !station
                .state
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(state))
            {
                return false;
            }
        }

        if let Some(ref pattern) = self.name {
            if !station
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(pattern.as_str()))
            {
                return false;
            }
        }

        if let Some((min, max)) = self.lat_range {
            if !station.latitude.is_some_and(|lat| lat >= min && lat <= max) {
                return false;
            }
        }

        if let Some((min, max)) = self.lon_range {
            if !station.longitude.is_some_and(|lon| lon >= min && lon <= max) {
                return false;
            }
        }

        if let Some(cutoff) = self.recent_cutoff {
            if !station.end_date.is_some_and(|end| end >= cutoff) {
                return false;
            }
        }

        true
    }
}

fn check_range(range: Option<(f64, f64)>, bound: f64, label: &str) -> Result<Option<(f64, f64)>> {
    let Some((min, max)) = range else {
        return Ok(None);
    };
    if min.is_nan() || max.is_nan() || min > max {
        return Err(Error::invalid_parameter(format!(
            "{} ({}, {}) must satisfy min <= max",
            label, min, max
        )));
    }
    if min < -bound || max > bound {
        return Err(Error::invalid_parameter(format!(
            "{} ({}, {}) must lie within [-{}, {}]",
            label, min, max, bound, bound
        )));
    }
    Ok(Some((min, max)))
}

impl StationIndex {
    /// Find stations matching every predicate set in `query`
    ///
    /// Results keep catalog order. No match is an empty result; an
    /// unrecognized country or state code, or a malformed range, is
    /// [`Error::InvalidParameter`].
    pub fn search(&self, query: &StationQuery) -> Result<Vec<&StationMetadata>> {
        self.search_as_of(query, Utc::now().date_naive())
    }

    /// Search with an explicit "today" for the recent-data predicate
    pub fn search_as_of(
        &self,
        query: &StationQuery,
        today: NaiveDate,
    ) -> Result<Vec<&StationMetadata>> {
        let resolved = ResolvedQuery::resolve(query, today)?;
        Ok(self
            .stations
            .iter()
            .filter(|station| resolved.matches(station))
            .collect())
    }
}
