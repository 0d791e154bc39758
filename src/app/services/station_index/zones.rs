//! Timezone resolution from station coordinates
//!
//! The published catalog carries no zone column, so station zones come
//! from a timezone boundary polygon lookup.

use super::ZoneLookup;
use tzf_rs::DefaultFinder;

/// Coordinate-to-zone lookup backed by the bundled boundary data
pub struct CoordinateZones {
    finder: DefaultFinder,
}

impl CoordinateZones {
    /// Build the finder; this decodes the embedded boundary data once
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for CoordinateZones {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneLookup for CoordinateZones {
    fn zone_at(&self, latitude: f64, longitude: f64) -> Option<String> {
        let name = self.finder.get_tz_name(longitude, latitude);
        (!name.is_empty()).then(|| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones_for_known_airports() {
        let zones = CoordinateZones::new();
        assert_eq!(
            zones.zone_at(40.779, -73.880).as_deref(),
            Some("America/New_York")
        );
        assert_eq!(zones.zone_at(51.478, -0.461).as_deref(), Some("Europe/London"));
        assert_eq!(
            zones.zone_at(-33.946, 151.177).as_deref(),
            Some("Australia/Sydney")
        );
    }
}
