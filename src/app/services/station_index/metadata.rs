//! Station index loading statistics

/// Statistics about a station catalog load
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Data rows read from the catalog
    pub total_records_found: usize,

    /// Stations added to the index
    pub stations_loaded: usize,

    /// Rows rejected as malformed or out of range
    pub records_rejected: usize,

    /// Rows whose id was already present
    pub duplicates: usize,

    /// Stations given a timezone by a zone lookup
    pub timezones_assigned: usize,

    /// Time taken to load the catalog
    pub load_duration: std::time::Duration,

    /// Description of each rejected row
    pub errors: Vec<String>,
}

impl LoadStats {
    /// Create new empty load statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate the rejection rate as a percentage
    pub fn rejection_rate(&self) -> f64 {
        if self.total_records_found == 0 {
            0.0
        } else {
            (self.records_rejected as f64 / self.total_records_found as f64) * 100.0
        }
    }

    /// Check if any rows were rejected
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "Read {} catalog rows, loaded {} stations ({:.1}% rejected, {} duplicates) in {:.2}s",
            self.total_records_found,
            self.stations_loaded,
            self.rejection_rate(),
            self.duplicates,
            self.load_duration.as_secs_f64()
        )
    }
}
