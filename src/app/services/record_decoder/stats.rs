//! Decoding statistics and result structures for station-year archives

use crate::app::models::ObservationRecord;

/// Decoding result with observations and basic statistics
#[derive(Debug, Clone)]
pub struct DecodeResult {
    /// Successfully decoded observation records, in file order
    pub observations: Vec<ObservationRecord>,

    /// Basic decoding statistics
    pub stats: DecodeStats,
}

/// Per-archive decoding statistics
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecodeStats {
    /// Non-blank lines encountered
    pub total_lines: usize,

    /// Lines decoded into observations
    pub observations_decoded: usize,

    /// Lines skipped under the skip policy
    pub lines_skipped: usize,

    /// Description of each skipped line
    pub errors: Vec<String>,
}

impl DecodeStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            (self.observations_decoded as f64 / self.total_lines as f64) * 100.0
        }
    }

    /// Fold another archive's statistics into these
    pub fn merge(&mut self, other: DecodeStats) {
        self.total_lines += other.total_lines;
        self.observations_decoded += other.observations_decoded;
        self.lines_skipped += other.lines_skipped;
        self.errors.extend(other.errors);
    }
}
