//! ISD record decoder
//!
//! Turns raw fixed-width ISD lines into typed, unit-scaled observations.
//!
//! ## Architecture
//!
//! - [`fields`] - Fixed-width field readers, sentinel and quality screening
//! - [`mandatory`] - The 105-byte control and mandatory data section
//! - [`groups`] - Tagged additional data groups and their width registry
//! - [`humidity`] - Relative humidity derivation
//! - [`decoder`] - Whole-archive decoding under an error policy
//! - [`stats`] - Decoding statistics and result structures
//!
//! Decoding a line is a pure function: it either yields exactly one
//! [`ObservationRecord`] or a [`LineError`] naming the byte offset at which
//! the line stopped making sense. Recovery is the caller's decision.

pub mod decoder;
pub mod fields;
pub mod groups;
pub mod humidity;
pub mod mandatory;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use decoder::RecordDecoder;
pub use stats::{DecodeResult, DecodeStats};

use crate::app::models::ObservationRecord;
use crate::config::QualityPolicy;
use crate::constants::layout;

/// Structural failure while decoding one line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("byte {offset}: {message}")]
pub struct LineError {
    /// Byte offset within the line where decoding failed
    pub offset: usize,
    pub message: String,
}

impl LineError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Options applied while decoding each line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub quality_policy: QualityPolicy,
    /// Derive relative humidity from temperature and dew point
    pub derive_humidity: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            quality_policy: QualityPolicy::default(),
            derive_humidity: true,
        }
    }
}

/// Decode one raw ISD line into an observation (temperatures in °C)
pub fn decode_line(line: &str, options: &DecodeOptions) -> Result<ObservationRecord, LineError> {
    let bytes = line.as_bytes();
    let section = mandatory::parse_mandatory(bytes, options.quality_policy)?;
    let mut measurements = section.measurements;

    groups::parse_additional(
        bytes,
        layout::MANDATORY_LENGTH,
        section.additional_length,
        options.quality_policy,
        &mut measurements,
    )?;

    if options.derive_humidity && measurements.relative_humidity.is_none() {
        measurements.relative_humidity =
            humidity::relative_humidity(measurements.temperature, measurements.dew_point);
    }

    Ok(ObservationRecord {
        station_id: section.station_id,
        time: section.time,
        measurements,
    })
}
