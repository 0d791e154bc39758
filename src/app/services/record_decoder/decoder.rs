//! Station-year archive decoding
//!
//! Drives [`decode_line`](super::decode_line) over every line of a
//! decompressed archive and applies the configured error policy.

use super::stats::{DecodeResult, DecodeStats};
use super::{DecodeOptions, decode_line};
use crate::config::DecodeErrorPolicy;
use crate::{Error, Result};
use tracing::{debug, warn};

/// Decoder for whole station-year archives
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    options: DecodeOptions,
    error_policy: DecodeErrorPolicy,
}

impl RecordDecoder {
    pub fn new(options: DecodeOptions, error_policy: DecodeErrorPolicy) -> Self {
        Self {
            options,
            error_policy,
        }
    }

    /// Decode every non-blank line of an archive
    ///
    /// Under [`DecodeErrorPolicy::Abort`] the first bad line fails the whole
    /// archive with [`Error::Decode`]; under [`DecodeErrorPolicy::Skip`] the
    /// line is logged, counted and left out.
    pub fn decode_text(&self, text: &str, station_id: &str, year: i32) -> Result<DecodeResult> {
        let mut observations = Vec::new();
        let mut stats = DecodeStats::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            stats.total_lines += 1;
            let line_number = index + 1;

            match decode_line(line, &self.options) {
                Ok(record) => {
                    observations.push(record);
                    stats.observations_decoded += 1;
                }
                Err(e) => match self.error_policy {
                    DecodeErrorPolicy::Abort => {
                        return Err(Error::decode(
                            station_id,
                            year,
                            line_number,
                            e.offset,
                            e.message,
                        ));
                    }
                    DecodeErrorPolicy::Skip => {
                        warn!(
                            "Skipping {} {} line {}: {}",
                            station_id, year, line_number, e
                        );
                        stats.lines_skipped += 1;
                        stats
                            .errors
                            .push(format!("line {}: {}", line_number, e));
                    }
                },
            }
        }

        debug!(
            "Decoded {} {}: {}/{} lines ({} skipped)",
            station_id,
            year,
            stats.observations_decoded,
            stats.total_lines,
            stats.lines_skipped
        );

        Ok(DecodeResult {
            observations,
            stats,
        })
    }
}
