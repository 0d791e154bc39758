//! Test utilities for the ISD record decoder
//!
//! Provides a builder for synthetic record lines so every test can state
//! exactly which fixed-width fields it changes.

use crate::constants::layout;
use std::ops::Range;

mod mandatory_tests;

/// A plausible LaGuardia observation at 2020-01-01 00:51 UTC
pub const BASE_MANDATORY: &str = concat!(
    "0000",    // additional length
    "725030",  // usaf
    "14732",   // wban
    "20200101", // date
    "0051",    // time
    "7",       // data source
    "+40779",  // latitude
    "-073881", // longitude
    "FM-15",   // report type
    "+0003",   // elevation
    "KLGA ",   // call letters
    "V030",    // qc process
    "350",     // wind direction
    "5",
    "N",       // wind type
    "0046",    // wind speed
    "1",
    "22000",   // ceiling
    "5",
    "9",
    "N",
    "016093",  // visibility
    "1",
    "9",
    "9",
    "+0061",   // temperature
    "1",
    "-0056",   // dew point
    "1",
    "10232",   // sea level pressure
    "1",
);

/// Builder for synthetic ISD record lines
#[derive(Debug, Clone)]
pub struct LineBuilder {
    mandatory: Vec<u8>,
    additional: String,
    declared: Option<usize>,
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuilder {
    pub fn new() -> Self {
        assert_eq!(BASE_MANDATORY.len(), layout::MANDATORY_LENGTH);
        Self {
            mandatory: BASE_MANDATORY.as_bytes().to_vec(),
            additional: String::new(),
            declared: None,
        }
    }

    /// Overwrite a fixed-width field; the value must fill it exactly
    pub fn field(mut self, range: Range<usize>, value: &str) -> Self {
        assert_eq!(range.len(), value.len(), "value does not fit field");
        self.mandatory[range].copy_from_slice(value.as_bytes());
        self
    }

    /// Overwrite a single-character code
    pub fn code(mut self, index: usize, value: char) -> Self {
        self.mandatory[index] = value as u8;
        self
    }

    /// Append raw additional-section text (including any `ADD` marker)
    pub fn additional(mut self, text: &str) -> Self {
        self.additional.push_str(text);
        self
    }

    /// Declare a length different from the actual additional text
    pub fn declared_length(mut self, length: usize) -> Self {
        self.declared = Some(length);
        self
    }

    pub fn build(&self) -> String {
        let mut mandatory = self.mandatory.clone();
        let declared = self.declared.unwrap_or(self.additional.len());
        mandatory[layout::VARIABLE_LENGTH].copy_from_slice(format!("{:04}", declared).as_bytes());
        let mut line = String::from_utf8(mandatory).unwrap();
        line.push_str(&self.additional);
        line
    }
}

/// Lines for one station-year covering two observations
pub fn sample_archive() -> String {
    let first = LineBuilder::new().build();
    let second = LineBuilder::new()
        .field(layout::TIME, "0151")
        .field(layout::TEMPERATURE, "+0050")
        .build();
    format!("{}\n{}\n", first, second)
}
