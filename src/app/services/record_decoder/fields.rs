//! Fixed-width field readers
//!
//! Every reader works on the raw line bytes and reports failures as a
//! [`LineError`] pointing at the first byte of the offending field.

use super::LineError;
use crate::config::QualityPolicy;
use std::ops::Range;

/// Borrow a fixed-width field as text
pub fn text<'a>(
    line: &'a [u8],
    range: Range<usize>,
    field: &str,
) -> Result<&'a str, LineError> {
    let start = range.start;
    let bytes = line.get(range).ok_or_else(|| {
        LineError::new(
            line.len(),
            format!("line ends before field '{}' at byte {}", field, start),
        )
    })?;

    std::str::from_utf8(bytes)
        .map_err(|_| LineError::new(start, format!("field '{}' is not ASCII text", field)))
}

/// Parse a signed fixed-width integer such as `+0061` or `016093`
pub fn integer(line: &[u8], range: Range<usize>, field: &str) -> Result<i64, LineError> {
    let start = range.start;
    let raw = text(line, range, field)?;
    raw.trim().parse::<i64>().map_err(|_| {
        LineError::new(
            start,
            format!("field '{}' is not numeric: '{}'", field, raw),
        )
    })
}

/// Parse an integer and map its sentinel to `None`
pub fn optional_integer(
    line: &[u8],
    range: Range<usize>,
    sentinel: i64,
    field: &str,
) -> Result<Option<i64>, LineError> {
    let value = integer(line, range, field)?;
    Ok((value != sentinel).then_some(value))
}

/// Read a single-character code
pub fn code(line: &[u8], index: usize, field: &str) -> Result<u8, LineError> {
    line.get(index).copied().ok_or_else(|| {
        LineError::new(
            line.len(),
            format!("line ends before code '{}' at byte {}", field, index),
        )
    })
}

/// Drop a value whose quality code the policy rejects
pub fn screen<T>(value: Option<T>, quality: u8, policy: QualityPolicy) -> Option<T> {
    value.filter(|_| policy.accepts(quality))
}

/// Scale a raw fixed-point integer into physical units
pub fn scaled(value: Option<i64>, divisor: f64) -> Option<f64> {
    value.map(|raw| raw as f64 / divisor)
}

/// Fill an empty slot; an existing value is never overwritten
pub fn supply<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_accepts_signs_and_padding() {
        let line = b"+0061-0056016093";
        assert_eq!(integer(line, 0..5, "temperature").unwrap(), 61);
        assert_eq!(integer(line, 5..10, "dew_point").unwrap(), -56);
        assert_eq!(integer(line, 10..16, "visibility").unwrap(), 16093);
    }

    #[test]
    fn test_integer_error_points_at_field_start() {
        let line = b"0000+00X1";
        let err = integer(line, 4..9, "temperature").unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.message.contains("temperature"));
    }

    #[test]
    fn test_text_past_end_reports_line_length() {
        let line = b"0123";
        let err = text(line, 2..8, "usaf").unwrap_err();
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_text_outlives_field_name() {
        let line = b"72503014732".to_vec();
        let usaf = {
            let field = String::from("usaf");
            text(&line, 0..6, &field).unwrap()
        };
        assert_eq!(usaf, "725030");
    }

    #[test]
    fn test_sentinel_maps_to_none() {
        let line = b"+9999";
        assert_eq!(optional_integer(line, 0..5, 9999, "temperature").unwrap(), None);
    }

    #[test]
    fn test_supply_keeps_first_value() {
        let mut slot = None;
        supply(&mut slot, Some(1));
        supply(&mut slot, Some(2));
        supply(&mut slot, None);
        assert_eq!(slot, Some(1));
    }
}
