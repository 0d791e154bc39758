//! Mandatory data section decoding
//!
//! The first 105 bytes of every ISD record hold the control and mandatory
//! fields at fixed offsets. Values are stored as fixed-point integers with a
//! per-field sentinel; sentinels become `None` before any scaling.

use super::LineError;
use super::fields::{code, integer, optional_integer, scaled, screen, text};
use crate::app::models::{Measurements, station_id};
use crate::config::QualityPolicy;
use crate::constants::{VISIBILITY_CAP_M, layout, scale, sentinels};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Decoded control and mandatory fields of one record
#[derive(Debug, Clone, PartialEq)]
pub struct MandatorySection {
    pub station_id: String,
    pub time: DateTime<Utc>,
    /// Declared number of characters following the mandatory section
    pub additional_length: usize,
    pub measurements: Measurements,
}

/// Decode the mandatory section of a raw record line
pub fn parse_mandatory(
    line: &[u8],
    policy: QualityPolicy,
) -> Result<MandatorySection, LineError> {
    if line.len() < layout::MANDATORY_LENGTH {
        return Err(LineError::new(
            line.len(),
            format!(
                "line has {} bytes, mandatory section needs {}",
                line.len(),
                layout::MANDATORY_LENGTH
            ),
        ));
    }

    let additional_length = integer(line, layout::VARIABLE_LENGTH, "additional_length")?;
    let additional_length = usize::try_from(additional_length).map_err(|_| {
        LineError::new(
            layout::VARIABLE_LENGTH.start,
            format!("negative additional data length {}", additional_length),
        )
    })?;

    let usaf = text(line, layout::USAF, "usaf")?;
    let wban = text(line, layout::WBAN, "wban")?;
    if usaf.trim().is_empty() || wban.trim().is_empty() {
        return Err(LineError::new(
            layout::USAF.start,
            "station identifier is blank",
        ));
    }

    let time = parse_timestamp(line)?;

    // Position fields must be numeric; the catalog supplies station coordinates
    integer(line, layout::LATITUDE, "latitude")?;
    integer(line, layout::LONGITUDE, "longitude")?;
    integer(line, layout::ELEVATION, "elevation")?;

    Ok(MandatorySection {
        station_id: station_id(usaf, wban),
        time,
        additional_length,
        measurements: parse_measurements(line, policy)?,
    })
}

fn parse_timestamp(line: &[u8]) -> Result<DateTime<Utc>, LineError> {
    let date_text = text(line, layout::DATE, "date")?;
    let date = NaiveDate::parse_from_str(date_text, "%Y%m%d").map_err(|_| {
        LineError::new(
            layout::DATE.start,
            format!("invalid observation date '{}'", date_text),
        )
    })?;

    let time_text = text(line, layout::TIME, "time")?;
    let hhmm = integer(line, layout::TIME, "time")?;
    let time = NaiveTime::from_hms_opt((hhmm / 100) as u32, (hhmm % 100) as u32, 0)
        .ok_or_else(|| {
            LineError::new(
                layout::TIME.start,
                format!("invalid observation time '{}'", time_text),
            )
        })?;

    Ok(date.and_time(time).and_utc())
}

fn parse_measurements(line: &[u8], policy: QualityPolicy) -> Result<Measurements, LineError> {
    let wind_direction = optional_integer(
        line,
        layout::WIND_DIRECTION,
        sentinels::WIND_DIRECTION,
        "wind_direction",
    )?;
    let wind_direction_qc = code(line, layout::WIND_DIRECTION_QC, "wind_direction_qc")?;

    let wind_speed = optional_integer(line, layout::WIND_SPEED, sentinels::WIND_SPEED, "wind_speed")?;
    let wind_speed_qc = code(line, layout::WIND_SPEED_QC, "wind_speed_qc")?;

    let ceiling = optional_integer(line, layout::CEILING, sentinels::CEILING, "ceiling_height")?;
    let ceiling_qc = code(line, layout::CEILING_QC, "ceiling_height_qc")?;

    let visibility = optional_integer(line, layout::VISIBILITY, sentinels::VISIBILITY, "visibility")?;
    let visibility_qc = code(line, layout::VISIBILITY_QC, "visibility_qc")?;

    let temperature =
        optional_integer(line, layout::TEMPERATURE, sentinels::TEMPERATURE, "temperature")?;
    let temperature_qc = code(line, layout::TEMPERATURE_QC, "temperature_qc")?;

    let dew_point = optional_integer(line, layout::DEW_POINT, sentinels::DEW_POINT, "dew_point")?;
    let dew_point_qc = code(line, layout::DEW_POINT_QC, "dew_point_qc")?;

    let sea_level_pressure = optional_integer(
        line,
        layout::SEA_LEVEL_PRESSURE,
        sentinels::SEA_LEVEL_PRESSURE,
        "sea_level_pressure",
    )?;
    let sea_level_pressure_qc =
        code(line, layout::SEA_LEVEL_PRESSURE_QC, "sea_level_pressure_qc")?;

    Ok(Measurements {
        wind_direction: screen(wind_direction, wind_direction_qc, policy).map(|v| v as i32),
        wind_speed: screen(scaled(wind_speed, scale::WIND_SPEED), wind_speed_qc, policy),
        // 22000 is a real value (unlimited ceiling), not a sentinel
        ceiling_height: screen(ceiling, ceiling_qc, policy).map(|v| v as i32),
        visibility: screen(visibility, visibility_qc, policy)
            .map(|v| (v as i32).min(VISIBILITY_CAP_M)),
        temperature: screen(scaled(temperature, scale::TEMPERATURE), temperature_qc, policy),
        dew_point: screen(scaled(dew_point, scale::TEMPERATURE), dew_point_qc, policy),
        sea_level_pressure: screen(
            scaled(sea_level_pressure, scale::PRESSURE),
            sea_level_pressure_qc,
            policy,
        ),
        ..Measurements::default()
    })
}
