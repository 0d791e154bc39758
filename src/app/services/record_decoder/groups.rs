//! Additional data section decoding
//!
//! The variable-length part of a record is a run of tagged groups: a
//! 3-character tag followed by a tag-specific number of data characters.
//! The registry below maps every tag in the ISD additional-data catalog to
//! its width so that groups we do not decode can still be stepped over.
//! Groups that feed observation fields are decoded; a value is only supplied
//! when the field is still empty, so earlier groups and the mandatory section
//! always win.

use super::LineError;
use super::fields::{code, integer, optional_integer, scaled, screen, supply, text};
use crate::app::models::Measurements;
use crate::config::QualityPolicy;
use crate::constants::{scale, sentinels};

/// Marker opening the additional data section
pub const SECTION_MARKER: &str = "ADD";

/// Section markers after which no further tagged groups follow
pub const TERMINAL_MARKERS: [&str; 3] = ["REM", "EQD", "QNN"];

/// How a registered group contributes to the observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// AA1-AA4: liquid precipitation period and depth
    Precipitation,
    /// MW1-MW7, AW1-AW4: present weather code
    PresentWeather,
    /// OC1: wind gust
    WindGust,
    /// MA1: altimeter setting and station pressure
    Pressure,
    /// Registered width only; data not carried into the observation
    Skipped,
}

/// Registry entry for one tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub kind: GroupKind,
    /// Data characters following the 3-character tag
    pub width: usize,
}

impl GroupSpec {
    const fn decoded(kind: GroupKind, width: usize) -> Self {
        Self { kind, width }
    }

    const fn skipped(width: usize) -> Self {
        Self {
            kind: GroupKind::Skipped,
            width,
        }
    }
}

/// Look up the registry entry for a tag
pub fn lookup(tag: &str) -> Option<GroupSpec> {
    use GroupKind::*;

    let spec = match tag {
        "AA1" | "AA2" | "AA3" | "AA4" => GroupSpec::decoded(Precipitation, 8),
        "MW1" | "MW2" | "MW3" | "MW4" | "MW5" | "MW6" | "MW7" => {
            GroupSpec::decoded(PresentWeather, 3)
        }
        "AW1" | "AW2" | "AW3" | "AW4" => GroupSpec::decoded(PresentWeather, 3),
        "OC1" => GroupSpec::decoded(WindGust, 5),
        "MA1" => GroupSpec::decoded(Pressure, 12),

        // Precipitation and snow
        "AB1" => GroupSpec::skipped(7),
        "AC1" => GroupSpec::skipped(3),
        "AD1" => GroupSpec::skipped(19),
        "AE1" => GroupSpec::skipped(12),
        "AG1" => GroupSpec::skipped(4),
        "AH1" | "AH2" | "AH3" | "AH4" | "AH5" | "AH6" => GroupSpec::skipped(15),
        "AI1" | "AI2" | "AI3" | "AI4" | "AI5" | "AI6" => GroupSpec::skipped(15),
        "AJ1" => GroupSpec::skipped(14),
        "AK1" => GroupSpec::skipped(12),
        "AL1" | "AL2" | "AL3" | "AL4" => GroupSpec::skipped(7),
        "AM1" => GroupSpec::skipped(18),
        "AN1" => GroupSpec::skipped(9),
        "AO1" | "AO2" | "AO3" | "AO4" => GroupSpec::skipped(8),
        "AP1" | "AP2" | "AP3" | "AP4" => GroupSpec::skipped(6),

        // Weather occurrence
        "AT1" | "AT2" | "AT3" | "AT4" | "AT5" | "AT6" | "AT7" | "AT8" => GroupSpec::skipped(9),
        "AU1" | "AU2" | "AU3" | "AU4" | "AU5" | "AU6" | "AU7" | "AU8" | "AU9" => {
            GroupSpec::skipped(8)
        }
        "AX1" | "AX2" | "AX3" | "AX4" | "AX5" | "AX6" => GroupSpec::skipped(6),
        "AY1" | "AY2" => GroupSpec::skipped(5),
        "AZ1" | "AZ2" => GroupSpec::skipped(5),

        // Climate reference network
        "CB1" | "CB2" => GroupSpec::skipped(10),
        "CF1" | "CF2" | "CF3" => GroupSpec::skipped(6),
        "CG1" | "CG2" | "CG3" => GroupSpec::skipped(8),
        "CH1" | "CH2" => GroupSpec::skipped(15),
        "CI1" => GroupSpec::skipped(28),
        "CN1" | "CN2" => GroupSpec::skipped(18),
        "CN3" => GroupSpec::skipped(16),
        "CN4" => GroupSpec::skipped(19),
        "CO1" => GroupSpec::skipped(5),
        "CO2" | "CO3" | "CO4" | "CO5" | "CO6" | "CO7" | "CO8" | "CO9" => GroupSpec::skipped(8),
        "CR1" => GroupSpec::skipped(7),
        "CT1" | "CT2" | "CT3" => GroupSpec::skipped(7),
        "CU1" | "CU2" | "CU3" => GroupSpec::skipped(13),
        "CV1" | "CV2" | "CV3" => GroupSpec::skipped(26),
        "CW1" => GroupSpec::skipped(14),
        "CX1" | "CX2" | "CX3" => GroupSpec::skipped(26),
        "ED1" => GroupSpec::skipped(8),

        // Cloud and solar
        "GA1" | "GA2" | "GA3" | "GA4" | "GA5" | "GA6" => GroupSpec::skipped(13),
        "GD1" | "GD2" | "GD3" | "GD4" | "GD5" | "GD6" => GroupSpec::skipped(12),
        "GE1" => GroupSpec::skipped(19),
        "GF1" => GroupSpec::skipped(23),
        "GG1" | "GG2" | "GG3" | "GG4" | "GG5" | "GG6" => GroupSpec::skipped(15),
        "GH1" => GroupSpec::skipped(28),
        "GJ1" => GroupSpec::skipped(5),
        "GK1" => GroupSpec::skipped(4),
        "GL1" => GroupSpec::skipped(6),
        "GM1" => GroupSpec::skipped(30),
        "GN1" => GroupSpec::skipped(28),
        "GO1" => GroupSpec::skipped(19),
        "GP1" => GroupSpec::skipped(31),
        "GQ1" => GroupSpec::skipped(14),
        "GR1" => GroupSpec::skipped(10),

        // Ground surface and hail
        "HL1" => GroupSpec::skipped(4),
        "IA1" => GroupSpec::skipped(3),
        "IA2" => GroupSpec::skipped(9),
        "IB1" => GroupSpec::skipped(27),
        "IB2" => GroupSpec::skipped(13),
        "IC1" => GroupSpec::skipped(25),

        // Temperature extremes and degree days
        "KA1" | "KA2" | "KA3" | "KA4" => GroupSpec::skipped(10),
        "KB1" | "KB2" | "KB3" => GroupSpec::skipped(10),
        "KC1" | "KC2" => GroupSpec::skipped(14),
        "KD1" | "KD2" => GroupSpec::skipped(9),
        "KE1" => GroupSpec::skipped(12),
        "KF1" => GroupSpec::skipped(6),
        "KG1" | "KG2" => GroupSpec::skipped(11),

        // Pressure
        "MD1" => GroupSpec::skipped(11),
        "ME1" => GroupSpec::skipped(6),
        "MF1" => GroupSpec::skipped(12),
        "MG1" => GroupSpec::skipped(12),
        "MH1" => GroupSpec::skipped(12),
        "MK1" => GroupSpec::skipped(24),
        "MV1" | "MV2" | "MV3" | "MV4" | "MV5" | "MV6" | "MV7" => GroupSpec::skipped(3),

        // Supplementary wind
        "OA1" | "OA2" | "OA3" => GroupSpec::skipped(8),
        "OB1" | "OB2" => GroupSpec::skipped(28),
        "OD1" | "OD2" | "OD3" => GroupSpec::skipped(11),
        "OE1" | "OE2" | "OE3" => GroupSpec::skipped(16),

        // Humidity, soil, marine
        "RH1" | "RH2" | "RH3" => GroupSpec::skipped(9),
        "SA1" => GroupSpec::skipped(5),
        "ST1" => GroupSpec::skipped(17),
        "UA1" => GroupSpec::skipped(10),
        "UG1" | "UG2" => GroupSpec::skipped(9),
        "WA1" => GroupSpec::skipped(6),
        "WD1" => GroupSpec::skipped(20),
        "WG1" => GroupSpec::skipped(11),
        "WJ1" => GroupSpec::skipped(19),

        _ => return None,
    };
    Some(spec)
}

/// Decode the additional data section into `measurements`
///
/// `start` is the byte offset just past the mandatory section and `declared`
/// the length announced by the record's control field.
pub fn parse_additional(
    line: &[u8],
    start: usize,
    declared: usize,
    policy: QualityPolicy,
    measurements: &mut Measurements,
) -> Result<(), LineError> {
    let end = start + declared;
    if end > line.len() {
        return Err(LineError::new(
            line.len(),
            format!(
                "declared additional length {} overruns line of {} bytes",
                declared,
                line.len()
            ),
        ));
    }

    let mut pos = start;
    if line[pos..end].starts_with(SECTION_MARKER.as_bytes()) {
        pos += SECTION_MARKER.len();
    }

    while pos < end {
        if line[pos..end].iter().all(u8::is_ascii_whitespace) {
            break;
        }
        if end - pos < 3 {
            return Err(LineError::new(pos, "truncated group tag"));
        }

        let tag = text(line, pos..pos + 3, "group tag")?;
        if TERMINAL_MARKERS.contains(&tag) {
            break;
        }

        let spec = lookup(tag).ok_or_else(|| {
            LineError::new(pos, format!("unknown additional data group '{}'", tag))
        })?;

        let data_start = pos + 3;
        let data_end = data_start + spec.width;
        if data_end > end {
            return Err(LineError::new(
                data_start,
                format!(
                    "group {} needs {} characters, {} remain",
                    tag,
                    spec.width,
                    end - data_start
                ),
            ));
        }

        apply_group(spec.kind, line, data_start, policy, measurements)?;
        pos = data_end;
    }

    Ok(())
}

fn apply_group(
    kind: GroupKind,
    line: &[u8],
    at: usize,
    policy: QualityPolicy,
    measurements: &mut Measurements,
) -> Result<(), LineError> {
    match kind {
        GroupKind::Precipitation => {
            let period = optional_integer(
                line,
                at..at + 2,
                sentinels::PRECIPITATION_PERIOD,
                "precipitation_period",
            )?;
            let depth = optional_integer(
                line,
                at + 2..at + 6,
                sentinels::PRECIPITATION_DEPTH,
                "precipitation_depth",
            )?;
            let quality = code(line, at + 7, "precipitation_qc")?;
            let depth = screen(scaled(depth, scale::PRECIPITATION), quality, policy);

            // Depth and period travel together
            if measurements.precipitation.is_none() && depth.is_some() {
                measurements.precipitation = depth;
                measurements.precipitation_period = period.map(|p| p as i32);
            }
        }
        GroupKind::PresentWeather => {
            let weather = integer(line, at..at + 2, "present_weather")?;
            let quality = code(line, at + 2, "present_weather_qc")?;
            let weather = screen(u8::try_from(weather).ok(), quality, policy);
            supply(&mut measurements.present_weather, weather);
        }
        GroupKind::WindGust => {
            let gust = optional_integer(line, at..at + 4, sentinels::GUST_SPEED, "wind_gust")?;
            let quality = code(line, at + 4, "wind_gust_qc")?;
            supply(
                &mut measurements.wind_gust,
                screen(scaled(gust, scale::WIND_SPEED), quality, policy),
            );
        }
        GroupKind::Pressure => {
            let altimeter =
                optional_integer(line, at..at + 5, sentinels::PRESSURE, "altimeter_setting")?;
            let altimeter_qc = code(line, at + 5, "altimeter_setting_qc")?;
            let station =
                optional_integer(line, at + 6..at + 11, sentinels::PRESSURE, "station_pressure")?;
            let station_qc = code(line, at + 11, "station_pressure_qc")?;

            supply(
                &mut measurements.altimeter_setting,
                screen(scaled(altimeter, scale::PRESSURE), altimeter_qc, policy),
            );
            supply(
                &mut measurements.station_pressure,
                screen(scaled(station, scale::PRESSURE), station_qc, policy),
            );
        }
        GroupKind::Skipped => {}
    }
    Ok(())
}
