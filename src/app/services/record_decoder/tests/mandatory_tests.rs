//! Tests for mandatory section decoding

use super::LineBuilder;
use crate::app::services::record_decoder::{DecodeOptions, decode_line};
use crate::config::QualityPolicy;
use crate::constants::{CEILING_UNLIMITED_M, VISIBILITY_CAP_M, layout};
use chrono::{TimeZone, Utc};

fn decode(line: &str) -> crate::app::models::ObservationRecord {
    decode_line(line, &DecodeOptions::default()).unwrap()
}

fn decode_with(line: &str, policy: QualityPolicy) -> crate::app::models::ObservationRecord {
    let options = DecodeOptions {
        quality_policy: policy,
        ..DecodeOptions::default()
    };
    decode_line(line, &options).unwrap()
}

#[test]
fn test_decode_base_line() {
    let record = decode(&LineBuilder::new().build());

    assert_eq!(record.station_id, "725030-14732");
    assert_eq!(record.time, Utc.with_ymd_and_hms(2020, 1, 1, 0, 51, 0).unwrap());

    let m = &record.measurements;
    assert_eq!(m.wind_direction, Some(350));
    assert_eq!(m.wind_speed, Some(4.6));
    assert_eq!(m.ceiling_height, Some(22000));
    assert_eq!(m.visibility, Some(16093));
    assert_eq!(m.temperature, Some(6.1));
    assert_eq!(m.dew_point, Some(-5.6));
    assert_eq!(m.sea_level_pressure, Some(1023.2));
    assert_eq!(m.relative_humidity, Some(42.9));
    assert_eq!(m.precipitation, None);
}

#[test]
fn test_sentinels_decode_to_null() {
    let line = LineBuilder::new()
        .field(layout::WIND_DIRECTION, "999")
        .field(layout::WIND_SPEED, "9999")
        .field(layout::CEILING, "99999")
        .field(layout::VISIBILITY, "999999")
        .field(layout::TEMPERATURE, "+9999")
        .field(layout::DEW_POINT, "+9999")
        .field(layout::SEA_LEVEL_PRESSURE, "99999")
        .build();

    let record = decode(&line);
    assert!(record.measurements.is_empty());
}

#[test]
fn test_unlimited_ceiling_is_a_value() {
    let record = decode(&LineBuilder::new().field(layout::CEILING, "22000").build());
    assert_eq!(record.measurements.ceiling_height, Some(CEILING_UNLIMITED_M));
}

#[test]
fn test_visibility_is_capped() {
    let record = decode(&LineBuilder::new().field(layout::VISIBILITY, "020000").build());
    assert_eq!(record.measurements.visibility, Some(VISIBILITY_CAP_M));

    let record = decode(&LineBuilder::new().field(layout::VISIBILITY, "001600").build());
    assert_eq!(record.measurements.visibility, Some(1600));
}

#[test]
fn test_scaled_fields_recover_raw_integers() {
    let cases = [
        ("+0000", "0000", "08000"),
        ("-0932", "0001", "09999"),
        ("+0617", "0999", "10899"),
        ("-0001", "0512", "10132"),
        ("+0459", "9000", "12345"),
    ];

    for (temperature, wind_speed, pressure) in cases {
        let line = LineBuilder::new()
            .field(layout::TEMPERATURE, temperature)
            .field(layout::WIND_SPEED, wind_speed)
            .field(layout::SEA_LEVEL_PRESSURE, pressure)
            .build();
        let m = decode(&line).measurements;

        let raw_t: i64 = temperature.parse().unwrap();
        let raw_ws: i64 = wind_speed.parse().unwrap();
        let raw_p: i64 = pressure.parse().unwrap();
        assert_eq!((m.temperature.unwrap() * 10.0).round() as i64, raw_t);
        assert_eq!((m.wind_speed.unwrap() * 10.0).round() as i64, raw_ws);
        assert_eq!((m.sea_level_pressure.unwrap() * 10.0).round() as i64, raw_p);
    }
}

#[test]
fn test_erroneous_quality_nulls_field_by_default() {
    let line = LineBuilder::new()
        .code(layout::TEMPERATURE_QC, '3')
        .code(layout::WIND_SPEED_QC, '7')
        .build();

    let m = decode(&line).measurements;
    assert_eq!(m.temperature, None);
    assert_eq!(m.wind_speed, None);
    assert_eq!(m.dew_point, Some(-5.6));
    // Humidity cannot be derived without temperature
    assert_eq!(m.relative_humidity, None);
}

#[test]
fn test_suspect_quality_depends_on_policy() {
    let line = LineBuilder::new().code(layout::DEW_POINT_QC, '2').build();

    assert_eq!(decode(&line).measurements.dew_point, Some(-5.6));
    assert_eq!(
        decode_with(&line, QualityPolicy::DropSuspect).measurements.dew_point,
        None
    );
}

#[test]
fn test_keep_all_policy_ignores_quality() {
    let line = LineBuilder::new().code(layout::SEA_LEVEL_PRESSURE_QC, '7').build();
    let m = decode_with(&line, QualityPolicy::KeepAll).measurements;
    assert_eq!(m.sea_level_pressure, Some(1023.2));
}

#[test]
fn test_non_numeric_field_reports_offset() {
    let line = LineBuilder::new().field(layout::TEMPERATURE, "+00A1").build();
    let err = decode_line(&line, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.offset, layout::TEMPERATURE.start);
    assert!(err.message.contains("temperature"));
}

#[test]
fn test_invalid_date_reports_offset() {
    let line = LineBuilder::new().field(layout::DATE, "20201301").build();
    let err = decode_line(&line, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.offset, layout::DATE.start);

    let line = LineBuilder::new().field(layout::TIME, "2460").build();
    let err = decode_line(&line, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.offset, layout::TIME.start);
}

#[test]
fn test_short_line_is_rejected() {
    let line = LineBuilder::new().build();
    let err = decode_line(&line[..80], &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.offset, 80);
}

#[test]
fn test_humidity_derivation_can_be_disabled() {
    let options = DecodeOptions {
        derive_humidity: false,
        ..DecodeOptions::default()
    };
    let record = decode_line(&LineBuilder::new().build(), &options).unwrap();
    assert_eq!(record.measurements.relative_humidity, None);
}
