//! Tests for station catalog loading

use super::{SAMPLE_CATALOG, create_test_index};
use crate::app::services::station_index::{CoordinateZones, StationIndex};
use chrono::NaiveDate;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_stats() {
    let (index, stats) = StationIndex::from_catalog_reader(SAMPLE_CATALOG.as_bytes()).unwrap();

    assert_eq!(stats.total_records_found, 9);
    assert_eq!(stats.stations_loaded, 6);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.records_rejected, 2);
    assert!(stats.has_errors());
    assert_eq!(index.len(), 6);
    assert!(stats.summary().contains("loaded 6 stations"));
}

#[test]
fn test_catalog_fields_are_normalized() {
    let index = create_test_index();

    let lga = index.lookup("725030-14732").unwrap();
    assert_eq!(lga.name.as_deref(), Some("LA GUARDIA AIRPORT"));
    assert_eq!(lga.country_code.as_deref(), Some("US"));
    assert_eq!(lga.country.as_deref(), Some("United States"));
    assert_eq!(lga.state.as_deref(), Some("NY"));
    assert_eq!(lga.icao.as_deref(), Some("KLGA"));
    assert_eq!(lga.latitude, Some(40.779));
    assert_eq!(lga.longitude, Some(-73.88));
    assert_eq!(lga.elevation, Some(3.4));
    assert_eq!(lga.begin_date, NaiveDate::from_ymd_opt(1973, 1, 1));
    assert_eq!(lga.end_date, NaiveDate::from_ymd_opt(2025, 12, 31));
    assert_eq!(lga.timezone, None);

    // FIPS codes become ISO codes
    assert_eq!(
        index.lookup("037720-99999").unwrap().country_code.as_deref(),
        Some("GB")
    );
    let sydney = index.lookup("949190-99999").unwrap();
    assert_eq!(sydney.country_code.as_deref(), Some("AU"));
    assert_eq!(sydney.country.as_deref(), Some("Australia"));
}

#[test]
fn test_empty_and_placeholder_values_become_null() {
    let index = create_test_index();
    let platform = index.lookup("994971-99999").unwrap();

    assert_eq!(platform.elevation, None);
    assert_eq!(platform.country_code, None);
    assert_eq!(platform.country, None);
    assert_eq!(platform.state, None);
    assert_eq!(platform.icao, None);
}

#[test]
fn test_duplicate_keeps_first_row() {
    let index = create_test_index();
    assert_eq!(
        index.lookup("725030-14732").unwrap().name.as_deref(),
        Some("LA GUARDIA AIRPORT")
    );
}

#[test]
fn test_timezone_column_is_used_when_present() {
    let catalog = "\
USAF,WBAN,STATION NAME,CTRY,STATE,ICAO,LAT,LON,ELEV(M),BEGIN,END,TZ
725030,14732,LA GUARDIA AIRPORT,US,NY,KLGA,+40.779,-073.880,+0003.4,19730101,20251231,America/New_York
722950,23174,LOS ANGELES,US,CA,KLAX,+33.938,-118.389,+0029.6,19440101,20251231,Mars/Olympus
";
    let (index, stats) = StationIndex::from_catalog_reader(catalog.as_bytes()).unwrap();

    assert_eq!(stats.stations_loaded, 2);
    assert_eq!(
        index.lookup("725030-14732").unwrap().timezone.as_deref(),
        Some("America/New_York")
    );
    assert_eq!(index.lookup("722950-23174").unwrap().timezone, None);
}

#[test]
fn test_zone_lookup_fills_missing_zones() {
    let lookup = |lat: f64, _lon: f64| {
        if lat > 0.0 {
            Some("Etc/GMT".to_string())
        } else {
            Some("Not/A_Zone".to_string())
        }
    };
    let (index, stats) =
        StationIndex::from_catalog_reader_with_zones(SAMPLE_CATALOG.as_bytes(), &lookup).unwrap();

    // The platform at 0,0 and Sydney get a name that is not a zone
    assert_eq!(stats.timezones_assigned, 4);
    assert_eq!(
        index.lookup("725030-14732").unwrap().timezone.as_deref(),
        Some("Etc/GMT")
    );
    assert_eq!(index.lookup("949190-99999").unwrap().timezone, None);
    assert_eq!(index.lookup("994971-99999").unwrap().timezone, None);
}

#[test]
fn test_published_catalog_gets_zones_from_coordinates() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE_CATALOG.as_bytes()).unwrap();

    let (index, stats) =
        StationIndex::load_catalog_with_zones(file.path(), &CoordinateZones::new()).unwrap();

    assert!(stats.timezones_assigned >= 5);
    let laguardia = index.lookup("725030-14732").unwrap();
    assert_eq!(laguardia.timezone.as_deref(), Some("America/New_York"));
    assert_eq!(laguardia.tz(), Some(chrono_tz::America::New_York));
    assert_eq!(
        index.lookup("722950-23174").unwrap().timezone.as_deref(),
        Some("America/Los_Angeles")
    );
    assert_eq!(
        index.lookup("107380-99999").unwrap().timezone.as_deref(),
        Some("Europe/Berlin")
    );
}

#[test]
fn test_load_catalog_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE_CATALOG.as_bytes()).unwrap();

    let (index, _) = StationIndex::load_catalog(file.path()).unwrap();
    assert_eq!(index.len(), 6);
}

#[test]
fn test_missing_required_column_is_rejected() {
    let catalog = "STATION NAME,CTRY\nFOO,US\n";
    assert!(matches!(
        StationIndex::from_catalog_reader(catalog.as_bytes()),
        Err(crate::Error::Catalog { .. })
    ));
}
