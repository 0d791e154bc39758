//! Test utilities for the station index
//!
//! Provides a small catalog in the published `isd-history.csv` layout,
//! including rows the loader is expected to reject.

use super::StationIndex;

mod loader_tests;

/// Catalog with six valid stations, one duplicate and two invalid rows
pub const SAMPLE_CATALOG: &str = r#""USAF","WBAN","STATION NAME","CTRY","STATE","ICAO","LAT","LON","ELEV(M)","BEGIN","END"
"725030","14732","LA GUARDIA AIRPORT","US","NY","KLGA","+40.779","-073.880","+0003.4","19730101","20251231"
"037720","99999","LONDON HEATHROW","UK","","EGLL","+51.478","-000.461","+0025.3","19480101","20251231"
"107380","99999","STUTTGART/ECHTERDINGEN","GM","","EDDS","+48.683","+009.233","+0419.1","19730101","20251231"
"722950","23174","LOS ANGELES INTERNATIONAL AIRPORT","US","CA","KLAX","+33.938","-118.389","+0029.6","19440101","20251231"
"994971","99999","ALBATROSS PLATFORM","","","","+00.000","+000.000","-0999.0","20050101","20080101"
"725030","14732","DUPLICATE LAGUARDIA","US","NY","KLGA","+40.779","-073.880","+0003.4","19730101","20251231"
"123456","99999","BROKEN DATES","US","TX","","+30.000","-097.000","+0100.0","20201301","20211231"
"999999","00001","BAD LATITUDE","US","","","+95.000","-097.000","","",""
"949190","99999","SYDNEY","AS","","","-33.946","+151.177","+0006.0","19290101","20121231"
"#;

/// Helper to create a test station index from the sample catalog
pub fn create_test_index() -> StationIndex {
    let (index, _) = StationIndex::from_catalog_reader(SAMPLE_CATALOG.as_bytes()).unwrap();
    index
}

/// Station ids of a result, in order
pub fn ids<'a>(stations: impl IntoIterator<Item = &'a crate::StationMetadata>) -> Vec<&'a str> {
    stations.into_iter().map(|s| s.id.as_str()).collect()
}
