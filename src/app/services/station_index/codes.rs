//! Canonical country and US state code tables
//!
//! The station catalog labels countries with FIPS 10-4 codes. Searches are
//! expressed in ISO 3166-1 alpha-2 codes, so the catalog loader translates
//! through [`FIPS_COUNTRIES`] and query validation goes through
//! [`canonical_country_code`] and [`canonical_state_code`].

use crate::{Error, Result};

/// FIPS code, ISO 3166-1 alpha-2 code, and catalog country name
pub const FIPS_COUNTRIES: &[(&str, &str, &str)] = &[
    ("AA", "AW", "Aruba"),
    ("AC", "AG", "Antigua and Barbuda"),
    ("AF", "AF", "Afghanistan"),
    ("AG", "DZ", "Algeria"),
    ("AI", "AC", "Ascension Island"),
    ("AJ", "AZ", "Azerbaijan"),
    ("AL", "AL", "Albania"),
    ("AM", "AM", "Armenia"),
    ("AN", "AD", "Andorra"),
    ("AO", "AO", "Angola"),
    ("AQ", "AS", "American Samoa"),
    ("AR", "AR", "Argentina"),
    ("AS", "AU", "Australia"),
    ("AT", "AU", "Ashmore and Cartier Islands"),
    ("AU", "AT", "Austria"),
    ("AV", "AI", "Anguilla"),
    ("AY", "AQ", "Antarctica"),
    ("AZ", "PT", "Azores"),
    ("BA", "BH", "Bahrain"),
    ("BB", "BB", "Barbados"),
    ("BC", "BW", "Botswana"),
    ("BD", "BM", "Bermuda"),
    ("BE", "BE", "Belgium"),
    ("BF", "BS", "Bahamas"),
    ("BG", "BD", "Bangladesh"),
    ("BH", "BZ", "Belize"),
    ("BK", "BA", "Bosnia and Herzegovina"),
    ("BL", "BO", "Bolivia"),
    ("BM", "MM", "Burma"),
    ("BN", "BJ", "Benin"),
    ("BO", "BY", "Belarus"),
    ("BP", "SB", "Solomon Islands"),
    ("BR", "BR", "Brazil"),
    ("BT", "BT", "Bhutan"),
    ("BU", "BG", "Bulgaria"),
    ("BV", "BV", "Bouvet Island"),
    ("BX", "BN", "Brunei"),
    ("BY", "BI", "Burundi"),
    ("CA", "CA", "Canada"),
    ("CB", "KH", "Cambodia"),
    ("CD", "TD", "Chad"),
    ("CE", "LK", "Sri Lanka"),
    ("CF", "CG", "Congo"),
    ("CG", "CD", "Zaire"),
    ("CH", "CN", "China"),
    ("CI", "CL", "Chile"),
    ("CJ", "KY", "Cayman Islands"),
    ("CK", "CC", "Cocos (Keeling) Islands"),
    ("CM", "CM", "Cameroon"),
    ("CN", "KM", "Comoros"),
    ("CO", "CO", "Colombia"),
    ("CQ", "MP", "Northern Mariana Islands"),
    ("CR", "AU", "Coral Sea Islands"),
    ("CS", "CR", "Costa Rica"),
    ("CT", "CF", "Central African Republic"),
    ("CU", "CU", "Cuba"),
    ("CV", "CV", "Cape Verde"),
    ("CW", "CK", "Cook Islands"),
    ("CY", "CY", "Cyprus"),
    ("DA", "DK", "Denmark"),
    ("DJ", "DJ", "Djibouti"),
    ("DO", "DM", "Dominica"),
    ("DR", "DO", "Dominican Republic"),
    ("EC", "EC", "Ecuador"),
    ("EG", "EG", "Egypt"),
    ("EI", "IE", "Ireland"),
    ("EK", "GQ", "Equatorial Guinea"),
    ("EN", "EE", "Estonia"),
    ("ER", "ER", "Eritrea"),
    ("ES", "SV", "El Salvador"),
    ("ET", "ET", "Ethiopia"),
    ("EZ", "CZ", "Czech Republic"),
    ("FG", "GF", "French Guiana"),
    ("FI", "FI", "Finland"),
    ("FJ", "FJ", "Fiji"),
    ("FK", "FK", "Falkland Islands"),
    ("FM", "FM", "Micronesia"),
    ("FO", "FO", "Faroe Islands"),
    ("FP", "PF", "French Polynesia"),
    ("FR", "FR", "France"),
    ("GA", "GM", "Gambia"),
    ("GB", "GA", "Gabon"),
    ("GG", "GE", "Georgia"),
    ("GH", "GH", "Ghana"),
    ("GI", "GI", "Gibraltar"),
    ("GJ", "GD", "Grenada"),
    ("GK", "GG", "Guernsey"),
    ("GL", "GL", "Greenland"),
    ("GM", "DE", "Germany"),
    ("GP", "GP", "Guadeloupe"),
    ("GQ", "GU", "Guam"),
    ("GR", "GR", "Greece"),
    ("GT", "GT", "Guatemala"),
    ("GV", "GN", "Guinea"),
    ("GY", "GY", "Guyana"),
    ("GZ", "PS", "Gaza Strip"),
    ("HA", "HT", "Haiti"),
    ("HK", "HK", "Hong Kong"),
    ("HO", "HN", "Honduras"),
    ("HR", "HR", "Croatia"),
    ("HU", "HU", "Hungary"),
    ("IC", "IS", "Iceland"),
    ("ID", "ID", "Indonesia"),
    ("IM", "IM", "Isle of Man"),
    ("IN", "IN", "India"),
    ("IO", "IO", "British Indian Ocean Territory"),
    ("IR", "IR", "Iran"),
    ("IS", "IL", "Israel"),
    ("IT", "IT", "Italy"),
    ("IV", "CI", "Cote d'Ivoire"),
    ("IZ", "IQ", "Iraq"),
    ("JA", "JP", "Japan"),
    ("JE", "JE", "Jersey"),
    ("JM", "JM", "Jamaica"),
    ("JN", "SJ", "Jan Mayen"),
    ("JO", "JO", "Jordan"),
    ("KE", "KE", "Kenya"),
    ("KG", "KG", "Kyrgyzstan"),
    ("KN", "KP", "North Korea"),
    ("KR", "KI", "Kiribati"),
    ("KS", "KR", "South Korea"),
    ("KT", "CX", "Christmas Island"),
    ("KU", "KW", "Kuwait"),
    ("KV", "XK", "Kosovo"),
    ("KZ", "KZ", "Kazakhstan"),
    ("LA", "LA", "Laos"),
    ("LE", "LB", "Lebanon"),
    ("LG", "LV", "Latvia"),
    ("LH", "LT", "Lithuania"),
    ("LI", "LR", "Liberia"),
    ("LO", "SK", "Slovakia"),
    ("LS", "LI", "Liechtenstein"),
    ("LT", "LS", "Lesotho"),
    ("LU", "LU", "Luxembourg"),
    ("LY", "LY", "Libya"),
    ("MA", "MG", "Madagascar"),
    ("MB", "MQ", "Martinique"),
    ("MC", "MO", "Macau"),
    ("MD", "MD", "Moldova"),
    ("MF", "YT", "Mayotte"),
    ("MG", "MN", "Mongolia"),
    ("MH", "MS", "Montserrat"),
    ("MI", "MW", "Malawi"),
    ("MJ", "ME", "Montenegro"),
    ("MK", "MK", "North Macedonia"),
    ("ML", "ML", "Mali"),
    ("MM", "MM", "Burma (Myanmar)"),
    ("MN", "MC", "Monaco"),
    ("MO", "MA", "Morocco"),
    ("MP", "MU", "Mauritius"),
    ("MR", "MR", "Mauritania"),
    ("MT", "MT", "Malta"),
    ("MU", "OM", "Oman"),
    ("MV", "MV", "Maldives"),
    ("MX", "MX", "Mexico"),
    ("MY", "MY", "Malaysia"),
    ("MZ", "MZ", "Mozambique"),
    ("NC", "NC", "New Caledonia"),
    ("NE", "NU", "Niue"),
    ("NF", "NF", "Norfolk Island"),
    ("NG", "NE", "Niger"),
    ("NH", "VU", "Vanuatu"),
    ("NI", "NG", "Nigeria"),
    ("NL", "NL", "Netherlands"),
    ("NO", "NO", "Norway"),
    ("NP", "NP", "Nepal"),
    ("NR", "NR", "Nauru"),
    ("NS", "SR", "Suriname"),
    ("NU", "NI", "Nicaragua"),
    ("NZ", "NZ", "New Zealand"),
    ("OD", "SS", "South Sudan"),
    ("PA", "PY", "Paraguay"),
    ("PC", "PN", "Pitcairn Islands"),
    ("PE", "PE", "Peru"),
    ("PG", "PG", "Spratly Islands"),
    ("PK", "PK", "Pakistan"),
    ("PL", "PL", "Poland"),
    ("PM", "PA", "Panama"),
    ("PO", "PT", "Portugal"),
    ("PP", "PG", "Papua New Guinea"),
    ("PS", "PW", "Palau"),
    ("PU", "GW", "Guinea-Bissau"),
    ("QA", "QA", "Qatar"),
    ("RE", "RE", "Reunion"),
    ("RI", "RS", "Serbia"),
    ("RM", "MH", "Marshall Islands"),
    ("RO", "RO", "Romania"),
    ("RP", "PH", "Philippines"),
    ("RQ", "PR", "Puerto Rico"),
    ("RS", "RU", "Russia"),
    ("RW", "RW", "Rwanda"),
    ("SA", "SA", "Saudi Arabia"),
    ("SB", "PM", "St. Pierre and Miquelon"),
    ("SC", "KN", "St. Kitts and Nevis"),
    ("SE", "SC", "Seychelles"),
    ("SF", "ZA", "South Africa"),
    ("SG", "SN", "Senegal"),
    ("SH", "SH", "St. Helena"),
    ("SI", "SI", "Slovenia"),
    ("SL", "SL", "Sierra Leone"),
    ("SM", "SM", "San Marino"),
    ("SN", "SG", "Singapore"),
    ("SO", "SO", "Somalia"),
    ("SP", "ES", "Spain"),
    ("SR", "RS", "Serbia"),
    ("ST", "LC", "St. Lucia"),
    ("SU", "SD", "Sudan"),
    ("SV", "SJ", "Svalbard"),
    ("SW", "SE", "Sweden"),
    ("SX", "GS", "South Georgia"),
    ("SY", "SY", "Syria"),
    ("SZ", "CH", "Switzerland"),
    ("TC", "AE", "United Arab Emirates"),
    ("TD", "TT", "Trinidad and Tobago"),
    ("TH", "TH", "Thailand"),
    ("TI", "TJ", "Tajikistan"),
    ("TK", "TC", "Turks and Caicos Islands"),
    ("TL", "TK", "Tokelau"),
    ("TN", "TO", "Tonga"),
    ("TO", "TG", "Togo"),
    ("TP", "ST", "Sao Tome and Principe"),
    ("TS", "TN", "Tunisia"),
    ("TU", "TR", "Turkey"),
    ("TV", "TV", "Tuvalu"),
    ("TW", "TW", "Taiwan"),
    ("TX", "TM", "Turkmenistan"),
    ("TZ", "TZ", "Tanzania"),
    ("UG", "UG", "Uganda"),
    ("UK", "GB", "United Kingdom"),
    ("UP", "UA", "Ukraine"),
    ("US", "US", "United States"),
    ("UV", "BF", "Burkina Faso"),
    ("UY", "UY", "Uruguay"),
    ("UZ", "UZ", "Uzbekistan"),
    ("VC", "VC", "St. Vincent and the Grenadines"),
    ("VE", "VE", "Venezuela"),
    ("VI", "VG", "Virgin Islands (British)"),
    ("VM", "VN", "Vietnam"),
    ("VQ", "VI", "Virgin Islands (U.S.)"),
    ("VT", "VA", "Vatican City"),
    ("WA", "NA", "Namibia"),
    ("WE", "PS", "West Bank"),
    ("WF", "WF", "Wallis and Futuna"),
    ("WI", "EH", "Western Sahara"),
    ("WQ", "UM", "Wake Island"),
    ("WS", "WS", "Western Samoa"),
    ("WZ", "SZ", "Eswatini"),
    ("YM", "YE", "Yemen"),
    ("ZA", "ZM", "Zambia"),
    ("ZI", "ZW", "Zimbabwe"),
    ("ZM", "WS", "Samoa"),
];

/// ISO 3166-1 alpha-2 codes with display names
pub const ISO_COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AW", "Aruba"),
    ("AF", "Afghanistan"),
    ("AO", "Angola"),
    ("AL", "Albania"),
    ("AD", "Andorra"),
    ("AE", "United Arab Emirates"),
    ("AR", "Argentina"),
    ("AM", "Armenia"),
    ("AS", "American Samoa"),
    ("AG", "Antigua & Barbuda"),
    ("AU", "Australia"),
    ("AT", "Austria"),
    ("AZ", "Azerbaijan"),
    ("BI", "Burundi"),
    ("BE", "Belgium"),
    ("BJ", "Benin"),
    ("BF", "Burkina Faso"),
    ("BD", "Bangladesh"),
    ("BG", "Bulgaria"),
    ("BH", "Bahrain"),
    ("BS", "Bahamas"),
    ("BA", "Bosnia & Herzegovina"),
    ("BY", "Belarus"),
    ("BZ", "Belize"),
    ("BM", "Bermuda"),
    ("BO", "Bolivia"),
    ("BR", "Brazil"),
    ("BB", "Barbados"),
    ("BN", "Brunei"),
    ("BT", "Bhutan"),
    ("BW", "Botswana"),
    ("CF", "Central African Republic"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CL", "Chile"),
    ("CN", "China"),
    ("CI", "Côte d'Ivoire"),
    ("CM", "Cameroon"),
    ("CD", "Congo (DRC)"),
    ("CG", "Congo (Republic)"),
    ("CO", "Colombia"),
    ("KM", "Comoros"),
    ("CV", "Cape Verde"),
    ("CR", "Costa Rica"),
    ("CU", "Cuba"),
    ("CW", "Curaçao"),
    ("KY", "Cayman Islands"),
    ("CY", "Cyprus"),
    ("CZ", "Czech Republic"),
    ("DE", "Germany"),
    ("DJ", "Djibouti"),
    ("DM", "Dominica"),
    ("DK", "Denmark"),
    ("DO", "Dominican Republic"),
    ("DZ", "Algeria"),
    ("EC", "Ecuador"),
    ("EG", "Egypt"),
    ("ER", "Eritrea"),
    ("ES", "Spain"),
    ("EE", "Estonia"),
    ("ET", "Ethiopia"),
    ("FI", "Finland"),
    ("FJ", "Fiji"),
    ("FR", "France"),
    ("FO", "Faroe Islands"),
    ("FM", "Micronesia"),
    ("GA", "Gabon"),
    ("GB", "United Kingdom"),
    ("GE", "Georgia"),
    ("GH", "Ghana"),
    ("GI", "Gibraltar"),
    ("GN", "Guinea"),
    ("GM", "Gambia"),
    ("GW", "Guinea-Bissau"),
    ("GQ", "Equatorial Guinea"),
    ("GR", "Greece"),
    ("GD", "Grenada"),
    ("GL", "Greenland"),
    ("GT", "Guatemala"),
    ("GU", "Guam"),
    ("GY", "Guyana"),
    ("HK", "Hong Kong"),
    ("HN", "Honduras"),
    ("HR", "Croatia"),
    ("HT", "Haiti"),
    ("HU", "Hungary"),
    ("ID", "Indonesia"),
    ("IM", "Isle of Man"),
    ("IN", "India"),
    ("IE", "Ireland"),
    ("IR", "Iran"),
    ("IQ", "Iraq"),
    ("IS", "Iceland"),
    ("IL", "Israel"),
    ("IT", "Italy"),
    ("JM", "Jamaica"),
    ("JO", "Jordan"),
    ("JP", "Japan"),
    ("KZ", "Kazakhstan"),
    ("KE", "Kenya"),
    ("KG", "Kyrgyzstan"),
    ("KH", "Cambodia"),
    ("KI", "Kiribati"),
    ("KN", "St. Kitts & Nevis"),
    ("KR", "South Korea"),
    ("KW", "Kuwait"),
    ("LA", "Laos"),
    ("LB", "Lebanon"),
    ("LR", "Liberia"),
    ("LY", "Libya"),
    ("LC", "St. Lucia"),
    ("LI", "Liechtenstein"),
    ("LK", "Sri Lanka"),
    ("LS", "Lesotho"),
    ("LT", "Lithuania"),
    ("LU", "Luxembourg"),
    ("LV", "Latvia"),
    ("MO", "Macao"),
    ("MF", "St. Martin"),
    ("MA", "Morocco"),
    ("MC", "Monaco"),
    ("MD", "Moldova"),
    ("MG", "Madagascar"),
    ("MV", "Maldives"),
    ("MX", "Mexico"),
    ("MH", "Marshall Islands"),
    ("MK", "North Macedonia"),
    ("ML", "Mali"),
    ("MT", "Malta"),
    ("MM", "Myanmar"),
    ("ME", "Montenegro"),
    ("MN", "Mongolia"),
    ("MP", "Northern Mariana Islands"),
    ("MZ", "Mozambique"),
    ("MR", "Mauritania"),
    ("MU", "Mauritius"),
    ("MW", "Malawi"),
    ("MY", "Malaysia"),
    ("NA", "Namibia"),
    ("NC", "New Caledonia"),
    ("NE", "Niger"),
    ("NG", "Nigeria"),
    ("NI", "Nicaragua"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("NP", "Nepal"),
    ("NR", "Nauru"),
    ("NZ", "New Zealand"),
    ("OM", "Oman"),
    ("PK", "Pakistan"),
    ("PA", "Panama"),
    ("PE", "Peru"),
    ("PH", "Philippines"),
    ("PW", "Palau"),
    ("PG", "Papua New Guinea"),
    ("PL", "Poland"),
    ("PR", "Puerto Rico"),
    ("KP", "North Korea"),
    ("PT", "Portugal"),
    ("PY", "Paraguay"),
    ("PS", "Palestine"),
    ("PF", "French Polynesia"),
    ("QA", "Qatar"),
    ("RO", "Romania"),
    ("RU", "Russia"),
    ("RW", "Rwanda"),
    ("SA", "Saudi Arabia"),
    ("SD", "Sudan"),
    ("SN", "Senegal"),
    ("SG", "Singapore"),
    ("SB", "Solomon Islands"),
    ("SL", "Sierra Leone"),
    ("SV", "El Salvador"),
    ("SM", "San Marino"),
    ("SO", "Somalia"),
    ("RS", "Serbia"),
    ("SS", "South Sudan"),
    ("ST", "São Tomé & Príncipe"),
    ("SR", "Suriname"),
    ("SK", "Slovakia"),
    ("SI", "Slovenia"),
    ("SE", "Sweden"),
    ("SZ", "Eswatini"),
    ("SX", "Sint Maarten"),
    ("SC", "Seychelles"),
    ("SY", "Syria"),
    ("TC", "Turks & Caicos Islands"),
    ("TD", "Chad"),
    ("TG", "Togo"),
    ("TH", "Thailand"),
    ("TJ", "Tajikistan"),
    ("TM", "Turkmenistan"),
    ("TL", "East Timor"),
    ("TO", "Tonga"),
    ("TT", "Trinidad & Tobago"),
    ("TN", "Tunisia"),
    ("TR", "Turkey"),
    ("TV", "Tuvalu"),
    ("TZ", "Tanzania"),
    ("UG", "Uganda"),
    ("UA", "Ukraine"),
    ("UY", "Uruguay"),
    ("US", "United States"),
    ("UZ", "Uzbekistan"),
    ("VC", "St. Vincent & Grenadines"),
    ("VE", "Venezuela"),
    ("VG", "British Virgin Islands"),
    ("VI", "U.S. Virgin Islands"),
    ("VN", "Vietnam"),
    ("VU", "Vanuatu"),
    ("WS", "Samoa"),
    ("YE", "Yemen"),
    ("ZA", "South Africa"),
    ("ZM", "Zambia"),
    ("ZW", "Zimbabwe"),
    ("AC", "Ascension Island"),
    ("AI", "Anguilla"),
    ("AQ", "Antarctica"),
    ("BV", "Bouvet Island"),
    ("CC", "Cocos (Keeling) Islands"),
    ("CK", "Cook Islands"),
    ("GF", "French Guiana"),
    ("FK", "Falkland Islands"),
    ("GG", "Guernsey"),
    ("GP", "Guadeloupe"),
    ("IO", "British Indian Ocean Territory"),
    ("JE", "Jersey"),
    ("SJ", "Jan Mayen"),
    ("CX", "Christmas Island"),
    ("XK", "Kosovo"),
    ("MQ", "Martinique"),
    ("YT", "Mayotte"),
    ("MS", "Montserrat"),
    ("NU", "Niue"),
    ("NF", "Norfolk Island"),
    ("PN", "Pitcairn Islands"),
    ("RE", "Reunion"),
    ("PM", "St. Pierre and Miquelon"),
    ("SH", "St. Helena"),
    ("GS", "South Georgia"),
    ("TK", "Tokelau"),
    ("TW", "Taiwan"),
    ("VA", "Vatican City"),
    ("WF", "Wallis and Futuna"),
    ("EH", "Western Sahara"),
    ("UM", "Wake Island"),
];

/// US states, the District of Columbia and inhabited territories
pub const US_STATE_NAMES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("DC", "District of Columbia"),
    ("AS", "American Samoa"),
    ("GU", "Guam"),
    ("MP", "Northern Mariana Islands"),
    ("PR", "Puerto Rico"),
    ("VI", "U.S. Virgin Islands"),
];

/// Translate a catalog FIPS country code into its ISO 3166-1 alpha-2 code
pub fn fips_to_iso(fips: &str) -> Option<&'static str> {
    FIPS_COUNTRIES
        .iter()
        .find(|(code, _, _)| *code == fips)
        .map(|(_, iso, _)| *iso)
}

/// Catalog country name for a FIPS country code
pub fn fips_country_name(fips: &str) -> Option<&'static str> {
    FIPS_COUNTRIES
        .iter()
        .find(|(code, _, _)| *code == fips)
        .map(|(_, _, name)| *name)
}

/// Validate a country code at the query boundary, returning its canonical form
pub fn canonical_country_code(code: &str) -> Result<&'static str> {
    let upper = code.trim().to_ascii_uppercase();
    ISO_COUNTRY_NAMES
        .iter()
        .find(|(iso, _)| *iso == upper)
        .map(|(iso, _)| *iso)
        .ok_or_else(|| {
            Error::invalid_parameter(format!(
                "'{}' is not a recognized ISO 3166-1 alpha-2 country code",
                code
            ))
        })
}

/// Validate a US state or territory code, returning its canonical form
pub fn canonical_state_code(code: &str) -> Result<&'static str> {
    let upper = code.trim().to_ascii_uppercase();
    US_STATE_NAMES
        .iter()
        .find(|(state, _)| *state == upper)
        .map(|(state, _)| *state)
        .ok_or_else(|| {
            Error::invalid_parameter(format!(
                "'{}' is not a recognized US state or territory code",
                code
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fips_translation() {
        assert_eq!(fips_to_iso("GM"), Some("DE"));
        assert_eq!(fips_to_iso("US"), Some("US"));
        assert_eq!(fips_to_iso("UK"), Some("GB"));
        assert_eq!(fips_country_name("AS"), Some("Australia"));
        assert_eq!(fips_to_iso("??"), None);
    }

    #[test]
    fn test_canonical_codes_are_case_insensitive() {
        assert_eq!(canonical_country_code("de").unwrap(), "DE");
        assert_eq!(canonical_state_code(" ny ").unwrap(), "NY");
        assert_eq!(canonical_state_code("pr").unwrap(), "PR");
    }

    #[test]
    fn test_unrecognized_codes_are_invalid_parameters() {
        assert!(matches!(
            canonical_country_code("QQ"),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            canonical_state_code("ZZ"),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_every_catalog_country_is_searchable() {
        for (_, iso, _) in FIPS_COUNTRIES {
            assert!(canonical_country_code(iso).is_ok(), "missing ISO entry {iso}");
        }
    }
}
