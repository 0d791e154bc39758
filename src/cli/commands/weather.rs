//! Weather command implementation
//!
//! Retrieves one station's observations and writes them to stdout.

use super::shared::{CatalogContext, cell, create_spinner};
use crate::app::models::{InventoryRow, Measurements, StationMetadata, WeatherRow};
use crate::app::services::record_decoder::DecodeStats;
use crate::app::services::weather::{WeatherData, WeatherRequest, WeatherService};
use crate::cli::args::{OutputFormat, WeatherArgs};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

const MEASUREMENT_COLUMNS: &[&str] = &[
    "temperature",
    "dew_point",
    "relative_humidity",
    "wind_direction",
    "wind_speed",
    "sea_level_pressure",
    "ceiling_height",
    "visibility",
    "precipitation",
    "precipitation_period",
    "present_weather",
    "wind_gust",
    "altimeter_setting",
    "station_pressure",
];

const STATION_COLUMNS: &[&str] = &[
    "name",
    "country_code",
    "country",
    "state",
    "icao",
    "latitude",
    "longitude",
    "elevation",
];

/// Weather command runner
pub async fn run_weather(args: WeatherArgs, cancel: CancellationToken) -> Result<()> {
    let start_time = Instant::now();
    let config = args.config()?;
    let catalog = CatalogContext::new(config, &args.common, cancel.clone())?;
    let index = catalog.load_index().await?;

    let service = WeatherService::new(
        Arc::new(index),
        catalog.transport.clone(),
        catalog.config.clone(),
    )?
    .with_cancellation(cancel);

    let mut request = WeatherRequest::new(args.station.trim()).with_temp_unit(args.unit);
    if let Some(years) = &args.years {
        request = request.with_years(years.years.clone());
    }
    if args.station_info {
        request = request.with_station_info();
    }
    if args.hourly {
        request = request.hourly();
    }
    if args.local {
        request = request.local_time();
    }
    if let Some(zone) = args.timezone {
        request = request.with_timezone(zone);
    }

    let spinner = create_spinner(
        &format!("Retrieving {}", request.station_id),
        args.common.show_progress(),
    );
    let data = service.get_weather_data(&request).await;
    spinner.finish_and_clear();
    let data = data.with_context(|| format!("Failed to retrieve weather for {}", args.station))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.common.output_format {
        OutputFormat::Csv => write_csv(&mut out, &data)?,
        OutputFormat::Json => write_json(&mut out, &data)?,
        OutputFormat::Human => write_summary(&mut out, &request.station_id, &data)?,
    }
    out.flush()?;

    info!(
        "Wrote {} rows in {:.2}s",
        data.rows.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn measurement_cells(m: &Measurements) -> Vec<String> {
    vec![
        cell(m.temperature),
        cell(m.dew_point),
        cell(m.relative_humidity),
        cell(m.wind_direction),
        cell(m.wind_speed),
        cell(m.sea_level_pressure),
        cell(m.ceiling_height),
        cell(m.visibility),
        cell(m.precipitation),
        cell(m.precipitation_period),
        cell(m.present_weather),
        cell(m.wind_gust),
        cell(m.altimeter_setting),
        cell(m.station_pressure),
    ]
}

fn station_cells(s: &StationMetadata) -> Vec<String> {
    vec![
        cell(s.name.as_deref()),
        cell(s.country_code.as_deref()),
        cell(s.country.as_deref()),
        cell(s.state.as_deref()),
        cell(s.icao.as_deref()),
        cell(s.latitude),
        cell(s.longitude),
        cell(s.elevation),
    ]
}

/// One CSV row per observation; station columns follow when attached
pub fn write_csv<W: Write>(out: W, data: &WeatherData) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["station_id", "time"];
    header.extend_from_slice(MEASUREMENT_COLUMNS);
    if data.station.is_some() {
        header.extend_from_slice(STATION_COLUMNS);
    }
    writer.write_record(&header)?;

    let station = data.station.as_ref().map(station_cells);
    for row in &data.rows {
        let mut record = vec![row.station_id.clone(), row.time.to_rfc3339()];
        record.extend(measurement_cells(&row.measurements));
        if let Some(station) = &station {
            record.extend(station.iter().cloned());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonRow<'a> {
    station_id: &'a str,
    time: String,
    #[serde(flatten)]
    measurements: &'a Measurements,
}

#[derive(Serialize)]
struct JsonWeather<'a> {
    station: Option<&'a StationMetadata>,
    timezone: String,
    missing_years: &'a [i32],
    stats: &'a DecodeStats,
    observed: &'a [InventoryRow],
    rows: Vec<JsonRow<'a>>,
}

/// A single JSON document with the rows and their provenance
pub fn write_json<W: Write>(out: W, data: &WeatherData) -> Result<()> {
    let document = JsonWeather {
        station: data.station.as_ref(),
        timezone: data.timezone.name().to_string(),
        missing_years: &data.missing_years,
        stats: &data.stats,
        observed: data.observed.rows(),
        rows: data.rows.iter().map(json_row).collect(),
    };
    serde_json::to_writer_pretty(out, &document)?;
    Ok(())
}

fn json_row(row: &WeatherRow) -> JsonRow<'_> {
    JsonRow {
        station_id: &row.station_id,
        time: row.time.to_rfc3339(),
        measurements: &row.measurements,
    }
}

/// Human-readable retrieval summary
pub fn write_summary<W: Write>(mut out: W, station_id: &str, data: &WeatherData) -> Result<()> {
    writeln!(out, "{}", format!("Weather for {}", station_id).bright_green().bold())?;
    if let Some(station) = &data.station {
        writeln!(
            out,
            "  Station:   {} ({})",
            station.name.as_deref().unwrap_or("unnamed"),
            station.country.as_deref().unwrap_or("unknown country")
        )?;
    }
    writeln!(out, "  Timezone:  {}", data.timezone.name())?;
    writeln!(
        out,
        "  Rows:      {}",
        data.rows.len().to_string().bright_white().bold()
    )?;
    for source in &data.sources {
        writeln!(out, "  {}:      {}", source.year, source.source)?;
    }
    for (year, count) in data.observed.yearly_totals(station_id) {
        writeln!(out, "  Observed:  {} in {}", count, year)?;
    }
    if !data.missing_years.is_empty() {
        writeln!(
            out,
            "  Missing:   {}",
            format!("{:?}", data.missing_years).bright_yellow()
        )?;
    }
    writeln!(
        out,
        "  Decoded:   {}/{} lines ({:.1}%)",
        data.stats.observations_decoded,
        data.stats.total_lines,
        data.stats.success_rate()
    )?;
    if data.stats.lines_skipped > 0 {
        writeln!(
            out,
            "  Skipped:   {}",
            data.stats.lines_skipped.to_string().bright_red().bold()
        )?;
    }
    if let (Some(first), Some(last)) = (data.rows.first(), data.rows.last()) {
        writeln!(out, "  Span:      {} .. {}", first.time, last.time)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ObservationRecord;
    use crate::app::services::inventory::Inventory;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    fn sample_data(with_station: bool) -> WeatherData {
        let mut station = StationMetadata::new("725030", "14732");
        station.name = Some("LA GUARDIA AIRPORT".to_string());
        station.latitude = Some(40.779);

        WeatherData {
            rows: vec![WeatherRow {
                station_id: station.id.clone(),
                time: chrono_tz::America::New_York
                    .with_ymd_and_hms(2020, 6, 1, 8, 51, 0)
                    .unwrap(),
                measurements: Measurements {
                    temperature: Some(20.0),
                    wind_direction: Some(350),
                    ..Default::default()
                },
            }],
            station: with_station.then_some(station),
            timezone: chrono_tz::America::New_York,
            sources: Vec::new(),
            missing_years: vec![2019],
            stats: DecodeStats::default(),
            observed: Inventory::from_observations(&[ObservationRecord {
                station_id: "725030-14732".to_string(),
                time: Utc.with_ymd_and_hms(2020, 6, 1, 12, 51, 0).unwrap(),
                measurements: Measurements::default(),
            }]),
        }
    }

    #[test]
    fn test_csv_columns() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_data(false)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("station_id,time,temperature,dew_point"));
        assert!(!header.contains("latitude"));
        let expected = format!(
            "725030-14732,2020-06-01T08:51:00-04:00,20,,,350{}",
            ",".repeat(10)
        );
        assert_eq!(lines.next().unwrap(), expected);
    }

    #[test]
    fn test_csv_station_columns() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_data(true)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert!(lines.next().unwrap().ends_with("latitude,longitude,elevation"));
        assert!(lines.next().unwrap().ends_with("LA GUARDIA AIRPORT,,,,,40.779,,"));
    }

    #[test]
    fn test_json_document() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &sample_data(false)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["timezone"], "America/New_York");
        assert_eq!(value["missing_years"][0], 2019);
        assert_eq!(value["rows"][0]["temperature"], 20.0);
        assert_eq!(value["rows"][0]["time"], "2020-06-01T08:51:00-04:00");
        assert!(value["station"].is_null());
        assert_eq!(value["observed"][0]["month"], 6);
        assert_eq!(value["observed"][0]["count"], 1);
    }

    #[test]
    fn test_summary_mentions_missing_years() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        let mut data = sample_data(true);
        data.timezone = Tz::UTC;
        write_summary(&mut buffer, "725030-14732", &data).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("LA GUARDIA AIRPORT"));
        assert!(text.contains("[2019]"));
        assert!(text.contains("Rows:      1"));
        assert!(text.contains("Observed:  1 in 2020"));
    }
}
