//! Stations and countries command implementations
//!
//! Searches the station catalog and lists the countries it covers.

use super::shared::{CatalogContext, cell};
use crate::app::models::StationMetadata;
use crate::app::services::weather::WeatherService;
use crate::cli::args::{CountriesArgs, OutputFormat, StationsArgs};
use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Stations command runner
pub async fn run_stations(args: StationsArgs, cancel: CancellationToken) -> Result<()> {
    let config = args.common.config()?;
    let catalog = CatalogContext::new(config, &args.common, cancel)?;
    let index = catalog.load_index().await?;
    let service = WeatherService::new(
        Arc::new(index),
        catalog.transport.clone(),
        catalog.config.clone(),
    )?;

    let query = args.query();
    let mut stations = service
        .search_stations(&query)
        .context("Invalid station search")?;
    info!(
        "{} of {} stations match",
        stations.len(),
        service.get_station_metadata().len()
    );
    if let Some(limit) = args.limit {
        stations.truncate(limit);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.common.output_format {
        OutputFormat::Csv => write_stations_csv(&mut out, &stations)?,
        OutputFormat::Json => serde_json::to_writer_pretty(&mut out, &stations)?,
        OutputFormat::Human => write_stations_human(&mut out, &stations)?,
    }
    out.flush()?;
    Ok(())
}

/// Countries command runner
pub async fn run_countries(args: CountriesArgs, cancel: CancellationToken) -> Result<()> {
    let config = args.common.config()?;
    let catalog = CatalogContext::new(config, &args.common, cancel)?;
    let index = catalog.load_index().await?;
    let service = WeatherService::new(
        Arc::new(index),
        catalog.transport.clone(),
        catalog.config.clone(),
    )?;
    let countries = service.get_countries();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.common.output_format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            writer.write_record(["country_code", "country"])?;
            for (code, name) in &countries {
                writer.write_record([code, name])?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => serde_json::to_writer_pretty(&mut out, &countries)?,
        OutputFormat::Human => {
            for (code, name) in &countries {
                writeln!(out, "{}  {}", code.bright_yellow().bold(), name)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Catalog columns, one station per row
pub fn write_stations_csv<W: Write>(out: W, stations: &[&StationMetadata]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for station in stations {
        writer.serialize(station)?;
    }
    writer.flush()?;
    Ok(())
}

/// Compact listing for terminals
pub fn write_stations_human<W: Write>(mut out: W, stations: &[&StationMetadata]) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        stations.len().to_string().bright_white().bold(),
        "stations".bright_green().bold()
    )?;
    for station in stations {
        let location = match (station.latitude, station.longitude) {
            (Some(lat), Some(lon)) => format!("{:.3}, {:.3}", lat, lon),
            _ => "no location".to_string(),
        };
        writeln!(
            out,
            "  {}  {:<30} {:<2} {:<2} {:<18} {} .. {}",
            station.id.bright_white().bold(),
            station.name.as_deref().unwrap_or("-"),
            station.country_code.as_deref().unwrap_or("-"),
            station.state.as_deref().unwrap_or("-"),
            location,
            cell(station.begin_date),
            cell(station.end_date)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::station_index::StationIndex;
    use crate::app::services::station_index::tests::SAMPLE_CATALOG;

    #[test]
    fn test_stations_csv_has_catalog_columns() {
        let (index, _) = StationIndex::from_catalog_reader(SAMPLE_CATALOG.as_bytes()).unwrap();
        let stations: Vec<&StationMetadata> = index.get_all().iter().take(2).collect();

        let mut buffer = Vec::new();
        write_stations_csv(&mut buffer, &stations).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("id,usaf,wban,name,country_code"));
        assert!(lines.next().unwrap().starts_with(&stations[0].id));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_human_listing() {
        colored::control::set_override(false);
        let mut station = StationMetadata::new("725030", "14732");
        station.name = Some("LA GUARDIA AIRPORT".to_string());

        let mut buffer = Vec::new();
        write_stations_human(&mut buffer, &[&station]).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("1 stations"));
        assert!(text.contains("725030-14732  LA GUARDIA AIRPORT"));
        assert!(text.contains("no location"));
    }
}
