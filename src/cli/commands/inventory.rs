//! Inventory command implementation

use super::shared::CatalogContext;
use crate::app::models::InventoryRow;
use crate::app::services::weather::WeatherService;
use crate::cli::args::{InventoryArgs, OutputFormat};
use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Inventory command runner
pub async fn run_inventory(args: InventoryArgs, cancel: CancellationToken) -> Result<()> {
    let config = args.common.config()?;
    let catalog = CatalogContext::new(config, &args.common, cancel)?;
    let index = catalog.load_index().await?;
    let inventory = catalog.load_inventory().await?;
    let service = WeatherService::new(
        Arc::new(index),
        catalog.transport.clone(),
        catalog.config.clone(),
    )?
    .with_inventory(inventory);

    let rows: Vec<&InventoryRow> = match &args.station {
        Some(station_id) => {
            // Unknown ids fail here rather than printing nothing
            service.index().lookup(station_id)?;
            service
                .get_inventory()?
                .iter()
                .filter(|row| &row.station_id == station_id)
                .collect()
        }
        None => service.get_inventory()?.iter().collect(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.yearly {
        let station_id = args
            .station
            .as_deref()
            .context("--yearly needs a station id")?;
        let totals = service
            .inventory()
            .map(|inventory| inventory.yearly_totals(station_id))
            .unwrap_or_default();
        match args.common.output_format {
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(&mut out);
                writer.write_record(["year", "count"])?;
                for (year, count) in &totals {
                    writer.write_record([year.to_string(), count.to_string()])?;
                }
                writer.flush()?;
            }
            OutputFormat::Json => serde_json::to_writer_pretty(&mut out, &totals)?,
            OutputFormat::Human => {
                for (year, count) in &totals {
                    writeln!(out, "{}  {}", year.to_string().bright_white().bold(), count)?;
                }
            }
        }
    } else {
        match args.common.output_format {
            OutputFormat::Csv => write_inventory_csv(&mut out, &rows)?,
            OutputFormat::Json => serde_json::to_writer_pretty(&mut out, &rows)?,
            OutputFormat::Human => {
                for row in &rows {
                    writeln!(
                        out,
                        "{}  {}-{:02}  {}",
                        row.station_id.bright_white().bold(),
                        row.year,
                        row.month,
                        row.count
                    )?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Long-form inventory rows
pub fn write_inventory_csv<W: Write>(out: W, rows: &[&InventoryRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: u32, count: u64) -> InventoryRow {
        InventoryRow {
            station_id: "725030-14732".to_string(),
            year,
            month,
            count,
        }
    }

    #[test]
    fn test_inventory_csv() {
        let rows = [row(2020, 1, 700), row(2020, 2, 650)];
        let refs: Vec<&InventoryRow> = rows.iter().collect();

        let mut buffer = Vec::new();
        write_inventory_csv(&mut buffer, &refs).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(
            text,
            "station_id,year,month,count\n725030-14732,2020,1,700\n725030-14732,2020,2,650\n"
        );
    }
}
