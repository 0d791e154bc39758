//! Command implementations for the ISD processor CLI
//!
//! Each subcommand lives in its own module:
//! - `weather`: Observation retrieval with CSV/JSON output
//! - `stations`: Catalog search and the country listing
//! - `inventory`: Published monthly observation counts

pub mod inventory;
pub mod shared;
pub mod stations;
pub mod weather;

use crate::cli::args::{Args, Commands};
use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Dispatch to the subcommand handler
///
/// Callers check that a subcommand is present before calling this.
pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    let Some(command) = args.command else {
        anyhow::bail!("no command given");
    };
    shared::setup_logging(command.common())?;

    match command {
        Commands::Weather(args) => weather::run_weather(args, cancel).await,
        Commands::Stations(args) => stations::run_stations(args, cancel).await,
        Commands::Countries(args) => stations::run_countries(args, cancel).await,
        Commands::Inventory(args) => inventory::run_inventory(args, cancel).await,
    }
}
