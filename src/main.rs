use clap::Parser;
use isd_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Cancel outstanding downloads when Ctrl+C is received
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
            cancellation_token.cancel();
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::Error::from(isd_processor::Error::cancelled(
                    "interrupted by user",
                )))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("ISD Processor - NOAA Integrated Surface Database retrieval");
    println!("==========================================================");
    println!();
    println!("Download, decode and normalize hourly surface observations from the");
    println!("NCEI ISD archive, and search its station catalog.");
    println!();
    println!("USAGE:");
    println!("    isd-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    weather     Retrieve observations for one station");
    println!("    stations    Search the station catalog");
    println!("    inventory   Show monthly observation counts");
    println!("    countries   List country codes known to the catalog");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # LaGuardia, 2020-2021, local time, Fahrenheit:");
    println!("    isd-processor weather 725030-14732 --years 2020-2021 --local --unit f");
    println!();
    println!("    # Hourly grid as JSON:");
    println!("    isd-processor weather 037720-99999 --years 2022 --hourly --format json");
    println!();
    println!("    # Stations in New York state with recent data:");
    println!("    isd-processor stations --country-code US --state NY --recent --format human");
    println!();
    println!("For detailed help on any command, use:");
    println!("    isd-processor <COMMAND> --help");
}
