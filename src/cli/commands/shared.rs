//! Shared components for CLI commands
//!
//! Logging setup, progress spinners, and loading of the station catalog and
//! inventory through the on-disk cache.

use crate::app::services::acquisition::cache::persist_atomic;
use crate::app::services::acquisition::{AcquisitionManager, HttpTransport};
use crate::app::services::inventory::Inventory;
use crate::app::services::station_index::{CoordinateZones, StationIndex};
use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::constants::{INVENTORY_FILE, STATION_CATALOG_FILE};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("isd_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Create a spinner for indeterminate operations, hidden in quiet mode
pub fn create_spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Catalog-side context shared by commands
pub struct CatalogContext {
    pub config: Config,
    pub transport: HttpTransport,
    manager: AcquisitionManager<HttpTransport>,
    cache_dir: PathBuf,
    refresh: bool,
    show_progress: bool,
}

impl CatalogContext {
    pub fn new(config: Config, common: &CommonArgs, cancel: CancellationToken) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let cache_dir = config
            .cache_dir
            .clone()
            .context("a cache directory is required for the station catalog")?;
        let manager =
            AcquisitionManager::new(transport.clone(), config.clone()).with_cancellation(cancel);
        Ok(Self {
            config,
            transport,
            manager,
            cache_dir,
            refresh: common.refresh_catalog,
            show_progress: common.show_progress(),
        })
    }

    /// Load the station catalog, downloading it on first use
    pub async fn load_index(&self) -> Result<StationIndex> {
        let path = self.cached_resource(STATION_CATALOG_FILE).await?;
        let (index, stats) = tokio::task::spawn_blocking(move || {
            StationIndex::load_catalog_with_zones(&path, &CoordinateZones::new())
                .with_context(|| format!("Failed to load station catalog {}", path.display()))
        })
        .await??;
        if stats.has_errors() {
            info!("{} catalog rows rejected", stats.records_rejected);
        }
        Ok(index)
    }

    /// Load the published inventory, downloading it on first use
    pub async fn load_inventory(&self) -> Result<Inventory> {
        let path = self.cached_resource(INVENTORY_FILE).await?;
        Inventory::load(&path)
            .with_context(|| format!("Failed to load inventory {}", path.display()))
    }

    async fn cached_resource(&self, name: &str) -> Result<PathBuf> {
        let path = self.cache_dir.join(name);
        if !self.refresh && path.is_file() {
            debug!("Using cached {}", path.display());
            return Ok(path);
        }

        let spinner = create_spinner(&format!("Downloading {}", name), self.show_progress);
        let bytes = self.manager.fetch_resource(name).await;
        spinner.finish_and_clear();
        let bytes = bytes.with_context(|| format!("Failed to download {}", name))?;

        let dir = self.cache_dir.clone();
        let file_name = name.to_string();
        let path = tokio::task::spawn_blocking(move || persist_atomic(&dir, &file_name, &bytes))
            .await??;
        info!("Saved {} to {}", name, path.display());
        Ok(path)
    }
}

/// Empty cell for a null value
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
