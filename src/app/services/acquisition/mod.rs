//! Acquisition and cache management for station-year archives
//!
//! Resolves each requested station-year to the cheapest valid source:
//!
//! 1. the cache directory (per-request override, else the configured one)
//! 2. the current working directory, when enabled
//! 3. the remote archive through a [`Transport`]
//!
//! A cached file that fails validation is deleted and treated as a miss.
//! Fetched archives are validated before they are persisted, so a bad
//! payload never lands in the cache. Station-years published nowhere
//! resolve to `None` rather than an error.
//!
//! - [`transport`] - Transport trait and the HTTPS implementation
//! - [`cache`] - Cache layout, validation and atomic persistence

pub mod cache;
pub mod transport;

#[cfg(test)]
pub mod tests;

pub use cache::{CacheEntry, CacheSource};
pub use transport::{HttpTransport, Transport, TransportError};

use crate::config::Config;
use crate::constants::archive_file_name;
use crate::{Error, Result};
use futures::{StreamExt, TryStreamExt, stream};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A station-year ready for decoding
#[derive(Debug, Clone)]
pub struct StationYear {
    pub entry: CacheEntry,
    /// Decompressed record lines
    pub text: String,
}

/// Resolves station-years from cache or transport
#[derive(Debug)]
pub struct AcquisitionManager<T> {
    transport: T,
    config: Config,
    cancel: CancellationToken,
}

impl<T: Transport> AcquisitionManager<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the caller
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve several years of one station, in request order
    ///
    /// Years are resolved concurrently up to `max_concurrent_fetches`, but
    /// results are yielded in the order of `years`. Missing years are `None`.
    pub async fn resolve_years(
        &self,
        station_id: &str,
        years: &[i32],
        cache_dir: Option<&Path>,
    ) -> Result<Vec<(i32, Option<StationYear>)>> {
        stream::iter(years.iter().copied())
            .map(|year| async move {
                self.resolve(station_id, year, cache_dir)
                    .await
                    .map(|resolved| (year, resolved))
            })
            .buffered(self.config.max_concurrent_fetches.max(1))
            .try_collect()
            .await
    }

    /// Resolve one station-year
    pub async fn resolve(
        &self,
        station_id: &str,
        year: i32,
        cache_dir: Option<&Path>,
    ) -> Result<Option<StationYear>> {
        self.check_cancelled()?;
        let cache_dir = cache_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.cache_dir.clone());

        for (dir, source) in self.candidate_dirs(cache_dir.as_deref()) {
            let path = cache::archive_path(&dir, station_id, year);
            if let Some(text) = self.read_bounded(&path).await? {
                debug!("Using {} {} from {}", station_id, year, path.display());
                return Ok(Some(StationYear {
                    entry: CacheEntry {
                        station_id: station_id.to_string(),
                        year,
                        source,
                        path: Some(path),
                    },
                    text,
                }));
            }
        }

        info!("Fetching {} {} from the archive", station_id, year);
        let what = format!("{} {}", station_id, year);
        let Some(bytes) = self
            .with_retry(&what, || self.transport.fetch(station_id, year))
            .await?
        else {
            info!("No archive published for {} {}", station_id, year);
            return Ok(None);
        };

        let text = cache::decompress_archive(&bytes)
            .map_err(|reason| Error::cache_corruption(format!("{} (fetched)", what), reason))?;

        let path = match cache_dir {
            Some(dir) => {
                let file_name = archive_file_name(station_id, year);
                let path = tokio::task::spawn_blocking(move || {
                    cache::persist_atomic(&dir, &file_name, &bytes)
                })
                .await
                .map_err(|e| Error::io("Cache write task failed", std::io::Error::other(e)))??;
                debug!("Cached {} at {}", what, path.display());
                Some(path)
            }
            None => None,
        };

        Ok(Some(StationYear {
            entry: CacheEntry {
                station_id: station_id.to_string(),
                year,
                source: CacheSource::Fetched,
                path,
            },
            text,
        }))
    }

    /// Fetch a catalog resource such as `isd-history.csv`
    pub async fn fetch_resource(&self, name: &str) -> Result<Vec<u8>> {
        self.check_cancelled()?;
        self.with_retry(name, || self.transport.fetch_resource(name))
            .await?
            .ok_or_else(|| Error::network(format!("{} is not published in the archive", name)))
    }

    fn candidate_dirs(&self, cache_dir: Option<&Path>) -> Vec<(PathBuf, CacheSource)> {
        let mut dirs = Vec::new();
        if let Some(dir) = cache_dir {
            dirs.push((dir.to_path_buf(), CacheSource::CacheDir));
        }
        if self.config.check_working_dir {
            match std::env::current_dir() {
                Ok(cwd) if Some(cwd.as_path()) != cache_dir => {
                    dirs.push((cwd, CacheSource::WorkingDir))
                }
                Ok(_) => {}
                Err(e) => debug!("Working directory unavailable: {}", e),
            }
        }
        dirs
    }

    /// Read a cached archive under the request timeout
    ///
    /// A read that times out counts as a miss. Cancellation aborts.
    async fn read_bounded(&self, path: &Path) -> Result<Option<String>> {
        let timeout = self.config.request_timeout();
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                Err(Error::cancelled(format!("read of {} cancelled", path.display())))
            }
            outcome = tokio::time::timeout(timeout, read_cached(path)) => match outcome {
                Ok(text) => Ok(text),
                Err(_) => {
                    warn!(
                        "Reading {} timed out after {}s, treating it as a miss",
                        path.display(),
                        timeout.as_secs()
                    );
                    Ok(None)
                }
            },
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::cancelled("acquisition cancelled"))
        } else {
            Ok(())
        }
    }

    /// Run a transport call under the timeout and retry budget
    ///
    /// `Ok(None)` means the archive does not publish the resource. Timeouts
    /// and network failures are retried with doubling backoff; exhausting
    /// the budget is [`Error::Network`].
    async fn with_retry<F, Fut>(&self, what: &str, mut call: F) -> Result<Option<Vec<u8>>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<Vec<u8>, TransportError>>,
    {
        let timeout = self.config.request_timeout();
        let attempts = self.config.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Err(Error::cancelled(format!("fetch of {} cancelled", what)));
                }
                outcome = tokio::time::timeout(timeout, call()) => outcome,
            };

            let failure = match outcome {
                Ok(Ok(bytes)) => return Ok(Some(bytes)),
                Ok(Err(TransportError::NotFoundRemote)) => return Ok(None),
                Ok(Err(TransportError::Network(message))) => message,
                Err(_) => format!("timed out after {}s", timeout.as_secs()),
            };

            if attempt >= attempts {
                return Err(Error::network(format!(
                    "{}: {} (gave up after {} attempts)",
                    what, failure, attempts
                )));
            }

            let backoff = self.config.backoff_for_retry(attempt);
            warn!(
                "Fetch of {} failed (attempt {}/{}): {}; retrying in {:?}",
                what, attempt, attempts, failure, backoff
            );
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Err(Error::cancelled(format!("fetch of {} cancelled", what)));
                }
                _ = tokio::time::sleep(backoff) => {}
            }
        }
    }
}

/// Read and validate a cached archive; corrupt files are removed
async fn read_cached(path: &Path) -> Option<String> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Cannot read cached archive {}: {}", path.display(), e);
            return None;
        }
    };

    let checked = tokio::task::spawn_blocking(move || cache::decompress_archive(&bytes))
        .await
        .unwrap_or_else(|e| Err(format!("decompression task failed: {}", e)));

    match checked {
        Ok(text) => Some(text),
        Err(reason) => {
            warn!(
                "Discarding corrupt cached archive {}: {}",
                path.display(),
                reason
            );
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Failed to remove {}: {}", path.display(), e);
            }
            None
        }
    }
}
