//! Configuration management and validation.
//!
//! Provides the configuration structure for cache placement, transport
//! timeouts and retries, fetch concurrency, and the decoding policies that
//! decide how quality codes and malformed lines are treated.

use crate::constants::{
    BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_BACKOFF_MS,
    MAX_CONCURRENT_FETCHES,
};
use crate::app::models::QualityClass;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which quality codes null out a mandatory-section value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPolicy {
    /// Keep every value regardless of its quality code
    KeepAll,
    /// Null values flagged erroneous (codes 3 and 7)
    #[default]
    DropErroneous,
    /// Null values flagged suspect (codes 2 and 6) as well as erroneous ones
    DropSuspect,
}

impl QualityPolicy {
    /// Whether a value carrying this quality code survives the policy
    pub fn accepts(self, code: u8) -> bool {
        match (self, QualityClass::from_code(code)) {
            (QualityPolicy::KeepAll, _) => true,
            (_, QualityClass::Erroneous) => false,
            (QualityPolicy::DropSuspect, QualityClass::Suspect) => false,
            _ => true,
        }
    }
}

/// What to do with a line that fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrorPolicy {
    /// Fail the whole station-year on the first bad line
    #[default]
    Abort,
    /// Log and count the bad line, keep decoding the rest of the file
    Skip,
}

/// Global configuration for ISD processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding cached station-year archives and catalog files
    pub cache_dir: Option<PathBuf>,

    /// Also look for cached archives in the current working directory
    pub check_working_dir: bool,

    /// Root URL of the ISD archive
    pub base_url: String,

    /// Timeout for a single transport attempt in seconds
    pub request_timeout_secs: u64,

    /// Retries after the first failed transport attempt
    pub max_retries: u32,

    /// Backoff before the first retry in milliseconds; doubles per attempt
    pub retry_backoff_ms: u64,

    /// Maximum number of station-years resolved concurrently
    pub max_concurrent_fetches: usize,

    /// Quality code handling for mandatory-section fields
    pub quality_policy: QualityPolicy,

    /// Malformed line handling
    pub decode_error_policy: DecodeErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            check_working_dir: true,
            base_url: BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            max_concurrent_fetches: num_cpus::get().clamp(1, MAX_CONCURRENT_FETCHES),
            quality_policy: QualityPolicy::default(),
            decode_error_policy: DecodeErrorPolicy::default(),
        }
    }
}

impl Config {
    /// Set the cache directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Stop looking for cached archives in the working directory
    pub fn without_working_dir_lookup(mut self) -> Self {
        self.check_working_dir = false;
        self
    }

    /// Point the transport at a different archive root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-attempt transport timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the retry budget and initial backoff
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff.as_millis() as u64;
        self
    }

    /// Set maximum concurrent station-year resolutions
    pub fn with_max_concurrent_fetches(mut self, max_fetches: usize) -> Self {
        self.max_concurrent_fetches = max_fetches;
        self
    }

    /// Set the quality code policy
    pub fn with_quality_policy(mut self, policy: QualityPolicy) -> Self {
        self.quality_policy = policy;
        self
    }

    /// Set the malformed line policy
    pub fn with_decode_error_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.decode_error_policy = policy;
        self
    }

    /// Per-attempt transport timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Backoff before the given retry (1-based), doubling each time
    pub fn backoff_for_retry(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(Error::configuration("request timeout must be at least 1 second"));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(Error::configuration(
                "max_concurrent_fetches must be at least 1",
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration("base_url cannot be empty"));
        }
        Ok(())
    }
}
