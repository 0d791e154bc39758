//! Transport boundary for the ISD archive
//!
//! The acquisition manager only needs "give me the compressed bytes for this
//! station-year" and "give me this catalog resource". [`HttpTransport`] does
//! that over HTTPS against the NCEI archive layout; tests substitute their
//! own implementation.

use crate::config::Config;
use crate::constants::archive_file_name;
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use std::future::Future;
use tracing::debug;

/// Failure reported by a transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The archive publishes nothing under this name
    #[error("not published in the archive")]
    NotFoundRemote,

    /// Connection, protocol or server failure; may succeed on retry
    #[error("{0}")]
    Network(String),
}

/// Source of compressed station-year archives and catalog resources
pub trait Transport: Send + Sync {
    /// Fetch the gzip archive for one station-year
    fn fetch(
        &self,
        station_id: &str,
        year: i32,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send;

    /// Fetch a named file published at the archive root (e.g. `isd-history.csv`)
    fn fetch_resource(
        &self,
        name: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send;
}

/// HTTPS transport against `{base_url}/{year}/{station_id}-{year}.gz`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("isd-processor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of a station-year archive
    pub fn archive_url(&self, station_id: &str, year: i32) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            year,
            archive_file_name(station_id, year)
        )
    }

    async fn get(&self, url: String) -> std::result::Result<Vec<u8>, TransportError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("{}: {}", url, e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(TransportError::NotFoundRemote),
            status if !status.is_success() => Err(TransportError::Network(format!(
                "{}: HTTP {}",
                url, status
            ))),
            _ => response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransportError::Network(format!("{}: {}", url, e))),
        }
    }
}

impl Transport for HttpTransport {
    fn fetch(
        &self,
        station_id: &str,
        year: i32,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send {
        self.get(self.archive_url(station_id, year))
    }

    fn fetch_resource(
        &self,
        name: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send {
        self.get(format!("{}/{}", self.base_url, name))
    }
}
