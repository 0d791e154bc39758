//! Test utilities for acquisition
//!
//! [`MockTransport`] serves canned responses per station-year and counts
//! every call, so tests can assert exactly when the network was touched.

use super::transport::{Transport, TransportError};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

mod manager_tests;

pub const STATION: &str = "725030-14732";

/// Canned transport behaviour
#[derive(Debug, Clone)]
pub enum Response {
    Payload(Vec<u8>),
    NotFound,
    Failure(String),
    /// Never completes; only a timeout or cancellation ends the call
    Hang,
    /// Payload delivered after a delay
    Delayed(Duration, Vec<u8>),
}

#[derive(Debug, Default)]
pub struct MockTransport {
    archives: HashMap<(String, i32), Response>,
    resources: HashMap<String, Response>,
    /// Responses consumed before falling back to `archives`
    scripted: Mutex<Vec<Response>>,
    calls: AtomicUsize,
    /// Archive years in the order their fetches completed
    finished: Arc<Mutex<Vec<i32>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_archive(mut self, station_id: &str, year: i32, response: Response) -> Self {
        self.archives.insert((station_id.to_string(), year), response);
        self
    }

    pub fn with_resource(mut self, name: &str, response: Response) -> Self {
        self.resources.insert(name.to_string(), response);
        self
    }

    /// Queue responses returned, in order, ahead of the per-key ones
    pub fn with_script(self, responses: Vec<Response>) -> Self {
        *self.scripted.lock().unwrap() = responses.into_iter().rev().collect();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> Vec<i32> {
        self.finished.lock().unwrap().clone()
    }

    fn respond(&self, fallback: Option<&Response>) -> Response {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.scripted.lock().unwrap().pop() {
            return next;
        }
        fallback.cloned().unwrap_or(Response::NotFound)
    }
}

async fn play(response: Response) -> Result<Vec<u8>, TransportError> {
    match response {
        Response::Payload(bytes) => Ok(bytes),
        Response::NotFound => Err(TransportError::NotFoundRemote),
        Response::Failure(message) => Err(TransportError::Network(message)),
        Response::Hang => std::future::pending().await,
        Response::Delayed(delay, bytes) => {
            tokio::time::sleep(delay).await;
            Ok(bytes)
        }
    }
}

impl Transport for MockTransport {
    fn fetch(
        &self,
        station_id: &str,
        year: i32,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        let response = self.respond(self.archives.get(&(station_id.to_string(), year)));
        let finished = Arc::clone(&self.finished);
        async move {
            let result = play(response).await;
            finished.lock().unwrap().push(year);
            result
        }
    }

    fn fetch_resource(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        let response = self.respond(self.resources.get(name));
        play(response)
    }
}

/// Gzip `text` the way the archive serves it
pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// A compressed archive whose content names its year
pub fn archive_for(year: i32) -> Vec<u8> {
    gzip(&format!("record line for {}\n", year))
}
