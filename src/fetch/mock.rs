// src/fetch/mock.rs
// In-memory Transport for tests: serves canned bodies and records every URL
// that was requested, so tests can count real network fetches.

use super::transport::Transport;
use crate::error::FetchError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, Vec<u8>>,
    broken: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(url.to_string(), body.into());
        self
    }

    /// Makes `url` fail with a non-404 HTTP status
    pub fn fail(mut self, url: &str, status: u16) -> Self {
        self.broken.insert(url.to_string(), status);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(&status) = self.broken.get(url) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }
        let body = self.routes.get(url).ok_or_else(|| FetchError::NotFound {
            url: url.to_string(),
        })?;
        tokio::fs::write(dest, body)
            .await
            .map_err(|source| FetchError::Io {
                path: dest.to_path_buf(),
                source,
            })
    }
}
