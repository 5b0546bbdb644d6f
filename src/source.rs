//! Image sources that supply raw, encoded camera frames.

use reqwest::Client;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FocusError;

/// Default camera snapshot endpoint (mjpg-streamer on the printer host).
pub const DEFAULT_CAMERA_URL: &str = "http://localhost:8080/?action=snapshot";

/// Default time allowed for a single snapshot request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can hand out the bytes of one encoded frame.
pub trait ImageSource {
    /// Fetch one frame. Failures are reported as [`FocusError::SourceUnavailable`].
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, FocusError>> + Send;
}

/// Fetches snapshots over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    url: String,
    client: Client,
}

impl HttpSnapshotSource {
    /// Create a source for `url`; each request is bounded by `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FocusError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FocusError::SourceUnavailable(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ImageSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<Vec<u8>, FocusError> {
        debug!(url = %self.url, "fetching snapshot");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "snapshot request failed");
            if e.is_timeout() {
                FocusError::SourceUnavailable(format!("timed out fetching {}", self.url))
            } else {
                FocusError::SourceUnavailable(format!("{}: {}", self.url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, %status, "camera returned an error status");
            return Err(FocusError::SourceUnavailable(format!(
                "{} returned {}",
                self.url, status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            FocusError::SourceUnavailable(format!("failed to read body from {}: {}", self.url, e))
        })?;
        Ok(body.to_vec())
    }
}

/// Reads a frame from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, FocusError> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            FocusError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })
    }
}

/// Hands out the same bytes on every fetch.
#[derive(Debug, Clone)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ImageSource for MemorySource {
    async fn fetch(&self) -> Result<Vec<u8>, FocusError> {
        Ok(self.bytes.clone())
    }
}
