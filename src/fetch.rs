//! HTTP downloads into temporary files.
//!
//! [`Fetcher::download`] streams a response body into a fresh [`TempFile`].
//! A non-success status is an error, and a failed download never leaves a
//! partial file behind: the handle is dropped and the file removed.
//!
//! There is no retry. There is no timeout unless one is configured, in which
//! case a stalled server fails the download once it elapses.

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TempConfig;
use crate::core::GitkitError;
use crate::utils::fs::TempFile;

/// Downloads URLs into [`TempFile`]s.
pub struct Fetcher {
    client: reqwest::Client,
    temp: TempConfig,
}

impl Fetcher {
    /// Fetcher without a request timeout.
    pub fn new(temp: TempConfig) -> Result<Self> {
        Self::with_timeout(temp, None)
    }

    /// Fetcher whose requests fail after `timeout` (None waits indefinitely).
    pub fn with_timeout(temp: TempConfig, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build().context("Failed to create HTTP client")?,
            temp,
        })
    }

    /// GET `url` and write the full body to a new temporary file.
    ///
    /// On success the returned file is closed and complete.
    ///
    /// # Errors
    ///
    /// - [`GitkitError::NetworkError`] on connection failure, a non-2xx
    ///   status, or a transfer error mid-body
    /// - IO errors if the temporary file cannot be created or written
    pub async fn download(&self, url: &str) -> Result<TempFile> {
        let network_error = |reason: String| GitkitError::NetworkError {
            url: url.to_string(),
            reason,
        };

        let output = TempFile::create(&self.temp)?;
        info!("Downloading {}", url);

        let mut response =
            self.client.get(url).send().await.map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_error(format!("HTTP status {status}")).into());
        }

        let mut file = output.open_write()?;
        let mut downloaded: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|e| network_error(e.to_string()))? {
            file.write_all(&chunk).with_context(|| {
                format!("Failed to write download to {}", output.path().display())
            })?;
            downloaded += chunk.len() as u64;
        }
        file.flush()?;
        drop(file);

        debug!("Downloaded {} bytes from {} to {}", downloaded, url, output.path().display());
        Ok(output)
    }
}
