use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{Result, ScrapeError};

/// Thin wrapper around a reqwest client that always sends the configured
/// `User-Agent` and gives up after `timeout`.
#[derive(Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::transport("<client setup>", e))?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the body. Any non-2xx status is a transport error.
    #[instrument(skip(self))]
    pub async fn html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::transport(url, format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::transport(url, e))?;
        debug!("received {} bytes", body.len());
        Ok(body)
    }
}
