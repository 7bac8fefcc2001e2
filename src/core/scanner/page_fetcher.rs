// src/core/scanner/page_fetcher.rs

use crate::core::config::EngineConfig;
use crate::core::error::FetchError;
use reqwest::StatusCode;
use tracing::{debug, error, info};
use std::time::Duration;
use url::Url;

/// A page that answered 200. Any other status never becomes a `FetchedPage`.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub status_code: u16,
    pub raw_body: String,
}

impl FetchedPage {
    pub fn new(url: Url, raw_body: impl Into<String>) -> Self {
        Self { url, status_code: StatusCode::OK.as_u16(), raw_body: raw_body.into() }
    }
}

/// Single-shot HTTP GET with a bounded timeout. No retries.
pub struct PageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(config: &EngineConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client.");
                FetchError::Client(e.to_string())
            })?;
        Ok(Self { client, timeout: config.fetch_timeout })
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        info!(url = %url, "Fetching page.");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "HTTP request failed.");
            self.classify(e)
        })?;

        let status = response.status();
        info!(status = %status, "Received HTTP response.");
        if status != StatusCode::OK {
            return Err(FetchError::NonOk(status.as_u16()));
        }

        let raw_body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body.");
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Body(e.to_string())
            }
        })?;
        debug!(bytes = %raw_body.len(), "Successfully read response body.");

        Ok(FetchedPage { url: url.clone(), status_code: status.as_u16(), raw_body })
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if e.is_builder() {
            FetchError::Client(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}
