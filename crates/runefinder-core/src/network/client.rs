//! HTTP client wrapper.
//!
//! Wraps reqwest with a fixed user agent, a request timeout, and status
//! checking that turns non-2xx responses into [`RuneError::DownloadFailed`].

use crate::config::NetworkConfig;
use crate::{Result, RuneError};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP client used for fetching the character database.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| RuneError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make a GET request, failing on any non-success status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RuneError::Timeout(self.timeout)
            } else {
                RuneError::Network {
                    message: format!("GET {} failed: {}", url, e),
                    source: Some(e),
                }
            }
        })?;

        Self::check_response_status(response, url)
    }

    /// Check if an HTTP status code indicates a transient server-side error.
    pub fn is_retryable_status(status: StatusCode) -> bool {
        matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
    }

    fn check_response_status(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let hint = if Self::is_retryable_status(status) {
            " (transient, may be retried)"
        } else {
            ""
        };
        Err(RuneError::DownloadFailed {
            url: url.to_string(),
            message: format!("HTTP status {}{}", status, hint),
        })
    }
}
