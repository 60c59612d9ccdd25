//! HTTP fetcher implementation
//!
//! This module handles every HTTP request made during a scan:
//! - Building the single HTTP client shared by all workers
//! - Issuing one GET per task, with no retries
//! - Rejecting any status other than 200
//! - Classifying failures and logging one diagnostic line per failure

use crate::config::FetcherConfig;
use crate::{FetchError, FetchResult};
use reqwest::{Client, StatusCode};

/// Builds an HTTP client with proper configuration
///
/// The timeout applies to the whole request, body included.
///
/// # Example
///
/// ```no_run
/// use page_tally::config::FetcherConfig;
/// use page_tally::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches page bodies through a shared client
///
/// The client is handed in rather than created here, so one connection pool
/// serves every worker and tests can supply their own tuned client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Convenience constructor that builds the client from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches `url` and returns the body as text
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The full body of a 200 response
    /// * `Err(FetchError)` - Transport failure, timeout, non-200 status, or a
    ///   body that could not be read. A `[<url>] <detail>` line has already
    ///   been logged.
    pub async fn fetch(&self, url: &str) -> FetchResult<String> {
        let result = self.fetch_once(url).await;

        if let Err(e) = &result {
            tracing::warn!(transport = e.is_transport(), "[{}] {}", e.url(), e);
        }

        result
    }

    async fn fetch_once(&self, url: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            // Dropping the response here releases the connection without reading the body
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // `text` consumes the response, so it is released on both outcomes
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Read {
                    url: url.to_string(),
                    source: e,
                }
            }
        })
    }
}

fn classify_send_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
