use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Page-Tally
///
/// Every section is optional; a missing file or an empty one yields the
/// defaults (10s timeout, pattern `"Go"`, input buffer of 5, no worker bound).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Client-wide timeout applied to every request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl FetcherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// What to count in each page
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Exact, case-sensitive substring to count
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
        }
    }
}

/// Dispatcher tuning
#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    /// Buffer size of the input stream feeding the dispatcher
    #[serde(rename = "input-capacity", default = "default_input_capacity")]
    pub input_capacity: usize,

    /// Maximum number of fetches in flight; unbounded when absent
    #[serde(rename = "max-workers", default)]
    pub max_workers: Option<usize>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            input_capacity: default_input_capacity(),
            max_workers: None,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("page-tally/{}", env!("CARGO_PKG_VERSION"))
}

fn default_pattern() -> String {
    "Go".to_string()
}

fn default_input_capacity() -> usize {
    5
}
