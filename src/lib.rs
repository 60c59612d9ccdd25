//! Page-Tally: a concurrent substring counter for web pages
//!
//! This crate reads a stream of URLs, fetches every page in its own worker,
//! counts the occurrences of a fixed substring in each body and folds the
//! per-page counts into a single total.

pub mod config;
pub mod crawler;
pub mod input;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Page-Tally operations
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dispatcher stopped unexpectedly: {0}")]
    Dispatcher(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Per-fetch errors
///
/// None of these are fatal to a scan: the affected task simply contributes
/// nothing to the total.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("request timed out")]
    Timeout { url: String },

    #[error("Wrong http response code={status} received")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to read body: {source}")]
    Read { url: String, source: reqwest::Error },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Timeout { url }
            | Self::HttpStatus { url, .. }
            | Self::Read { url, .. } => url,
        }
    }

    /// Returns true if the request never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("{0}")]
    Parse(#[from] ::url::ParseError),

    #[error("URL is empty")]
    Empty,

    #[error("URL has leading or trailing whitespace")]
    SurroundingWhitespace,
}

/// Result type alias for Page-Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_scan, Aggregate, Dispatcher, Fetcher, PartialResult, Task};
pub use output::{CollectingReporter, ConsoleReporter, Reporter};
pub use state::DispatchState;
