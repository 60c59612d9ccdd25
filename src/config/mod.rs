//! Configuration module for Page-Tally
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use page_tally::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tally.toml")).unwrap();
//! println!("Counting occurrences of: {}", config.search.pattern);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DispatcherConfig, FetcherConfig, SearchConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
