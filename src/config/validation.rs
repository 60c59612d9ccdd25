use crate::config::types::{Config, DispatcherConfig, FetcherConfig, SearchConfig};
use crate::ConfigError;

/// Upper bound for the input stream buffer
const MAX_INPUT_CAPACITY: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_search_config(&config.search)?;
    validate_dispatcher_config(&config.dispatcher)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.pattern.is_empty() {
        return Err(ConfigError::Validation(
            "pattern cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_dispatcher_config(config: &DispatcherConfig) -> Result<(), ConfigError> {
    // tokio's bounded channel panics on a zero capacity
    if config.input_capacity < 1 || config.input_capacity > MAX_INPUT_CAPACITY {
        return Err(ConfigError::Validation(format!(
            "input_capacity must be between 1 and {}, got {}",
            MAX_INPUT_CAPACITY, config.input_capacity
        )));
    }

    if config.max_workers == Some(0) {
        return Err(ConfigError::Validation(
            "max_workers must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}
