use crate::config::types::{Config, CrawlerConfig, FetcherConfig, LimitsConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_limits_config(&config.limits)?;
    validate_fetcher_config(&config.fetcher)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth and depth_increment are u32, so >= 0 holds by construction

    validate_seed_url(&config.seed_url)?;

    if config.result_buffer < 1 {
        return Err(ConfigError::Validation(format!(
            "result_buffer must be >= 1, got {}",
            config.result_buffer
        )));
    }

    Ok(())
}

/// Validates termination budgets
fn validate_limits_config(config: &LimitsConfig) -> Result<(), ConfigError> {
    if config.max_results < 1 {
        return Err(ConfigError::Validation(format!(
            "max_results must be >= 1, got {}",
            config.max_results
        )));
    }

    if config.max_errors < 1 {
        return Err(ConfigError::Validation(format!(
            "max_errors must be >= 1, got {}",
            config.max_errors
        )));
    }

    if config.max_duration < 1 {
        return Err(ConfigError::Validation(format!(
            "max_duration must be >= 1s, got {}s",
            config.max_duration
        )));
    }

    Ok(())
}

/// Validates HTTP fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed address: must parse and use an HTTP(S) scheme
pub(crate) fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS scheme",
            seed
        )));
    }

    Ok(())
}
