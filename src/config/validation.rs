use crate::config::types::CrawlConfig;
use crate::url::parse_with_default_scheme;
use crate::{ConfigError, ConfigResult};
use std::time::Duration;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> ConfigResult<()> {
    validate_seed_url(&config.seed_url)?;
    validate_limits(config)?;
    validate_timeouts(config.request_timeout, config.connect_timeout)?;
    Ok(())
}

/// Validates the seed URL: must parse as http(s) with a host
fn validate_seed_url(seed: &str) -> ConfigResult<()> {
    parse_with_default_scheme(seed)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", seed, e)))
}

/// Validates the concurrency and page limits
fn validate_limits(config: &CrawlConfig) -> ConfigResult<()> {
    if config.max_concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be >= 1, got {}",
            config.max_concurrency
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates request timeouts; a zero timeout would fail every fetch
fn validate_timeouts(request: Duration, connect: Duration) -> ConfigResult<()> {
    if request.is_zero() || connect.is_zero() {
        return Err(ConfigError::Validation(format!(
            "timeouts must be non-zero, got request={:?} connect={:?}",
            request, connect
        )));
    }
    Ok(())
}
