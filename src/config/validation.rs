use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::url::parse_seed;
use crate::ConfigError;

/// Upper bound on the admission gate capacity
pub const MAX_CONCURRENT_FETCHES: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.default_scheme != "http" && config.default_scheme != "https" {
        return Err(ConfigError::Validation(format!(
            "default_scheme must be http or https, got '{}'",
            config.default_scheme
        )));
    }

    if config.seed.trim().is_empty() {
        return Err(ConfigError::Validation("a seed URL is required".to_string()));
    }

    parse_seed(&config.seed, &config.default_scheme).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed, e))
    })?;

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be at least 1 when set".to_string(),
        ));
    }

    // A depth below 1 is legal: the seed is registered but never fetched
    if config.max_depth < 1 {
        tracing::warn!(
            "max_depth is {}; only the seed will be recorded",
            config.max_depth
        );
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config
        .json_path
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(ConfigError::Validation(
            "json_path cannot be empty".to_string(),
        ));
    }

    if config
        .sitemap_path
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(ConfigError::Validation(
            "sitemap_path cannot be empty".to_string(),
        ));
    }

    if config.sitemap_path.is_some() && !config.sitemap {
        tracing::warn!("sitemap_path is set but sitemap output is disabled");
    }

    Ok(())
}
