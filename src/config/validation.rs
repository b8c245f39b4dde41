use crate::config::types::{Config, FetcherConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("homepage_timeout_ms", config.homepage_timeout_ms),
        ("probe_timeout_ms", config.probe_timeout_ms),
        ("download_timeout_ms", config.download_timeout_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be greater than 0",
                name
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.download_root.is_empty() {
        return Err(ConfigError::Validation(
            "download_root cannot be empty".to_string(),
        ));
    }

    Ok(())
}
