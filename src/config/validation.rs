use crate::config::types::Config;
use crate::ConfigError;

/// Validates the entire configuration
///
/// Invalid configuration is the only blocking error class in a crawl job;
/// everything caught here surfaces to the operator before the job begins.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        if seed.trim().is_empty() {
            return Err(ConfigError::Validation(
                "seed URLs cannot be blank".to_string(),
            ));
        }
    }

    if config.total_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "total-depth must be at least 1, got {}",
            config.total_depth
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be at least 1, got {}",
            config.timeout_secs
        )));
    }

    if config.log_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
