use crate::config::types::{Config, DisplayLevel, RedundancyLevel};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Command-line values layered over the file configuration
///
/// Every field is optional; `None` leaves the file value (or default) alone.
#[derive(Debug, Default)]
pub struct Overrides {
    pub seeds: Vec<String>,
    pub total_depth: Option<u32>,
    pub scrape_contacts: Option<bool>,
    pub persist_logs: Option<bool>,
    pub redundancy: Option<RedundancyLevel>,
    pub display: Option<DisplayLevel>,
    pub log_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Parsed configuration (not yet validated)
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    Ok(config)
}

/// Builds the effective configuration for a run
///
/// Starts from defaults, layers in the optional TOML file, applies CLI
/// overrides on top, and validates the result. Validation failure is the one
/// blocking error class: the job never starts with a bad configuration.
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => load_config(p)?,
        None => Config::default(),
    };

    apply_overrides(&mut config, overrides);
    validate(&config)?;

    Ok(config)
}

/// Applies CLI overrides onto a parsed configuration
pub fn apply_overrides(config: &mut Config, overrides: Overrides) {
    if !overrides.seeds.is_empty() {
        config.seeds = overrides.seeds;
    }

    if let Some(depth) = overrides.total_depth {
        config.total_depth = depth;
    }

    if let Some(scrape) = overrides.scrape_contacts {
        config.scrape_contacts = scrape;
    }

    if let Some(persist) = overrides.persist_logs {
        config.persist_logs = persist;
    }

    if let Some(redundancy) = overrides.redundancy {
        config.redundancy = redundancy;
    }

    if let Some(display) = overrides.display {
        config.display = display;
    }

    if let Some(log_dir) = overrides.log_dir {
        config.log_dir = log_dir;
    }

    if let Some(timeout) = overrides.timeout_secs {
        config.timeout_secs = timeout;
    }
}
