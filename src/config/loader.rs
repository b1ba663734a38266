//! Configuration loader for YAML files
//!
//! This module handles loading and validating configuration from YAML files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::warn;

use crate::error::{AppError, Result};

use super::types::AppConfig;

/// Load configuration from a YAML file
///
/// This function:
/// 1. Checks if the file exists
/// 2. Parses the YAML content
/// 3. Validates the configuration rules
///
/// # Arguments
/// * `path` - Path to the configuration YAML file
///
/// # Returns
/// * `Ok(AppConfig)` - Successfully loaded and validated configuration
/// * `Err(AppError)` - File not found, parse error, or validation failure
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use rate_scanner::config::load_config;
///
/// let config = load_config(Path::new("config.yaml"))?;
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    // Parse YAML
    let config: AppConfig = serde_yaml::from_reader(reader).map_err(|e| {
        AppError::Config(format!(
            "YAML parse error in '{}': {}",
            path.display(),
            e
        ))
    })?;

    config.validate()?;

    Ok(config)
}

/// Load `path` if it exists, otherwise the built-in defaults.
///
/// Parse and validation errors are still returned; only a missing file
/// falls back.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        warn!(path = %path.display(), "Configuration file not found, using defaults");
        let config = AppConfig::default();
        config.validate()?;
        return Ok(config);
    }
    load_config(path)
}

/// Load configuration from a YAML string (useful for testing)
///
/// # Arguments
/// * `yaml_content` - YAML content as a string
///
/// # Returns
/// * `Ok(AppConfig)` - Successfully parsed and validated configuration
/// * `Err(AppError)` - Parse error or validation failure
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig> {
    let config: AppConfig = serde_yaml::from_str(yaml_content).map_err(|e| {
        AppError::Config(format!("YAML parse error: {}", e))
    })?;

    config.validate()?;

    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
