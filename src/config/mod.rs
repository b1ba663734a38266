//! Configuration module for scanner settings and YAML loading
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `BoardConfig`, `ArbitrageConfig`, ...)
//! - YAML loading functionality (`load_config`, `load_config_or_default`)
//! - Environment overrides (`constants`)
//! - Logging initialization (`logging`)

pub mod constants;
pub mod logging;
mod loader;
mod types;

// Re-export types
pub use types::{
    AppConfig, ArbitrageConfig, BoardConfig, HttpConfig, ServerConfig, SharedConfig,
};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str, load_config_or_default};
