mod config;

pub use config::{Config, LocalConfig, StoreConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/hearth[-dev]/` based on HEARTH_ENV.
///
/// Set HEARTH_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HEARTH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hearth-dev")
    } else {
        base_dir.join("hearth")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
