//! TOML-based application configuration.
//!
//! Stores the hosted-store endpoint and principal, plus the default path
//! for local task-list snapshots used by the CLI's `--file` mode.
//!
//! Configuration is stored at `~/.config/hearth/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Hosted document-store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store's REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Principal whose task lists the engine operates on.
    #[serde(default)]
    pub user_id: String,
}

/// Local snapshot settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Default JSON file for `--file` runs (absent means no default).
    #[serde(default)]
    pub file: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hearth/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

fn default_base_url() -> String {
    "https://store.hearth.app".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "store.base_url" => Some(self.store.base_url.clone()),
            "store.user_id" => Some(self.store.user_id.clone()),
            "local.file" => self.local.file.clone(),
            _ => None,
        }
    }

    /// Update a field by dot-separated key without persisting.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values the field rejects.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "store.base_url" => {
                url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
                self.store.base_url = value.to_string();
            }
            "store.user_id" => self.store.user_id = value.to_string(),
            "local.file" => self.local.file = Some(value.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Update a field by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value is rejected, or
    /// the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }
}
