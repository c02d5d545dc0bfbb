//! Configuration management with layered hierarchy
//!
//! Defaults, then the user config file, then environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// BFT configuration
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format used when `--format auto` is in effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Ask before deleting a factory in an interactive session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_delete: Option<bool>,
}

/// Valid configuration keys with their descriptions
pub const VALID_KEYS: &[(&str, &str)] = &[
    (
        "default_format",
        "Output format when --format is auto (tsv, json, yaml, csv, md)",
    ),
    (
        "confirm_delete",
        "Ask for confirmation before removing a factory in `bft session` (true/false)",
    ),
];

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::global_config_path() {
            if let Some(file_config) = Self::read_file(&path) {
                config.merge(file_config);
            }
        }

        if let Ok(format) = std::env::var("BFT_FORMAT") {
            if !format.trim().is_empty() {
                config.default_format = Some(format.trim().to_string());
            }
        }

        config
    }

    /// Read one config file; unreadable or malformed files are skipped
    pub fn read_file(path: &std::path::Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Directory holding the user config file
    ///
    /// `BFT_CONFIG_DIR` overrides the platform default.
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("BFT_CONFIG_DIR") {
            if !dir.is_empty() {
                return Some(PathBuf::from(dir));
            }
        }
        directories::ProjectDirs::from("", "", "bft").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Path to the user config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.confirm_delete.is_some() {
            self.confirm_delete = other.confirm_delete;
        }
    }

    /// Whether to confirm before deleting (defaults to yes)
    pub fn confirm_delete(&self) -> bool {
        self.confirm_delete.unwrap_or(true)
    }

    /// Current value of a key as display text
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_format" => self.default_format.clone(),
            "confirm_delete" => self.confirm_delete.map(|b| b.to_string()),
            _ => None,
        }
    }

    /// Set a key from text, validating the value
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "default_format" => {
                self.default_format = Some(value.trim().to_lowercase());
                Ok(())
            }
            "confirm_delete" => {
                let parsed = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => return Err(format!("'{}' is not a boolean (use true or false)", other)),
                };
                self.confirm_delete = Some(parsed);
                Ok(())
            }
            _ => Err(format!("Unknown configuration key '{}'", key)),
        }
    }

    /// Remove a key so lower-priority layers apply again
    pub fn unset(&mut self, key: &str) -> Result<(), String> {
        match key {
            "default_format" => self.default_format = None,
            "confirm_delete" => self.confirm_delete = None,
            _ => return Err(format!("Unknown configuration key '{}'", key)),
        }
        Ok(())
    }
}
