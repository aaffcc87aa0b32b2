// SPDX-License-Identifier: MIT
//! Comparison rule configuration
//!
//! Loaded from environment variables or a TOML file. Unset values fall back
//! to the defaults; values that are set but unparseable are errors.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable selecting [`EditorNameMode`]
pub const ENV_EDITOR_NAME_MODE: &str = "BETH_EDITOR_NAME_MODE";

/// Environment variable toggling per-record mismatch logging
pub const ENV_LOG_MISMATCHES: &str = "BETH_LOG_MISMATCHES";

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// How editor-name fields of idle animations are case-folded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorNameMode {
    /// Each side is folded from its own bytes
    #[default]
    Independent,

    /// Both sides are folded from the current record's bytes. Reproduces the
    /// historical cleaner, which accepts any equal-length pair.
    MirrorCurrent,
}

impl EditorNameMode {
    pub fn name(&self) -> &'static str {
        match self {
            EditorNameMode::Independent => "independent",
            EditorNameMode::MirrorCurrent => "mirror-current",
        }
    }
}

impl FromStr for EditorNameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(EditorNameMode::Independent),
            "mirror-current" | "mirror_current" | "legacy" => Ok(EditorNameMode::MirrorCurrent),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_EDITOR_NAME_MODE,
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for [`RecordComparer`](crate::rules::RecordComparer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub editor_name_mode: EditorNameMode,

    /// Emit a `debug` event with the reason whenever records differ
    pub log_mismatches: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            editor_name_mode: EditorNameMode::Independent,
            log_mismatches: true,
        }
    }
}

impl RulesConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let editor_name_mode = match lookup(ENV_EDITOR_NAME_MODE) {
            Some(v) => v.parse()?,
            None => defaults.editor_name_mode,
        };

        let log_mismatches = match lookup(ENV_LOG_MISMATCHES) {
            Some(v) => parse_bool(ENV_LOG_MISMATCHES, &v)?,
            None => defaults.log_mismatches,
        };

        Ok(Self {
            editor_name_mode,
            log_mismatches,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn with_editor_name_mode(mut self, mode: EditorNameMode) -> Self {
        self.editor_name_mode = mode;
        self
    }

    pub fn with_log_mismatches(mut self, enabled: bool) -> Self {
        self.log_mismatches = enabled;
        self
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
