//! Configuration file support for rst2confluence CLI
//!
//! Loads settings from `_rst2confluence.toml` configuration file.

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_rst2confluence.toml";

/// Extension used for converted files when none is configured
pub const DEFAULT_EXTENSION: &str = "wiki";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Input discovery configuration
    #[serde(skip_serializing_if = "InputConfig::is_empty")]
    pub input: InputConfig,
    /// Output configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
}

/// Input discovery configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct InputConfig {
    /// Descend into subdirectories when the input is a directory (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

impl InputConfig {
    fn is_empty(&self) -> bool {
        self.recursive.is_none()
    }
}

/// Output configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// File extension for converted files, without the dot (default: "wiki")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Translate without writing any files (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.extension.is_none() && self.dry_run.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_rst2confluence.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with a schema comment
    pub fn to_toml_with_header(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!(
            "# rst2confluence configuration\n# JSON schema: rst2confluence init --schema\n\n{}",
            toml_content
        ))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            input: InputConfig {
                recursive: Some(false),
            },
            output: OutputConfig {
                extension: Some(DEFAULT_EXTENSION.to_string()),
                dry_run: Some(false),
            },
        }
    }
}
