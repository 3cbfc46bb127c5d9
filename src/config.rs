//! Rule catalog configuration.
//!
//! The rule catalog lives in process memory; this module is the optional
//! collaborator that seeds it from a TOML file. Custom categories are
//! appended to (or replace same-named entries of) a built-in profile.
//!
//! # Configuration File Format
//!
//! ```toml
//! profile = "standard"   # or "downloads"
//! mode = "full"          # or "extension-only"
//!
//! [[categories]]
//! name = "Datasets"
//! extensions = ["csv", "parquet"]
//! patterns = ["^dataset_"]
//! ```

use crate::classifier::ClassifyMode;
use crate::rules::{Category, Profile, RuleCatalog, RuleError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid regex pattern with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// A category definition was rejected by the rule store.
    InvalidCategory(RuleError),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::InvalidCategory(err) => write!(f, "Invalid category: {}", err),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Rule catalog configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Built-in profile to start from.
    #[serde(default)]
    pub profile: ConfigProfile,

    /// Fallback chain to run per file.
    #[serde(default)]
    pub mode: ConfigMode,

    /// Custom categories, appended in file order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Built-in profile names accepted in configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigProfile {
    #[default]
    Standard,
    Downloads,
}

impl From<ConfigProfile> for Profile {
    fn from(profile: ConfigProfile) -> Self {
        match profile {
            ConfigProfile::Standard => Profile::Standard,
            ConfigProfile::Downloads => Profile::Downloads,
        }
    }
}

/// Classification mode names accepted in configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigMode {
    #[default]
    Full,
    ExtensionOnly,
}

impl From<ConfigMode> for ClassifyMode {
    fn from(mode: ConfigMode) -> Self {
        match mode {
            ConfigMode::Full => ClassifyMode::Full,
            ConfigMode::ExtensionOnly => ClassifyMode::ExtensionOnly,
        }
    }
}

/// A single custom category definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,

    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against lower-cased file names.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl RulesConfig {
    /// Load configuration, with fallback to defaults.
    ///
    /// Attempts to load in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. `.sortdirrc.toml` in the current directory
    /// 3. `~/.config/sortdir/config.toml`
    /// 4. Default configuration (standard profile, no custom categories)
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".sortdirrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortdir")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// The classification mode this configuration selects.
    pub fn classify_mode(&self) -> ClassifyMode {
        self.mode.into()
    }

    /// Builds the rule catalog: the chosen built-in profile plus the custom
    /// categories, with all regex patterns compiled and validated.
    ///
    /// # Errors
    ///
    /// Returns an error if a category definition is invalid or any regex
    /// pattern fails to compile.
    pub fn build_catalog(&self) -> Result<RuleCatalog, ConfigError> {
        let mut catalog = RuleCatalog::builtin(self.profile.into());

        for entry in &self.categories {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::InvalidCategory(RuleError::EmptyCategoryName));
            }
            if entry.extensions.is_empty() && entry.patterns.is_empty() {
                return Err(ConfigError::InvalidCategory(RuleError::EmptyExtensionList {
                    name: entry.name.clone(),
                }));
            }

            let mut category = Category::new(&entry.name, &entry.extensions);
            category.patterns = entry
                .patterns
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            catalog.insert(category);
        }

        Ok(catalog)
    }
}
