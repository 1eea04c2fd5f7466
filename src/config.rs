//! Configuration file handling.
//!
//! This module provides loading and saving of lockscan configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/lockscan/config.toml`
//! - macOS: `~/Library/Application Support/lockscan/config.toml`
//! - Windows: `%APPDATA%\lockscan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! org_name = "myorg"
//! internal_repo_host = "github.com"
//! default_format = "table"
//!
//! [ignore]
//! packages = ["left-pad@*", "@myorg/legacy*"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::validator::{ValidateOptions, DEFAULT_INTERNAL_HOST};

/// Application configuration.
///
/// Every field has a default, so a partial file (or no file at all) is valid.
///
/// # Example
///
/// ```no_run
/// use lockscan::Config;
///
/// let config = Config::load().unwrap();
///
/// println!("Internal host: {}", config.internal_repo_host);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Organization whose packages must come over `git+ssh`.
    ///
    /// Used when `--org` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,

    /// Host that internal packages live on.
    ///
    /// Default: "github.com"
    pub internal_repo_host: String,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json", "sarif"
    /// Default: "table"
    pub default_format: String,

    /// Ignore list configuration for suppressing accepted exceptions.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Packages excluded from validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Lockfile keys to skip: `name@version` for npm, the descriptor
    /// (`name@range`) for yarn.
    ///
    /// Supports glob patterns (e.g., "left-pad@*", "@types/*").
    pub packages: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored.
    pub fn should_ignore_package(&self, package: &str) -> bool {
        self.packages
            .iter()
            .any(|pattern| glob_match(pattern, package))
    }
}

/// Matches `text` against a pattern where `*` stands for any run of
/// characters. A pattern without `*` must match exactly.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut literals = pattern.split('*');

    let head = literals.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(head) else {
        return false;
    };

    let mut literals: Vec<&str> = literals.collect();
    let Some(tail) = literals.pop() else {
        return rest.is_empty();
    };

    // Leftmost match for each inner literal leaves the most room for the tail.
    for literal in literals {
        match rest.find(literal) {
            Some(pos) => rest = &rest[pos + literal.len()..],
            None => return false,
        }
    }

    rest.ends_with(tail)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            org_name: None,
            internal_repo_host: DEFAULT_INTERNAL_HOST.to_string(),
            default_format: "table".to_string(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, with the same fallback as
    /// [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use lockscan::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lockscan")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validator options derived from this configuration.
    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions::with_internal_host(self.internal_repo_host.clone())
    }
}
