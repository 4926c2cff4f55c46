#![deny(unsafe_code)]

//! Configuration loading and validation for citecompass.
//!
//! Loads TOML configuration files and validates them. [`CiteConfig`] is the
//! central configuration structure: it selects the docstring keywords the
//! citation extractor looks for, how reports are rendered, and the default
//! log level.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiteConfig {
    /// Docstring extraction settings.
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Citation report rendering.
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Keywords recognized as citation section headers in docstrings.
///
/// ## TOML Example
///
/// ```toml
/// [extractor]
/// keywords = ["citation", "citations", "reference", "references", "acknowledgements"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Case-insensitive section keywords.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
        }
    }
}

/// The keywords used when nothing else is configured.
pub fn default_keywords() -> Vec<String> {
    ["citation", "citations", "reference", "references"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Output format for citation reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One `identity: citation` line per entry under a heading.
    #[default]
    Text,
    /// A JSON document with `all`, `used` and `imports` arrays.
    Json,
}

/// How citation reports are rendered.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Whether module import markers appear in the citation lists.
    #[serde(default)]
    pub include_imports: bool,

    /// Report format: "text" or "json".
    #[serde(default)]
    pub format: ReportFormat,

    /// Whether URLs found in citation text are listed under each entry
    /// (text format only).
    #[serde(default)]
    pub show_urls: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CiteConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded citation config");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: CiteConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extractor.keywords.is_empty() {
            return Err(ConfigError::Validation(
                "extractor.keywords must not be empty".to_string(),
            ));
        }
        for (i, keyword) in self.extractor.keywords.iter().enumerate() {
            if keyword.is_empty() || !keyword.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::Validation(format!(
                    "extractor.keywords[{i}] must be a non-empty ASCII word, got {keyword:?}"
                )));
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
