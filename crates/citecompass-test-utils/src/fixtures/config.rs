//! Configuration builders and temporary config files for tests.

use std::path::{Path, PathBuf};

use citecompass_config::{CiteConfig, ReportFormat};
use tempfile::TempDir;

/// Fluent builder for [`CiteConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .keywords(&["bibliography"])
///     .include_imports(true)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: CiteConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CiteConfig::default(),
        }
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.config.extractor.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn include_imports(mut self, include: bool) -> Self {
        self.config.report.include_imports = include;
        self
    }

    pub fn format(mut self, format: ReportFormat) -> Self {
        self.config.report.format = format;
        self
    }

    pub fn show_urls(mut self, show: bool) -> Self {
        self.config.report.show_urls = show;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> CiteConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A config file in a temporary directory.
///
/// The directory is deleted when this value is dropped, even on panic.
pub struct TempConfig {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempConfig {
    /// Write `toml_content` to `citecompass.toml` in a new temp directory.
    pub fn with_toml(toml_content: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("citecompass.toml");
        std::fs::write(&path, toml_content).expect("failed to write test config");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with new content.
    pub fn write(&self, toml_content: &str) {
        std::fs::write(&self.path, toml_content).expect("failed to write updated config");
    }

    /// Load the file, panicking on any error.
    pub fn load(&self) -> CiteConfig {
        CiteConfig::load(&self.path).expect("failed to load test config")
    }
}
