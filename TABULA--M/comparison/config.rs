use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shared_logging::LogLevel;

use crate::{detector::DEFAULT_THRESHOLD, table::Theme};

/// Runtime settings, usually read from `tabula.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabulaConfig {
    /// Confidence needed before a question counts as a comparison.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Palette for rendered tables.
    #[serde(default)]
    pub theme: Theme,
    /// Settings for the JSON-lines log.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log file; logging is disabled when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Records below this level are dropped.
    #[serde(default = "default_level")]
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            path: None,
            level: default_level(),
        }
    }
}

impl Default for TabulaConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            theme: Theme::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TabulaConfig {
    /// Loads and validates a TOML file. A relative log path resolves against
    /// the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading tabula config {}", path.display()))?;
        let mut config =
            Self::from_toml(&raw).with_context(|| format!("parsing {}", path.display()))?;
        let source_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if let Some(log_path) = config.logging.path.as_mut() {
            if log_path.is_relative() {
                *log_path = source_dir.join(&*log_path);
            }
        }
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            bail!(
                "threshold must be between 0 and 1, got {}",
                self.threshold
            );
        }
        Ok(())
    }
}

const fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

const fn default_level() -> LogLevel {
    LogLevel::Info
}
