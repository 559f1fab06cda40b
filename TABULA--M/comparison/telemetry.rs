use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord};

use crate::config::LoggingConfig;

/// Builder for [`TabulaTelemetry`].
pub struct TabulaTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
}

impl TabulaTelemetryBuilder {
    /// Creates the builder for a named component.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::Debug,
        }
    }

    /// Sets the JSON-lines log file.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Drops records below `level`.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Builds the handle, opening the log file if one was set.
    pub fn build(self) -> Result<TabulaTelemetry> {
        let logger = match self.log_path {
            Some(path) => Some(JsonLogger::with_min_level(path, self.min_level)?),
            None => None,
        };
        Ok(TabulaTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger,
            }),
        })
    }
}

/// Cloneable logging handle shared by detector, renderer and pipeline.
#[derive(Clone)]
pub struct TabulaTelemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
}

impl fmt::Debug for TabulaTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabulaTelemetry")
            .field("module", &self.inner.module)
            .field(
                "log_path",
                &self.inner.logger.as_ref().map(JsonLogger::path),
            )
            .finish()
    }
}

impl TabulaTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> TabulaTelemetryBuilder {
        TabulaTelemetryBuilder::new(module)
    }

    /// Builds a handle from configuration; `None` when no log path is set.
    pub fn from_config(module: impl Into<String>, config: &LoggingConfig) -> Result<Option<Self>> {
        config
            .path
            .as_ref()
            .map(|path| {
                Self::builder(module)
                    .log_path(path)
                    .min_level(config.level)
                    .build()
            })
            .transpose()
    }

    /// Writes one structured record. Object metadata becomes record fields.
    pub fn log(&self, level: LogLevel, message: &str, metadata: &Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let record = LogRecord::new(&self.inner.module, level, message).with_metadata(metadata);
            logger.log(&record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_filtered_records() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("tabula.log");
        let telemetry = TabulaTelemetry::builder("tabula")
            .log_path(&path)
            .min_level(LogLevel::Info)
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Debug, "tabula.detect.trace", &json!({}))
            .unwrap();
        telemetry
            .log(
                LogLevel::Info,
                "tabula.detect.completed",
                &json!({ "confidence": 0.9 }),
            )
            .unwrap();
        let records = shared_logging::read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].module, "tabula");
        assert_eq!(records[0].metadata["confidence"], 0.9);
    }

    #[test]
    fn config_without_path_disables_logging() {
        let telemetry = TabulaTelemetry::from_config("tabula", &LoggingConfig::default()).unwrap();
        assert!(telemetry.is_none());
    }

    #[test]
    fn debug_output_names_the_log_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("debug.log");
        let telemetry = TabulaTelemetry::builder("tabula")
            .log_path(&path)
            .build()
            .unwrap();
        let rendered = format!("{telemetry:?}");
        assert!(rendered.contains("debug.log"));
        assert!(format!("{:?}", TabulaTelemetry::builder("quiet").build().unwrap()).contains("None"));
    }
}
