use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;
use uuid::Uuid;

use crate::{
    config::TabulaConfig,
    detector::{ComparisonDetector, DetectionResult},
    extract::{ComparisonExtractor, MarkdownTableExtractor},
    render::{render_comparison_table, render_pros_cons_table},
    table::{ComparisonTable, ProsConsTable},
    task::{classify_task, TaskType},
    telemetry::TabulaTelemetry,
};

/// Answer cues suggesting a comparison even when no table could be lifted.
const COMPARISON_CUES: [&str; 6] = ["vs", "versus", "compared to", "difference", "same", "unlike"];

const TABLE_NOTE: &str = "💡 **Note:** This comparison answer contains information that could be displayed in a table format. For a quick side-by-side view, ask for the comparison as a table.";

/// Pre-flight answer for "should this query produce a table?".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryClassification {
    /// Question as submitted.
    pub query: String,
    /// Whether the detector cleared its threshold.
    pub should_generate_table: bool,
    /// Detector confidence.
    pub confidence: f32,
    /// Trigger phrases found, for diagnostics.
    pub detected_keywords: Vec<String>,
    /// Coarse task label.
    pub task_type: TaskType,
}

/// Answer text plus any rendered table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedAnswer {
    /// Answer text, possibly with a trailing note.
    pub content: String,
    /// Rendered table markup, stored alongside the answer.
    pub table_html: Option<String>,
    /// Detection outcome for the question.
    pub detection: DetectionResult,
    /// Whether the "could be a table" note was appended.
    pub note_appended: bool,
    /// Completion time.
    pub processed_at: DateTime<Utc>,
}

/// One question/answer pair queued for batch formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryBundle {
    /// Correlation id carried into logs.
    pub correlation_id: Uuid,
    /// User question.
    pub question: String,
    /// Model answer.
    pub answer: String,
}

impl QueryBundle {
    /// Creates a bundle with a fresh correlation id.
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Runs detection, extraction and rendering for submitted queries.
#[derive(Clone)]
pub struct TablePipeline {
    detector: ComparisonDetector,
    extractor: Arc<dyn ComparisonExtractor>,
    telemetry: Option<TabulaTelemetry>,
}

impl TablePipeline {
    /// Creates a pipeline from explicit parts.
    #[must_use]
    pub fn new(
        detector: ComparisonDetector,
        extractor: Arc<dyn ComparisonExtractor>,
        telemetry: Option<TabulaTelemetry>,
    ) -> Self {
        Self {
            detector,
            extractor,
            telemetry,
        }
    }

    /// Builds the default pipeline for a configuration: markdown extraction in
    /// the configured theme.
    pub fn from_config(config: &TabulaConfig, telemetry: Option<TabulaTelemetry>) -> Result<Self> {
        let detector = ComparisonDetector::new(config.threshold)?;
        Ok(Self::new(
            detector,
            Arc::new(MarkdownTableExtractor::new(config.theme)),
            telemetry,
        ))
    }

    /// Classifies a question before any model call is made.
    #[must_use]
    pub fn classify(&self, question: &str) -> QueryClassification {
        let detection = self.detector.detect(question);
        let task_type = classify_task(question);
        self.log(
            LogLevel::Info,
            "tabula.detect.completed",
            &json!({
                "is_comparison": detection.is_comparison,
                "confidence": detection.confidence,
                "keywords": detection.matched_phrases,
                "task_type": task_type.label(),
            }),
        );
        QueryClassification {
            query: question.to_string(),
            should_generate_table: detection.is_comparison,
            confidence: detection.confidence,
            detected_keywords: detection.matched_phrases,
            task_type,
        }
    }

    /// Formats a model answer for `question`, attaching a table when the
    /// question is a comparison and the extractor finds structured data.
    #[must_use]
    pub fn process(&self, question: &str, answer: &str) -> FormattedAnswer {
        let detection = self.detector.detect(question);
        if !detection.is_comparison {
            return FormattedAnswer {
                content: answer.to_string(),
                table_html: None,
                detection,
                note_appended: false,
                processed_at: Utc::now(),
            };
        }

        if let Some(table) = self.extractor.extract(question, answer) {
            let html = table.render();
            self.log(
                LogLevel::Info,
                "tabula.pipeline.table_generated",
                &json!({
                    "extractor": self.extractor.name(),
                    "kind": table.kind(),
                    "bytes": html.len(),
                }),
            );
            return FormattedAnswer {
                content: answer.to_string(),
                table_html: Some(html),
                detection,
                note_appended: false,
                processed_at: Utc::now(),
            };
        }

        let lower = answer.to_lowercase();
        let note_appended = COMPARISON_CUES.iter().any(|cue| lower.contains(cue));
        let content = if note_appended {
            format!("{}\n\n---\n\n{TABLE_NOTE}", answer.trim())
        } else {
            answer.to_string()
        };
        self.log(
            LogLevel::Debug,
            "tabula.pipeline.no_table",
            &json!({ "extractor": self.extractor.name(), "note_appended": note_appended }),
        );
        FormattedAnswer {
            content,
            table_html: None,
            detection,
            note_appended,
            processed_at: Utc::now(),
        }
    }

    /// Formats a batch on the blocking pool, preserving input order.
    pub async fn process_batch(&self, bundles: Vec<QueryBundle>) -> Result<Vec<FormattedAnswer>> {
        self.log(
            LogLevel::Info,
            "tabula.pipeline.batch_start",
            &json!({ "count": bundles.len() }),
        );
        let tasks: Vec<_> = bundles
            .into_iter()
            .map(|bundle| {
                let pipeline = self.clone();
                tokio::task::spawn_blocking(move || {
                    pipeline.log(
                        LogLevel::Debug,
                        "tabula.pipeline.request",
                        &json!({ "correlation_id": bundle.correlation_id }),
                    );
                    pipeline.process(&bundle.question, &bundle.answer)
                })
            })
            .collect();
        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await?);
        }
        self.log(
            LogLevel::Info,
            "tabula.pipeline.batch_complete",
            &json!({ "count": results.len() }),
        );
        Ok(results)
    }

    /// Renders a caller-supplied comparison table.
    #[must_use]
    pub fn render_comparison(&self, table: &ComparisonTable) -> String {
        let html = render_comparison_table(table);
        self.log(
            LogLevel::Info,
            "tabula.render.comparison",
            &json!({
                "items": table.items().len(),
                "attributes": table.attributes().len(),
                "theme": table.theme().name(),
            }),
        );
        html
    }

    /// Renders a caller-supplied pros/cons table.
    #[must_use]
    pub fn render_pros_cons(&self, table: &ProsConsTable) -> String {
        let html = render_pros_cons_table(table);
        self.log(
            LogLevel::Info,
            "tabula.render.pros_cons",
            &json!({ "rows": table.row_count(), "theme": table.theme.name() }),
        );
        html
    }

    fn log(&self, level: LogLevel, message: &str, metadata: &serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}

impl Default for TablePipeline {
    fn default() -> Self {
        Self::new(
            ComparisonDetector::default(),
            Arc::new(MarkdownTableExtractor::default()),
            None,
        )
    }
}
