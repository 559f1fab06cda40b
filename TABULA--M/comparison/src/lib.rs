#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Tabula comparison runtime: decides whether a question asks for a
//! side-by-side comparison and renders structured comparisons as themed HTML.

/// Error taxonomy for table construction and configuration.
#[path = "../error.rs"]
pub mod error;

/// Escaped-on-construction text fragments.
#[path = "../safe_text.rs"]
pub mod safe_text;

/// Comparison-question detection.
#[path = "../detector.rs"]
pub mod detector;

/// Coarse task-type labelling of questions.
#[path = "../task.rs"]
pub mod task;

/// Table data model and colour themes.
#[path = "../table.rs"]
pub mod table;

/// HTML markup generation.
#[path = "../render.rs"]
pub mod render;

/// Structured-data extraction from answer text.
#[path = "../extract.rs"]
pub mod extract;

/// Runtime configuration.
#[path = "../config.rs"]
pub mod config;

/// Telemetry handle for structured logs.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Detect, extract and render in one flow.
#[path = "../pipeline.rs"]
pub mod pipeline;

/// JSON-lines console protocol.
#[path = "../console.rs"]
pub mod console;

pub use config::TabulaConfig;
pub use detector::{detect, detected_keywords, ComparisonDetector, DetectionResult, DEFAULT_THRESHOLD};
pub use error::TabulaError;
pub use extract::{ComparisonExtractor, ExtractedTable, MarkdownTableExtractor, NullExtractor};
pub use pipeline::{FormattedAnswer, QueryBundle, QueryClassification, TablePipeline};
pub use render::{render_comparison_table, render_pros_cons_table};
pub use safe_text::SafeText;
pub use table::{ComparisonTable, ComparisonTableBuilder, Palette, ProsConsTable, Theme};
pub use task::{classify_task, TaskType};
pub use telemetry::{TabulaTelemetry, TabulaTelemetryBuilder};
