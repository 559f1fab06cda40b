//! JSON-lines command loop used by hosting applications.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    pipeline::{FormattedAnswer, QueryClassification, TablePipeline},
    table::{ComparisonTable, ComparisonTableInput, ProsConsTable},
    telemetry::TabulaTelemetry,
};

/// Commands accepted on the console, one JSON object per line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleCommand {
    /// Classify a question.
    Detect {
        /// Question text.
        query: String,
    },
    /// Render an item-by-attribute table.
    RenderComparison {
        /// Table document.
        table: ComparisonTableInput,
    },
    /// Render a pros/cons table.
    RenderProsCons {
        /// Table document.
        table: ProsConsTable,
    },
    /// Format a model answer for a question.
    Format {
        /// User question.
        question: String,
        /// Model answer.
        answer: String,
    },
    /// Stop the loop.
    Quit,
}

/// One response line per command.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleResponse {
    /// Result of `detect`.
    Classification(QueryClassification),
    /// Result of either render command.
    Html {
        /// Rendered markup.
        html: String,
    },
    /// Result of `format`.
    Formatted(FormattedAnswer),
    /// The line could not be handled.
    Error {
        /// Human readable reason.
        message: String,
    },
}

/// Reads commands, answers each on the writer, until `quit` or EOF.
pub struct ConsoleSession {
    pipeline: TablePipeline,
    telemetry: Option<TabulaTelemetry>,
}

impl ConsoleSession {
    /// Creates a session over a pipeline.
    #[must_use]
    pub fn new(pipeline: TablePipeline, telemetry: Option<TabulaTelemetry>) -> Self {
        Self {
            pipeline,
            telemetry,
        }
    }

    /// Runs the loop and returns how many commands were answered.
    ///
    /// Malformed lines produce an `error` response and do not stop the loop.
    pub async fn run<R, W>(&self, reader: R, writer: &mut W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut handled = 0usize;
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<ConsoleCommand>(&line) {
                Ok(ConsoleCommand::Quit) => break,
                Ok(command) => self.handle(command),
                Err(err) => ConsoleResponse::Error {
                    message: format!("invalid console command JSON: {err}"),
                },
            };
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
            handled += 1;
        }
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "tabula.console.shutdown",
                &json!({ "handled": handled }),
            );
        }
        Ok(handled)
    }

    /// Handles a single command.
    #[must_use]
    pub fn handle(&self, command: ConsoleCommand) -> ConsoleResponse {
        match command {
            ConsoleCommand::Detect { query } => {
                ConsoleResponse::Classification(self.pipeline.classify(&query))
            }
            ConsoleCommand::RenderComparison { table } => match ComparisonTable::try_from(table) {
                Ok(table) => ConsoleResponse::Html {
                    html: self.pipeline.render_comparison(&table),
                },
                Err(err) => ConsoleResponse::Error {
                    message: err.to_string(),
                },
            },
            ConsoleCommand::RenderProsCons { table } => ConsoleResponse::Html {
                html: self.pipeline.render_pros_cons(&table),
            },
            ConsoleCommand::Format { question, answer } => {
                ConsoleResponse::Formatted(self.pipeline.process(&question, &answer))
            }
            ConsoleCommand::Quit => ConsoleResponse::Error {
                message: "quit is handled by the session loop".into(),
            },
        }
    }
}
