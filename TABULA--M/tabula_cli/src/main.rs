use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use shared_logging::LogLevel;
use tabula_comparison::{
    console::ConsoleSession, table::ComparisonTableInput, ComparisonTable, ProsConsTable,
    TablePipeline, TabulaConfig, TabulaTelemetry, Theme,
};
use tokio::{io::BufReader, runtime::Runtime};

#[derive(Parser, Debug)]
#[command(
    name = "tabula",
    version,
    about = "Comparison-question detection and HTML table rendering"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON-lines log file, overriding the configuration.
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classifies a question and prints the result as JSON.
    Detect {
        query: String,
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Renders a JSON table document to HTML.
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = TableKind::Comparison)]
        kind: TableKind,
        /// Overrides the document's theme (beige, green, blue).
        #[arg(long)]
        theme: Option<String>,
    },
    /// Formats a model answer for a question and prints the result as JSON.
    Format {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer_file: PathBuf,
    },
    /// Serves JSON-lines commands on stdin/stdout.
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableKind {
    Comparison,
    ProsCons,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref(), cli.log)?;
    match cli.command {
        Commands::Detect { query, threshold } => {
            if let Some(threshold) = threshold {
                config.threshold = threshold;
                config.validate()?;
            }
            let pipeline = build_pipeline(&config)?;
            let classification = pipeline.classify(&query);
            println!("{}", serde_json::to_string_pretty(&classification)?);
            Ok(())
        }
        Commands::Render { input, kind, theme } => {
            let pipeline = build_pipeline(&config)?;
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading table document {}", input.display()))?;
            let html = render_document(&pipeline, &raw, kind, theme.as_deref())
                .with_context(|| format!("rendering {}", input.display()))?;
            println!("{html}");
            Ok(())
        }
        Commands::Format {
            question,
            answer_file,
        } => {
            let pipeline = build_pipeline(&config)?;
            let answer = fs::read_to_string(&answer_file)
                .with_context(|| format!("reading answer {}", answer_file.display()))?;
            let formatted = pipeline.process(&question, &answer);
            println!("{}", serde_json::to_string_pretty(&formatted)?);
            Ok(())
        }
        Commands::Console => {
            let telemetry = TabulaTelemetry::from_config("tabula.console", &config.logging)?;
            let pipeline = build_pipeline(&config)?;
            let session = ConsoleSession::new(pipeline, telemetry);
            let runtime = Runtime::new()?;
            runtime.block_on(async {
                let reader = BufReader::new(tokio::io::stdin());
                let mut writer = tokio::io::stdout();
                session.run(reader, &mut writer).await
            })?;
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, log_override: Option<PathBuf>) -> Result<TabulaConfig> {
    let mut config = match path {
        Some(path) => TabulaConfig::load(path)?,
        None => TabulaConfig::default(),
    };
    if let Some(log) = log_override {
        config.logging.path = Some(log);
    }
    Ok(config)
}

fn build_pipeline(config: &TabulaConfig) -> Result<TablePipeline> {
    let telemetry = TabulaTelemetry::from_config("tabula", &config.logging)?;
    if let Some(tel) = &telemetry {
        let _ = tel.log(
            LogLevel::Debug,
            "tabula.cli.start",
            &json!({ "threshold": config.threshold, "theme": config.theme.name() }),
        );
    }
    TablePipeline::from_config(config, telemetry)
}

fn render_document(
    pipeline: &TablePipeline,
    raw: &str,
    kind: TableKind,
    theme: Option<&str>,
) -> Result<String> {
    let theme = theme.map(Theme::from_name);
    match kind {
        TableKind::Comparison => {
            let input: ComparisonTableInput =
                serde_json::from_str(raw).context("invalid comparison table JSON")?;
            let mut table = ComparisonTable::try_from(input)?;
            if let Some(theme) = theme {
                table = table.with_theme(theme);
            }
            Ok(pipeline.render_comparison(&table))
        }
        TableKind::ProsCons => {
            let mut table: ProsConsTable =
                serde_json::from_str(raw).context("invalid pros/cons table JSON")?;
            if let Some(theme) = theme {
                table = table.with_theme(theme);
            }
            Ok(pipeline.render_pros_cons(&table))
        }
    }
}
