//! HealthScan CLI
//!
//! Usage:
//!   healthscan analyze "I have a headache and feel tired"
//!   healthscan batch texts.json                 # JSON array of strings
//!   healthscan rows records.json --column notes # JSON array of objects
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use healthscan_core::analysis::{detect_text_column, TEXT_COLUMN_CANDIDATES};
use healthscan_core::fs_manager::PortablePathManager;
use healthscan_core::telemetry::init_tracing;
use healthscan_core::{AnalyzerConfig, AppError, HealthAnalyzer, ItemOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "healthscan",
    version,
    about = "Analyze free-text health concerns",
    long_about = "Classifies health concern descriptions into emergency status,\n\
                  health categories, sentiment, urgency level and advice.\n\n\
                  Configuration is read from HEALTHSCAN_* environment variables\n\
                  (a .env file in the working directory is honoured)."
)]
struct Args {
    /// Never load the ML sentiment model
    #[arg(long, global = true)]
    rule_based: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a single text
    Analyze {
        /// Text describing the health concern
        text: String,
    },
    /// Analyze a JSON array of texts
    Batch {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Analyze a JSON array of records
    Rows {
        /// Path to the JSON file
        file: PathBuf,

        /// Field holding the text (auto-detected when omitted)
        #[arg(short, long)]
        column: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = AnalyzerConfig::from_env().context("Invalid configuration")?;
    if args.rule_based {
        config.ml_enabled = false;
    }
    init_tracing("healthscan", config.log_format)?;

    if config.ml_enabled {
        PortablePathManager::init(&config.models_dir)
            .with_context(|| format!("Cannot create models directory {:?}", config.models_dir))?;
    }

    // Loading the embedding model is blocking work.
    let analyzer = Arc::new(tokio::task::spawn_blocking(move || HealthAnalyzer::new(config)).await??);
    info!(
        "Analyzer ready (lexicon v{}, ML sentiment available: {})",
        analyzer.lexicon().version,
        analyzer.ml_available()
    );

    let output = match args.command {
        Command::Analyze { text } => serde_json::to_value(analyzer.analyze_one(&text)?)?,
        Command::Batch { file } => {
            let texts: Vec<String> = read_json(&file)?;
            let outcomes = analyzer.analyze_batch_concurrent(texts).await?;
            batch_report(&analyzer, &outcomes)
        }
        Command::Rows { file, column } => {
            let records: Vec<serde_json::Map<String, Value>> = read_json(&file)?;
            let rows: Vec<HashMap<String, String>> = records.into_iter().map(to_row).collect();
            let column = match column.or_else(|| detect_text_column(&rows)) {
                Some(column) => column,
                None if rows.is_empty() => bail!("No rows in {:?}", file),
                None => {
                    return Err(AppError::Schema(format!(
                        "No text column found. Expected one of: {}",
                        TEXT_COLUMN_CANDIDATES.join(", ")
                    ))
                    .into())
                }
            };
            let outcomes = analyzer.analyze_rows(&rows, &column)?;
            let mut report = batch_report(&analyzer, &outcomes);
            report["text_column"] = json!(column);
            report
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Cannot read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {:?}", path))
}

/// Flattens a JSON record into text cells; `null` becomes an empty cell.
fn to_row(record: serde_json::Map<String, Value>) -> HashMap<String, String> {
    record
        .into_iter()
        .map(|(key, value)| {
            let cell = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, cell)
        })
        .collect()
}

fn batch_report(analyzer: &HealthAnalyzer, outcomes: &[ItemOutcome]) -> Value {
    json!({
        "results": outcomes,
        "summary": analyzer.summarize(outcomes),
        "ml_available": analyzer.ml_available(),
    })
}
