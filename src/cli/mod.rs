//! CLI command definitions and handler

use crate::collect;
use crate::config::Calibration;
use crate::judgment::{Judge, LlmJudgmentAdapter};
use crate::models::Omission;
use crate::pipeline::Pipeline;
use crate::reporters::{self, ReportFormat};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

/// Gitverity - repository authenticity analysis
///
/// Scores how likely a repository's code is machine-generated, how
/// likely its history is padded, and how technically complex it is.
#[derive(Parser, Debug)]
#[command(name = "gitverity")]
#[command(
    version,
    about = "Repository authenticity analysis — score AI-generated code likelihood, resume padding, and technical complexity",
    after_help = "\
Examples:
  gitverity .                         Analyze current directory
  gitverity /path/to/repo -f json     JSON output for scripting
  gitverity . --no-llm                Heuristics only, no model calls
  gitverity . -f markdown -o report.md

Set ANTHROPIC_API_KEY, OPENAI_API_KEY, or OLLAMA_MODEL to enable the
model judgment signal. Without one, the run degrades gracefully."
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format: text, json, markdown (or md)
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
    pub format: String,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Skip the model judgment category entirely
    #[arg(long)]
    pub no_llm: bool,

    /// Calibration file (default: gitverity.toml in the repo root)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run an analysis end to end: collect, analyze, aggregate, render.
pub fn run(cli: Cli) -> Result<()> {
    let calibration = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read calibration file {:?}", path))?;
            Calibration::from_toml_str(&raw)
                .with_context(|| format!("invalid calibration file {:?}", path))?
        }
        None => Calibration::load(&cli.path),
    };

    let (snapshot, mut omissions) = collect::collect(&cli.path, &calibration)?;

    let adapter: Option<LlmJudgmentAdapter> = if cli.no_llm {
        info!("model judgment disabled via --no-llm");
        None
    } else {
        match LlmJudgmentAdapter::from_env(&calibration) {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                warn!("model judgment unavailable: {}", e);
                omissions.push(Omission::new("llm_judgment", e.to_string()));
                None
            }
        }
    };
    let judge = adapter.as_ref().map(|a| a as &dyn Judge);

    let report = Pipeline::new(&calibration)
        .run(&snapshot, judge, omissions)
        .context("analysis produced no usable evidence")?;

    let format = ReportFormat::parse(&cli.format)?;
    let rendered = reporters::render(&report, format)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("cannot write report to {:?}", path))?;
            info!("report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
