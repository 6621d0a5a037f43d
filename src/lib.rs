//! Gitverity - repository authenticity analysis
//!
//! Ingests a repository's commit history and file contents and produces
//! a calibrated report: an authenticity score (how likely the code is
//! organic human work vs. machine-generated or padded), a confidence
//! band, and a 1-10 technical complexity rating.
//!
//! The core is a signal pipeline: heuristic analyzers turn raw evidence
//! into bounded signals, an LLM judgment adapter folds in one normalized
//! external opinion per sampled file, and a single aggregator combines
//! everything with a static calibration table.

pub mod analyzers;
pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod judgment;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;

pub use config::Calibration;
pub use error::AnalysisError;
pub use models::{Report, RepoSnapshot};
pub use pipeline::Pipeline;
