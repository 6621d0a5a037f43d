//! Gitverity - repository authenticity analysis CLI
//!
//! Scores how likely a repository's code is machine-generated, how
//! likely its contribution history is padded, and how technically
//! complex the work is.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = gitverity::cli::Cli::parse();
    gitverity::cli::run(cli)
}
