//! Output reporters for Gitverity analysis results
//!
//! Supports multiple output formats:
//! - `text`: colored terminal summary (default)
//! - `markdown`: GitHub-flavored Markdown report
//! - `json`: the full Report, pretty-printed
//!
//! Reporters only format the finished Report; no scoring happens here.

pub mod json;
pub mod markdown;
pub mod text;

use crate::models::Report;
use anyhow::{bail, Result};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => bail!("unknown format '{}' (expected text, markdown, json)", other),
        }
    }
}

/// Render the report in the requested format.
pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => text::render(report),
        ReportFormat::Markdown => markdown::render(report),
        ReportFormat::Json => json::render(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(ReportFormat::parse("text").unwrap(), ReportFormat::Text);
        assert_eq!(ReportFormat::parse("md").unwrap(), ReportFormat::Markdown);
        assert_eq!(ReportFormat::parse("JSON").unwrap(), ReportFormat::Json);
        assert!(ReportFormat::parse("sarif").is_err());
    }
}
