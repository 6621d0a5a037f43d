//! JSON reporter
//!
//! Outputs the full Report as pretty-printed JSON, with the verdict and
//! risk wording attached for downstream consumers that do not want to
//! re-derive the buckets.

use crate::models::Report;
use anyhow::Result;
use serde_json::json;

/// Render the report as pretty-printed JSON.
pub fn render(report: &Report) -> Result<String> {
    let value = json!({
        "verdict": report.verdict(),
        "risk_level": report.risk_level(),
        "report": report,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
