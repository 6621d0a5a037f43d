//! Text (terminal) reporter with colors and formatting

use crate::models::{Report, SignalCategory};
use anyhow::Result;
use console::style;
use std::fmt::Write;

/// Render a colored terminal summary.
pub fn render(report: &Report) -> Result<String> {
    let mut out = String::new();

    let score = report.authenticity.score;
    let styled_score = match score {
        s if s >= 75.0 => style(format!("{:.1}", s)).green().bold(),
        s if s >= 50.0 => style(format!("{:.1}", s)).yellow().bold(),
        s if s >= 25.0 => style(format!("{:.1}", s)).color256(208).bold(),
        _ => style(format!("{:.1}", score)).red().bold(),
    };

    writeln!(out, "{}", style("Gitverity Authenticity Report").bold())?;
    writeln!(
        out,
        "Repository: {}",
        style(&report.repository.name).cyan()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  Authenticity: {}/100  ({})",
        styled_score,
        report.verdict()
    )?;
    writeln!(
        out,
        "  Confidence:   {}",
        style(report.authenticity.confidence.to_string()).bold()
    )?;
    writeln!(out, "  Complexity:   {}/10", report.complexity.score)?;
    writeln!(out, "  Risk level:   {}", report.risk_level())?;

    if !report.authenticity.flags.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", style("Flags").bold())?;
        for flag in &report.authenticity.flags {
            writeln!(out, "  {} {}: {}", style("⚑").red(), flag.name, flag.detail)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", style("Signals").bold())?;
    for signal in &report.signals {
        if signal.category == SignalCategory::ComplexityInput {
            continue;
        }
        writeln!(
            out,
            "  {:<28} {:>5.2}  {}",
            signal.name,
            signal.value,
            style(&signal.rationale).dim()
        )?;
    }

    if !report.omissions.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", style("Omitted evidence").bold())?;
        for omission in &report.omissions {
            writeln!(
                out,
                "  {} {}: {}",
                style("-").dim(),
                omission.subject,
                style(&omission.reason).dim()
            )?;
        }
    }

    Ok(out)
}
