//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for hiring notes, pull request comments,
//! and documentation.

use crate::models::{Report, SignalCategory};
use anyhow::Result;
use chrono::Local;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &Report) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');
    md.push_str(&render_scorecard(report));
    md.push('\n');
    md.push_str(&render_flags(report));
    md.push('\n');
    md.push_str(&render_signals(report));
    md.push('\n');
    md.push_str(&render_omissions(report));
    md.push('\n');
    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(report: &Report) -> String {
    let verdict_emoji = match report.verdict() {
        "authentic" => "✅",
        "suspicious" => "⚠️",
        "likely padded" => "🚨",
        _ => "💀",
    };

    let owner_prefix = report
        .repository
        .owner
        .as_deref()
        .map(|owner| format!("{}/", owner))
        .unwrap_or_default();

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        r#"# {} Gitverity Authenticity Report

## Repository: {}{}

**Verdict: {}** | **Score: {:.1}/100** | **Confidence: {}**

Generated: {}
"#,
        verdict_emoji,
        owner_prefix,
        report.repository.name,
        report.verdict(),
        report.authenticity.score,
        report.authenticity.confidence,
        timestamp
    )
}

fn render_scorecard(report: &Report) -> String {
    let language = report
        .repository
        .primary_language
        .as_deref()
        .unwrap_or("unknown");

    format!(
        r#"## Scorecard

| Metric | Value |
|--------|-------|
| **Authenticity Score** | {:.1}/100 |
| **Risk Level** | {} |
| **Technical Complexity** | {}/10 |
| **Confidence** | {} |
| **Primary Language** | {} |
"#,
        report.authenticity.score,
        report.risk_level(),
        report.complexity.score,
        report.authenticity.confidence,
        language
    )
}

fn render_flags(report: &Report) -> String {
    let flags = &report.authenticity.flags;
    let mut section = format!("## 🚩 Flags ({})\n\n", flags.len());

    if flags.is_empty() {
        section.push_str("*No flags raised*\n");
        return section;
    }

    for (i, flag) in flags.iter().enumerate() {
        section.push_str(&format!("{}. **{}** — {}\n", i + 1, flag.name, flag.detail));
    }
    section
}

fn render_signals(report: &Report) -> String {
    let mut section = String::from(
        "## Contributing Signals\n\n| Signal | Category | Strength | Weight | Evidence |\n|--------|----------|----------|--------|----------|\n",
    );

    for signal in &report.signals {
        if signal.category == SignalCategory::ComplexityInput {
            continue;
        }
        section.push_str(&format!(
            "| `{}` | {} | {:.2} | {:.2} | {} |\n",
            signal.name, signal.category, signal.value, signal.weight, signal.rationale
        ));
    }

    let inputs: Vec<String> = report
        .complexity
        .contributing
        .iter()
        .map(|signal| format!("`{}` {:.2} ({})", signal.name, signal.value, signal.rationale))
        .collect();
    if !inputs.is_empty() {
        section.push_str("\n### Complexity Inputs\n\n");
        for input in inputs {
            section.push_str(&format!("- {}\n", input));
        }
    }

    section
}

fn render_omissions(report: &Report) -> String {
    if report.omissions.is_empty() {
        return String::new();
    }

    let mut section = String::from("## Omitted Evidence\n\n");
    for omission in &report.omissions {
        section.push_str(&format!("- `{}`: {}\n", omission.subject, omission.reason));
    }
    section
}

fn render_footer() -> String {
    "---\n\n*Generated by Gitverity — scores are probabilistic evidence, not proof.*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AuthenticityScore, ComplexityRating, Confidence, Flag, Omission, RepoMetadata, Signal,
    };

    fn report() -> Report {
        Report {
            repository: RepoMetadata {
                name: "demo".to_string(),
                owner: Some("acme".to_string()),
                primary_language: Some("python".to_string()),
            },
            authenticity: AuthenticityScore {
                score: 28.5,
                confidence: Confidence::Low,
                contributing: vec![],
                flags: vec![Flag::new("thin-history", "1 commit")],
            },
            complexity: ComplexityRating {
                score: 3,
                contributing: vec![Signal::new(
                    "branching_density",
                    SignalCategory::ComplexityInput,
                    0.3,
                    1.0,
                    "12 branches over 400 lines",
                )],
            },
            signals: vec![Signal::new(
                "massive_commit_ratio",
                SignalCategory::CommitPattern,
                1.0,
                0.9,
                "largest commit carries 100% of changes",
            )],
            omissions: vec![Omission::new("llm_judgment", "no API key configured")],
        }
    }

    #[test]
    fn test_markdown_sections_present() {
        let md = render(&report()).unwrap();
        assert!(md.contains("# 🚨 Gitverity Authenticity Report"));
        assert!(md.contains("acme/demo"));
        assert!(md.contains("28.5/100"));
        assert!(md.contains("3/10"));
        assert!(md.contains("thin-history"));
        assert!(md.contains("`massive_commit_ratio`"));
        assert!(md.contains("Complexity Inputs"));
        assert!(md.contains("Omitted Evidence"));
        assert!(md.contains("no API key configured"));
    }

    #[test]
    fn test_complexity_inputs_not_in_signal_table() {
        let md = render(&report()).unwrap();
        let table_section = md
            .split("### Complexity Inputs")
            .next()
            .unwrap();
        assert!(!table_section.contains("| `branching_density` |"));
    }
}
