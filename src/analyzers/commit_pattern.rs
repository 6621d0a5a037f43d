//! Commit pattern analyzer
//!
//! Turns an ordered commit log into authorship-behavior signals.
//! Padded or machine-produced histories look different from organic
//! development: churn concentrated in one giant commit, templated
//! messages, commit bursts measured in seconds, and a missing tail of
//! fix/refactor commits that real iteration leaves behind.

use crate::analyzers::Analyzer;
use crate::config::Calibration;
use crate::error::AnalysisError;
use crate::models::{Commit, RepoSnapshot, Signal, SignalCategory};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Largest-commit share where suspicion starts ramping up
const SHARE_RAMP_LOW: f64 = 0.25;
/// Largest-commit share treated as maximal concentration
const SHARE_RAMP_HIGH: f64 = 0.85;

/// First lines shorter than this are low-information
const SHORT_MESSAGE_CHARS: usize = 10;

/// Inter-commit gap treated as part of a scripted burst
const BURST_GAP_SECS: i64 = 120;

/// Share of fix/refactor commits organic iteration tends to produce
const EXPECTED_ITERATIVE_SHARE: f64 = 0.2;
/// Churn below this with deletions present reads as an iterative edit
const SMALL_CHANGE_LINES: usize = 50;

/// Templated low-information message stems
const GENERIC_MESSAGE_STEMS: &[&str] = &[
    "update",
    "updates",
    "updated",
    "fix",
    "fixes",
    "fixed",
    "wip",
    "change",
    "changes",
    "minor",
    "misc",
    "stuff",
    "more",
    "final",
    "init",
    "initial commit",
    "first commit",
    "commit",
    "add files",
    "added files",
    "upload",
    "test",
    "tmp",
];

static ITERATIVE_RE: OnceLock<Regex> = OnceLock::new();

fn iterative_re() -> &'static Regex {
    ITERATIVE_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(fix|fixes|fixed|bug|refactor|clean|cleanup|rename|typo|revert|lint|polish|tweak|correct|repair|debug|oops)\b")
            .expect("valid regex")
    })
}

/// Extracts authorship-behavior signals from the commit log.
pub struct CommitPatternAnalyzer;

impl CommitPatternAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Fraction of total churn concentrated in the single largest commit,
    /// mapped through a fixed ramp.
    fn massive_commit_ratio(&self, commits: &[Commit], calibration: &Calibration) -> Signal {
        let weight = calibration.weights.massive_commit_ratio;
        let total: usize = commits.iter().map(Commit::lines_changed).sum();

        if total == 0 {
            return Signal::new(
                "massive_commit_ratio",
                SignalCategory::CommitPattern,
                0.0,
                weight,
                "no line-change data recorded in the history",
            );
        }

        let largest = commits
            .iter()
            .max_by_key(|c| c.lines_changed())
            .expect("non-empty commits");
        let share = largest.lines_changed() as f64 / total as f64;
        let value = (share - SHARE_RAMP_LOW) / (SHARE_RAMP_HIGH - SHARE_RAMP_LOW);

        Signal::new(
            "massive_commit_ratio",
            SignalCategory::CommitPattern,
            value,
            weight,
            format!(
                "largest commit {} carries {:.0}% of all line changes ({}/{} lines)",
                largest.id,
                share * 100.0,
                largest.lines_changed(),
                total
            ),
        )
    }

    /// Fraction of messages that are very short, templated, or duplicated
    /// verbatim across the history.
    fn message_low_information(&self, commits: &[Commit], calibration: &Calibration) -> Signal {
        let weight = calibration.weights.message_low_information;

        let mut seen: HashMap<String, usize> = HashMap::new();
        for commit in commits {
            *seen.entry(normalize_message(&commit.message)).or_insert(0) += 1;
        }

        let mut flagged = 0usize;
        for commit in commits {
            let normalized = normalize_message(&commit.message);
            let duplicated = seen.get(&normalized).copied().unwrap_or(0) > 1;
            if normalized.len() < SHORT_MESSAGE_CHARS || is_templated(&normalized) || duplicated {
                flagged += 1;
            }
        }

        let value = flagged as f64 / commits.len() as f64;
        Signal::new(
            "message_low_information",
            SignalCategory::CommitPattern,
            value,
            weight,
            format!(
                "{} of {} commit messages are short, templated, or duplicated",
                flagged,
                commits.len()
            ),
        )
    }

    /// Fraction of inter-commit gaps under the burst window. Needs at
    /// least three commits; fewer gaps carry no evidence either way.
    fn temporal_clustering(
        &self,
        commits: &[Commit],
        calibration: &Calibration,
    ) -> Option<Signal> {
        if commits.len() < 3 {
            debug!("temporal clustering skipped: {} commits", commits.len());
            return None;
        }

        let gaps = commits.len() - 1;
        let burst_gaps = commits
            .windows(2)
            .filter(|pair| {
                (pair[1].timestamp - pair[0].timestamp).num_seconds().abs() < BURST_GAP_SECS
            })
            .count();

        let value = burst_gaps as f64 / gaps as f64;
        Some(Signal::new(
            "temporal_clustering",
            SignalCategory::CommitPattern,
            value,
            calibration.weights.temporal_clustering,
            format!(
                "{} of {} inter-commit gaps are under {}s",
                burst_gaps, gaps, BURST_GAP_SECS
            ),
        ))
    }

    /// Suspicion grows as the share of fix/refactor-shaped commits falls
    /// below what organic iteration produces.
    fn fix_refactor_absence(&self, commits: &[Commit], calibration: &Calibration) -> Signal {
        let iterative = commits
            .iter()
            .filter(|c| {
                iterative_re().is_match(&c.message)
                    || (c.lines_removed > 0 && c.lines_changed() < SMALL_CHANGE_LINES)
            })
            .count();

        let share = iterative as f64 / commits.len() as f64;
        let value = 1.0 - (share / EXPECTED_ITERATIVE_SHARE).min(1.0);

        Signal::new(
            "fix_refactor_absence",
            SignalCategory::CommitPattern,
            value,
            calibration.weights.fix_refactor_absence,
            format!(
                "{} of {} commits look like fix/refactor iteration ({:.0}% vs ~{:.0}% expected)",
                iterative,
                commits.len(),
                share * 100.0,
                EXPECTED_ITERATIVE_SHARE * 100.0
            ),
        )
    }
}

impl Default for CommitPatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for CommitPatternAnalyzer {
    fn name(&self) -> &'static str {
        "CommitPatternAnalyzer"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::CommitPattern
    }

    fn analyze(
        &self,
        snapshot: &RepoSnapshot,
        calibration: &Calibration,
    ) -> Result<Vec<Signal>, AnalysisError> {
        let commits = &snapshot.commits;
        if commits.is_empty() {
            return Err(AnalysisError::DataUnavailable {
                domain: "commit history".to_string(),
            });
        }

        let mut signals = vec![
            self.massive_commit_ratio(commits, calibration),
            self.message_low_information(commits, calibration),
        ];
        if let Some(clustering) = self.temporal_clustering(commits, calibration) {
            signals.push(clustering);
        }
        signals.push(self.fix_refactor_absence(commits, calibration));

        Ok(signals)
    }
}

/// First line, trimmed and lowercased.
fn normalize_message(message: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .trim_end_matches(['.', '!'])
        .to_lowercase()
}

/// A message is templated when it is a bare generic stem or a generic
/// stem with at most two trailing words ("update readme", "fix stuff").
fn is_templated(normalized: &str) -> bool {
    if GENERIC_MESSAGE_STEMS.contains(&normalized) {
        return true;
    }
    let word_count = normalized.split_whitespace().count();
    word_count <= 3
        && GENERIC_MESSAGE_STEMS
            .iter()
            .any(|stem| normalized.starts_with(stem))
}
