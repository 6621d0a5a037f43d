//! Core data models for Gitverity
//!
//! These models are used throughout the codebase for representing
//! repository evidence, extracted signals, and the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single commit in the analyzed history.
///
/// Immutable once collected; the collection layer delivers commits
/// ordered by timestamp, ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Commit id (short hash for local collection, opaque elsewhere)
    pub id: String,
    /// Author timestamp
    pub timestamp: DateTime<Utc>,
    /// Full commit message
    pub message: String,
    /// Total lines added
    pub lines_added: usize,
    /// Total lines removed
    pub lines_removed: usize,
    /// Paths touched in this commit
    pub files_touched: Vec<String>,
}

impl Commit {
    /// Total churn (added + removed) for this commit.
    pub fn lines_changed(&self) -> usize {
        self.lines_added + self.lines_removed
    }
}

/// Immutable snapshot of one tracked file at analysis time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSample {
    pub path: PathBuf,
    /// Detected language (extension-based), e.g. "python", "rust"
    pub language: String,
    pub content: String,
    /// Content size in bytes
    pub size: usize,
}

/// Repository-level metadata, used only for report labeling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoMetadata {
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub primary_language: Option<String>,
}

impl Default for RepoMetadata {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            owner: None,
            primary_language: None,
        }
    }
}

/// The inbound boundary: everything the pipeline consumes.
///
/// Produced by the bundled local collector or any external fetch layer
/// that yields the same shape.
#[derive(Debug, Clone, Default)]
pub struct RepoSnapshot {
    pub metadata: RepoMetadata,
    /// Ordered by timestamp, ascending
    pub commits: Vec<Commit>,
    pub files: Vec<FileSample>,
}

/// Evidence source category for a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    CommitPattern,
    Style,
    LlmJudgment,
    ComplexityInput,
}

impl SignalCategory {
    /// Categories that feed the authenticity score. `ComplexityInput`
    /// carries sophistication strength, not suspicion, and is consumed
    /// only by the complexity scorer.
    pub fn counts_toward_authenticity(&self) -> bool {
        !matches!(self, SignalCategory::ComplexityInput)
    }
}

impl std::fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalCategory::CommitPattern => write!(f, "commit_pattern"),
            SignalCategory::Style => write!(f, "style"),
            SignalCategory::LlmJudgment => write!(f, "llm_judgment"),
            SignalCategory::ComplexityInput => write!(f, "complexity_input"),
        }
    }
}

/// One bounded piece of evidence from a single analyzer.
///
/// A Signal is a pure data fact: value is normalized strength in [0,1]
/// (suspicion for authenticity categories, sophistication for
/// `complexity_input`), weight comes from the calibration table and is
/// fixed per signal name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub name: String,
    pub category: SignalCategory,
    /// Normalized strength, clamped to [0,1] at construction
    pub value: f64,
    /// Calibrated weight in (0,1], fixed per signal name
    pub weight: f64,
    /// Free-text evidence summary for the report
    pub rationale: String,
}

impl Signal {
    /// Create a signal, clamping value into [0,1].
    pub fn new(
        name: impl Into<String>,
        category: SignalCategory,
        value: f64,
        weight: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            value: value.clamp(0.0, 1.0),
            weight,
            rationale: rationale.into(),
        }
    }
}

/// Qualitative reliability band for a score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    /// One step down, saturating at Low.
    pub fn downgraded(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            _ => Confidence::Low,
        }
    }

    /// Never exceed `ceiling`.
    pub fn capped_at(self, ceiling: Confidence) -> Self {
        self.min(ceiling)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// A named indicator raised during aggregation, with a short detail line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flag {
    pub name: String,
    pub detail: String,
}

impl Flag {
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

/// Aggregate authenticity estimate.
///
/// 100 = strong evidence of organic, human-written work;
/// 0 = strong evidence of machine generation or padded history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticityScore {
    /// Score in [0,100]
    pub score: f64,
    pub confidence: Confidence,
    /// Signals that entered the weighted mean
    pub contributing: Vec<Signal>,
    pub flags: Vec<Flag>,
}

/// Technical complexity estimate on a fixed 1-10 scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplexityRating {
    /// Bucket in [1,10]
    pub score: u8,
    /// Signals that entered the composite
    pub contributing: Vec<Signal>,
}

/// A recorded analyzer or per-file omission. Omissions degrade
/// confidence; they never abort the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Omission {
    /// What was skipped, e.g. "commit_pattern" or a file path
    pub subject: String,
    pub reason: String,
}

impl Omission {
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

/// The finished analysis product, read-only once produced.
///
/// Carries no wall-clock timestamp: an identical signal set yields an
/// identical Report. Renderers stamp their own output if they need to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub repository: RepoMetadata,
    pub authenticity: AuthenticityScore,
    pub complexity: ComplexityRating,
    /// Every signal produced during the run, all categories
    pub signals: Vec<Signal>,
    pub omissions: Vec<Omission>,
}

impl Report {
    /// Presentation verdict bucket for the authenticity score.
    pub fn verdict(&self) -> &'static str {
        match self.authenticity.score {
            s if s >= 75.0 => "authentic",
            s if s >= 50.0 => "suspicious",
            s if s >= 25.0 => "likely padded",
            _ => "fabricated",
        }
    }

    /// Risk wording paired with the verdict bucket.
    pub fn risk_level(&self) -> &'static str {
        match self.authenticity.score {
            s if s >= 75.0 => "Low",
            s if s >= 50.0 => "Medium",
            s if s >= 25.0 => "High",
            _ => "Critical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_value_clamped() {
        let over = Signal::new("x", SignalCategory::Style, 1.7, 0.5, "");
        assert_eq!(over.value, 1.0);

        let under = Signal::new("x", SignalCategory::Style, -0.3, 0.5, "");
        assert_eq!(under.value, 0.0);

        let mid = Signal::new("x", SignalCategory::Style, 0.42, 0.5, "");
        assert!((mid.value - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        assert_eq!(Confidence::High.downgraded(), Confidence::Medium);
        assert_eq!(Confidence::Low.downgraded(), Confidence::Low);
        assert_eq!(
            Confidence::High.capped_at(Confidence::Medium),
            Confidence::Medium
        );
        assert_eq!(
            Confidence::Low.capped_at(Confidence::Medium),
            Confidence::Low
        );
    }

    #[test]
    fn test_category_authenticity_membership() {
        assert!(SignalCategory::CommitPattern.counts_toward_authenticity());
        assert!(SignalCategory::Style.counts_toward_authenticity());
        assert!(SignalCategory::LlmJudgment.counts_toward_authenticity());
        assert!(!SignalCategory::ComplexityInput.counts_toward_authenticity());
    }

    #[test]
    fn test_verdict_buckets() {
        let mut report = Report {
            repository: RepoMetadata::default(),
            authenticity: AuthenticityScore {
                score: 80.0,
                confidence: Confidence::High,
                contributing: vec![],
                flags: vec![],
            },
            complexity: ComplexityRating {
                score: 5,
                contributing: vec![],
            },
            signals: vec![],
            omissions: vec![],
        };
        assert_eq!(report.verdict(), "authentic");

        report.authenticity.score = 60.0;
        assert_eq!(report.verdict(), "suspicious");
        report.authenticity.score = 30.0;
        assert_eq!(report.verdict(), "likely padded");
        report.authenticity.score = 10.0;
        assert_eq!(report.verdict(), "fabricated");
        assert_eq!(report.risk_level(), "Critical");
    }
}
