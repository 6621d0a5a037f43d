//! Calibration configuration for Gitverity
//!
//! The calibration table is the only externally tunable surface of the
//! pipeline: per-signal weights, complexity composite weights, excerpt
//! truncation, LLM concurrency/timeout/retry budget, and the evidence
//! minimums that gate confidence. The algorithms themselves are fixed.
//!
//! A `Calibration` is immutable once constructed and passed by reference
//! into the pipeline, so concurrent analyses can run with different
//! tables (e.g. A/B-testing weights) without interference.
//!
//! # Configuration Format
//!
//! ```toml
//! # gitverity.toml
//!
//! [weights]
//! massive_commit_ratio = 0.9
//! llm_judgment = 0.8
//!
//! [llm]
//! max_judged_files = 8
//! concurrency = 4
//! timeout_secs = 60
//! retry_budget = 2
//!
//! [evidence]
//! min_history_commits = 5
//! min_corpus_files = 3
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Config file name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "gitverity.toml";

/// Per-signal weights, fixed per signal name for the lifetime of a run.
///
/// Weights are relative: the aggregator renormalizes by the sum of
/// weights actually present, so absolute magnitudes only matter against
/// each other.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalWeights {
    pub massive_commit_ratio: f64,
    pub message_low_information: f64,
    pub temporal_clustering: f64,
    pub fix_refactor_absence: f64,
    pub naming_genericity: f64,
    pub comment_redundancy: f64,
    pub formatting_uniformity: f64,
    pub llm_judgment: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            massive_commit_ratio: 0.9,
            message_low_information: 0.7,
            temporal_clustering: 0.6,
            fix_refactor_absence: 0.5,
            naming_genericity: 0.7,
            comment_redundancy: 0.5,
            formatting_uniformity: 0.4,
            llm_judgment: 0.8,
        }
    }
}

impl SignalWeights {
    /// Look up the weight for a signal name. Unknown names get a neutral
    /// mid weight so a renamed signal shows up loudly in review rather
    /// than silently vanishing from the mean.
    pub fn for_name(&self, name: &str) -> f64 {
        match name {
            "massive_commit_ratio" => self.massive_commit_ratio,
            "message_low_information" => self.message_low_information,
            "temporal_clustering" => self.temporal_clustering,
            "fix_refactor_absence" => self.fix_refactor_absence,
            "naming_genericity" => self.naming_genericity,
            "comment_redundancy" => self.comment_redundancy,
            "formatting_uniformity" => self.formatting_uniformity,
            "llm_judgment" => self.llm_judgment,
            other => {
                warn!("no calibrated weight for signal '{}', using 0.5", other);
                0.5
            }
        }
    }
}

/// LLM judgment adapter tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmSettings {
    /// Largest-first sample size for big repositories
    pub max_judged_files: usize,
    /// Excerpt truncation length in bytes
    pub excerpt_max_bytes: usize,
    /// Bounded worker pool size (external rate-limit backpressure)
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Retries after the first attempt, with exponential backoff
    pub retry_budget: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            max_judged_files: 8,
            excerpt_max_bytes: 6_000,
            concurrency: 4,
            timeout_secs: 60,
            retry_budget: 2,
        }
    }
}

/// Evidence-volume minimums that gate the confidence band.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvidenceMinimums {
    /// Below this many commits, confidence is capped at low
    pub min_history_commits: usize,
    /// Below this many sampled files, confidence is capped at low
    pub min_corpus_files: usize,
}

impl Default for EvidenceMinimums {
    fn default() -> Self {
        Self {
            min_history_commits: 5,
            min_corpus_files: 3,
        }
    }
}

/// Complexity composite weights. The composite is monotonic in each
/// input; buckets are fixed tenths of the [0,1] composite.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComplexityWeights {
    pub branching_density: f64,
    pub custom_code_share: f64,
    pub structural_breadth: f64,
    /// Cap on the style-genericity discount subtracted from the composite
    pub genericity_discount: f64,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            branching_density: 0.45,
            custom_code_share: 0.35,
            structural_breadth: 0.20,
            genericity_discount: 0.10,
        }
    }
}

/// The full calibration table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Calibration {
    pub weights: SignalWeights,
    pub llm: LlmSettings,
    pub evidence: EvidenceMinimums,
    pub complexity: ComplexityWeights,
    /// Category sub-scores further apart than this downgrade confidence
    pub disagreement_threshold: f64,
    /// Commit history cap for the local collector
    pub max_commits: usize,
    /// File sample cap for the local collector
    pub max_files: usize,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            llm: LlmSettings::default(),
            evidence: EvidenceMinimums::default(),
            complexity: ComplexityWeights::default(),
            disagreement_threshold: 0.4,
            max_commits: 500,
            max_files: 200,
        }
    }
}

impl Calibration {
    /// Parse a calibration table from TOML. Missing sections keep their
    /// shipped defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Load `gitverity.toml` from the repository root if present,
    /// otherwise return the shipped defaults. A malformed file is
    /// reported and ignored rather than failing the run.
    pub fn load(repo_path: &Path) -> Self {
        let config_path = repo_path.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            debug!("no {} found, using default calibration", CONFIG_FILE_NAME);
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(raw) => match Self::from_toml_str(&raw) {
                Ok(calibration) => {
                    debug!("loaded calibration from {:?}", config_path);
                    calibration
                }
                Err(e) => {
                    warn!("failed to parse {:?}: {}. Using defaults.", config_path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("failed to read {:?}: {}. Using defaults.", config_path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calibration() {
        let calibration = Calibration::default();
        assert!((calibration.weights.massive_commit_ratio - 0.9).abs() < f64::EPSILON);
        assert!((calibration.weights.llm_judgment - 0.8).abs() < f64::EPSILON);
        assert_eq!(calibration.llm.max_judged_files, 8);
        assert_eq!(calibration.evidence.min_history_commits, 5);
        assert!((calibration.disagreement_threshold - 0.4).abs() < f64::EPSILON);
        assert_eq!(calibration.max_commits, 500);
    }

    #[test]
    fn test_weight_lookup() {
        let weights = SignalWeights::default();
        assert!((weights.for_name("temporal_clustering") - 0.6).abs() < f64::EPSILON);
        assert!((weights.for_name("not_a_signal") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_override() {
        let raw = r#"
            disagreement_threshold = 0.3

            [weights]
            massive_commit_ratio = 0.95

            [llm]
            concurrency = 2
        "#;
        let calibration = Calibration::from_toml_str(raw).expect("valid toml");
        assert!((calibration.weights.massive_commit_ratio - 0.95).abs() < f64::EPSILON);
        // Untouched sections keep defaults
        assert!((calibration.weights.llm_judgment - 0.8).abs() < f64::EPSILON);
        assert_eq!(calibration.llm.concurrency, 2);
        assert_eq!(calibration.llm.max_judged_files, 8);
        assert!((calibration.disagreement_threshold - 0.3).abs() < f64::EPSILON);
        // Unset scalars fall back to shipped values
        assert_eq!(calibration.max_commits, 500);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let raw = r#"
            [weights]
            massive_comit_ratio = 0.9
        "#;
        assert!(Calibration::from_toml_str(raw).is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let calibration = Calibration::load(dir.path());
        assert_eq!(calibration.llm.retry_budget, 2);
    }
}
