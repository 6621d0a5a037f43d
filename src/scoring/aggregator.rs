//! Signal aggregator
//!
//! The only component that sees every signal source. Runs single-threaded
//! over the complete, already-collected signal set and produces the
//! Report exactly once. Conflicting signals are never resolved by
//! overriding one with the other: both stay visible in the contributing
//! list and the conflict costs confidence instead.

use crate::config::Calibration;
use crate::error::AnalysisError;
use crate::models::{
    AuthenticityScore, Confidence, Flag, Omission, RepoMetadata, Report, Signal, SignalCategory,
};
use crate::scoring::ComplexityScorer;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Massive-commit signal value at which the named flag is raised
/// (corresponds to the largest commit carrying ~70% of all changes).
const MASSIVE_COMMIT_FLAG_VALUE: f64 = 0.75;
/// Temporal clustering value treated as a scripted burst
const BURST_FLAG_VALUE: f64 = 0.8;

/// Evidence volume facts the confidence band depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvidenceVolume {
    pub commit_count: usize,
    pub file_count: usize,
    /// Judgment calls dispatched (not necessarily succeeded)
    pub judgments_attempted: usize,
}

/// Combines all signals into the final report.
pub struct Aggregator<'a> {
    calibration: &'a Calibration,
}

impl<'a> Aggregator<'a> {
    pub fn new(calibration: &'a Calibration) -> Self {
        Self { calibration }
    }

    /// Produce the Report, or `NoSignals` when no authenticity category
    /// yielded evidence. Deterministic: identical inputs, identical
    /// Report.
    pub fn aggregate(
        &self,
        repository: RepoMetadata,
        mut signals: Vec<Signal>,
        omissions: Vec<Omission>,
        evidence: EvidenceVolume,
    ) -> Result<Report, AnalysisError> {
        // Stable order regardless of analyzer scheduling
        signals.sort_by(|a, b| {
            a.category
                .to_string()
                .cmp(&b.category.to_string())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.rationale.cmp(&b.rationale))
        });

        let contributing: Vec<Signal> = signals
            .iter()
            .filter(|s| s.category.counts_toward_authenticity())
            .cloned()
            .collect();
        if contributing.is_empty() {
            return Err(AnalysisError::NoSignals);
        }

        let suspicion = weighted_suspicion(&contributing);
        let score = round1((100.0 * (1.0 - suspicion)).clamp(0.0, 100.0));

        let category_means = category_means(&contributing);
        let disagreement = disagreement_span(&category_means);
        let disagrees = disagreement > self.calibration.disagreement_threshold;

        let confidence = self.confidence_band(&category_means, evidence, disagrees);
        let flags = self.derive_flags(&contributing, evidence, disagrees, &category_means);

        let complexity = ComplexityScorer::new(self.calibration).rate(&signals);

        info!(
            "aggregated {} signals into score {:.1} ({} confidence), complexity {}",
            signals.len(),
            score,
            confidence,
            complexity.score
        );

        Ok(Report {
            repository,
            authenticity: AuthenticityScore {
                score,
                confidence,
                contributing,
                flags,
            },
            complexity,
            signals,
            omissions,
        })
    }

    /// Coverage sets the base, disagreement costs a step, thin evidence
    /// and a silent model cap the ceiling. Caps apply last so a flashy
    /// score on thin history can never read as reliable.
    fn confidence_band(
        &self,
        category_means: &BTreeMap<String, f64>,
        evidence: EvidenceVolume,
        disagrees: bool,
    ) -> Confidence {
        let mut confidence = match category_means.len() {
            n if n >= 3 => Confidence::High,
            2 => Confidence::Medium,
            _ => Confidence::Low,
        };

        if disagrees {
            confidence = confidence.downgraded();
        }

        if !category_means.contains_key(&SignalCategory::LlmJudgment.to_string()) {
            confidence = confidence.capped_at(Confidence::Medium);
        }

        let minimums = &self.calibration.evidence;
        if evidence.commit_count < minimums.min_history_commits
            || evidence.file_count < minimums.min_corpus_files
        {
            confidence = confidence.capped_at(Confidence::Low);
        }

        confidence
    }

    fn derive_flags(
        &self,
        contributing: &[Signal],
        evidence: EvidenceVolume,
        disagrees: bool,
        category_means: &BTreeMap<String, f64>,
    ) -> Vec<Flag> {
        let mut flags = Vec::new();

        if let Some(massive) = contributing
            .iter()
            .find(|s| s.name == "massive_commit_ratio" && s.value >= MASSIVE_COMMIT_FLAG_VALUE)
        {
            flags.push(Flag::new("single-massive-commit", massive.rationale.clone()));
        }

        if evidence.commit_count < self.calibration.evidence.min_history_commits {
            flags.push(Flag::new(
                "thin-history",
                format!(
                    "{} commits is below the {} needed for a confident read",
                    evidence.commit_count, self.calibration.evidence.min_history_commits
                ),
            ));
        }

        if let Some(burst) = contributing
            .iter()
            .find(|s| s.name == "temporal_clustering" && s.value > BURST_FLAG_VALUE)
        {
            flags.push(Flag::new("burst-history", burst.rationale.clone()));
        }

        let llm_present = contributing
            .iter()
            .any(|s| s.category == SignalCategory::LlmJudgment);
        if evidence.judgments_attempted > 0 && !llm_present {
            flags.push(Flag::new(
                "judgment-unavailable",
                format!(
                    "all {} model judgment calls failed or were unparseable",
                    evidence.judgments_attempted
                ),
            ));
        }

        if disagrees {
            let spread: Vec<String> = category_means
                .iter()
                .map(|(category, mean)| format!("{} {:.2}", category, mean))
                .collect();
            flags.push(Flag::new(
                "signal-disagreement",
                format!("category suspicion means diverge: {}", spread.join(", ")),
            ));
        }

        debug!("raised {} flags", flags.len());
        flags
    }
}

/// Weighted mean suspicion over the signals present, renormalized by the
/// weights actually present.
fn weighted_suspicion(signals: &[Signal]) -> f64 {
    let weight_sum: f64 = signals.iter().map(|s| s.weight).sum();
    if weight_sum <= 0.0 {
        return 0.0;
    }
    signals.iter().map(|s| s.value * s.weight).sum::<f64>() / weight_sum
}

/// Unweighted mean suspicion per category present, keyed by category name
/// (BTreeMap for deterministic iteration).
fn category_means(signals: &[Signal]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for signal in signals {
        let entry = sums.entry(signal.category.to_string()).or_insert((0.0, 0));
        entry.0 += signal.value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(category, (sum, count))| (category, sum / count as f64))
        .collect()
}

/// Largest pairwise gap between category means; 0 with fewer than two.
fn disagreement_span(means: &BTreeMap<String, f64>) -> f64 {
    if means.len() < 2 {
        return 0.0;
    }
    let max = means.values().cloned().fold(f64::MIN, f64::max);
    let min = means.values().cloned().fold(f64::MAX, f64::min);
    max - min
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
