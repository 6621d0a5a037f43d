//! Base analyzer trait and parallel runner
//!
//! This module defines the core abstractions for signal extraction:
//! - `Analyzer` trait that all heuristic analyzers implement
//! - `AnalyzerOutcome` for capturing per-analyzer results
//! - `run_all` which executes registered analyzers in parallel
//!
//! Analyzers are mutually unaware: each consumes the read-only snapshot
//! and produces an independent signal set. Failures are captured per
//! analyzer and merged as omissions, never allowed to abort the run.

pub mod code_style;
pub mod commit_pattern;
pub mod structure;

use crate::config::Calibration;
use crate::error::AnalysisError;
use crate::models::{Omission, RepoSnapshot, Signal, SignalCategory};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

pub use code_style::CodeStyleAnalyzer;
pub use commit_pattern::CommitPatternAnalyzer;
pub use structure::StructureAnalyzer;

/// Trait for all heuristic signal analyzers.
///
/// Implementations read the snapshot and return bounded signals with
/// rationales. `DataUnavailable` means the snapshot carries no evidence
/// for this category; the runner records it as an omission.
pub trait Analyzer: Send + Sync {
    /// Unique identifier, used in logs and omission records
    fn name(&self) -> &'static str;

    /// The single category every signal from this analyzer belongs to
    fn category(&self) -> SignalCategory;

    /// Extract signals from the snapshot.
    fn analyze(
        &self,
        snapshot: &RepoSnapshot,
        calibration: &Calibration,
    ) -> Result<Vec<Signal>, AnalysisError>;
}

/// Result from running a single analyzer: its signals, or the recorded
/// reason it produced none.
#[derive(Debug)]
pub struct AnalyzerOutcome {
    pub analyzer_name: &'static str,
    pub signals: Vec<Signal>,
    pub skipped: Option<Omission>,
    pub duration_ms: u64,
}

/// Run all registered analyzers in parallel and collect their outcomes.
///
/// Each analyzer gets the same read-only snapshot; there is no shared
/// mutable state. One failing analyzer never affects another.
pub fn run_all(
    analyzers: &[Box<dyn Analyzer>],
    snapshot: &RepoSnapshot,
    calibration: &Calibration,
) -> Vec<AnalyzerOutcome> {
    analyzers
        .par_iter()
        .map(|analyzer| {
            let started = Instant::now();
            match analyzer.analyze(snapshot, calibration) {
                Ok(signals) => {
                    debug!("{} produced {} signals", analyzer.name(), signals.len());
                    AnalyzerOutcome {
                        analyzer_name: analyzer.name(),
                        signals,
                        skipped: None,
                        duration_ms: started.elapsed().as_millis() as u64,
                    }
                }
                Err(e) => {
                    warn!("{} skipped: {}", analyzer.name(), e);
                    AnalyzerOutcome {
                        analyzer_name: analyzer.name(),
                        signals: Vec::new(),
                        skipped: Some(Omission::new(
                            analyzer.category().to_string(),
                            e.to_string(),
                        )),
                        duration_ms: started.elapsed().as_millis() as u64,
                    }
                }
            }
        })
        .collect()
}

/// The standard analyzer set, in category order.
pub fn default_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(CommitPatternAnalyzer::new()),
        Box::new(CodeStyleAnalyzer::new()),
        Box::new(StructureAnalyzer::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAnalyzer;

    impl Analyzer for FailingAnalyzer {
        fn name(&self) -> &'static str {
            "FailingAnalyzer"
        }
        fn category(&self) -> SignalCategory {
            SignalCategory::Style
        }
        fn analyze(
            &self,
            _snapshot: &RepoSnapshot,
            _calibration: &Calibration,
        ) -> Result<Vec<Signal>, AnalysisError> {
            Err(AnalysisError::DataUnavailable {
                domain: "style".to_string(),
            })
        }
    }

    struct OneSignalAnalyzer;

    impl Analyzer for OneSignalAnalyzer {
        fn name(&self) -> &'static str {
            "OneSignalAnalyzer"
        }
        fn category(&self) -> SignalCategory {
            SignalCategory::CommitPattern
        }
        fn analyze(
            &self,
            _snapshot: &RepoSnapshot,
            _calibration: &Calibration,
        ) -> Result<Vec<Signal>, AnalysisError> {
            Ok(vec![Signal::new(
                "massive_commit_ratio",
                SignalCategory::CommitPattern,
                0.5,
                0.9,
                "test",
            )])
        }
    }

    #[test]
    fn test_failure_is_scoped_to_one_analyzer() {
        let analyzers: Vec<Box<dyn Analyzer>> =
            vec![Box::new(FailingAnalyzer), Box::new(OneSignalAnalyzer)];
        let snapshot = RepoSnapshot::default();
        let calibration = Calibration::default();

        let outcomes = run_all(&analyzers, &snapshot, &calibration);
        assert_eq!(outcomes.len(), 2);

        let failed = outcomes
            .iter()
            .find(|o| o.analyzer_name == "FailingAnalyzer")
            .unwrap();
        assert!(failed.signals.is_empty());
        assert!(failed.skipped.is_some());

        let succeeded = outcomes
            .iter()
            .find(|o| o.analyzer_name == "OneSignalAnalyzer")
            .unwrap();
        assert_eq!(succeeded.signals.len(), 1);
        assert!(succeeded.skipped.is_none());
    }

    #[test]
    fn test_default_analyzer_set() {
        let analyzers = default_analyzers();
        assert_eq!(analyzers.len(), 3);
        assert_eq!(analyzers[0].category(), SignalCategory::CommitPattern);
        assert_eq!(analyzers[1].category(), SignalCategory::Style);
        assert_eq!(analyzers[2].category(), SignalCategory::ComplexityInput);
    }
}
