//! Analysis pipeline
//!
//! Orchestrates a full run:
//! 1. Run the heuristic analyzers in parallel (rayon)
//! 2. Dispatch per-file judgments to a bounded worker pool
//! 3. Merge signals and recorded omissions
//! 4. Hand the complete set to the single-threaded aggregator
//!
//! Failure is scoped: one analyzer or one judgment failing becomes an
//! omission, never an abort. Only a run with zero authenticity evidence
//! errors out.

use crate::analyzers::{self, Analyzer};
use crate::config::Calibration;
use crate::error::AnalysisError;
use crate::judgment::{judgment_signal, select_judged_files, Judge};
use crate::models::{FileSample, Omission, Report, RepoSnapshot, Signal};
use crate::scoring::{Aggregator, EvidenceVolume};
use tracing::{info, warn};

/// Full analysis pipeline over one snapshot.
pub struct Pipeline<'a> {
    calibration: &'a Calibration,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with the standard analyzer set.
    pub fn new(calibration: &'a Calibration) -> Self {
        Self {
            calibration,
            analyzers: analyzers::default_analyzers(),
        }
    }

    /// Run the pipeline. `judge` is the per-file judgment seam (None
    /// disables the LLM category entirely); `carried_omissions` are
    /// collection-time omissions that belong in the report.
    pub fn run(
        &self,
        snapshot: &RepoSnapshot,
        judge: Option<&dyn Judge>,
        carried_omissions: Vec<Omission>,
    ) -> Result<Report, AnalysisError> {
        let mut signals: Vec<Signal> = Vec::new();
        let mut omissions = carried_omissions;

        let outcomes = analyzers::run_all(&self.analyzers, snapshot, self.calibration);
        for outcome in outcomes {
            signals.extend(outcome.signals);
            if let Some(omission) = outcome.skipped {
                omissions.push(omission);
            }
        }

        let mut judgments_attempted = 0usize;
        if let Some(judge) = judge {
            let selected =
                select_judged_files(&snapshot.files, self.calibration.llm.max_judged_files);
            judgments_attempted = selected.len();
            let (judgment_signals, judgment_omissions) =
                run_judgments(judge, &selected, self.calibration);
            signals.extend(judgment_signals);
            omissions.extend(judgment_omissions);
        }

        info!(
            "pipeline collected {} signals, {} omissions ({} judgments attempted)",
            signals.len(),
            omissions.len(),
            judgments_attempted
        );

        let evidence = EvidenceVolume {
            commit_count: snapshot.commits.len(),
            file_count: snapshot.files.len(),
            judgments_attempted,
        };

        Aggregator::new(self.calibration).aggregate(
            snapshot.metadata.clone(),
            signals,
            omissions,
            evidence,
        )
    }
}

/// Judge the selected files on a bounded worker pool.
///
/// Workers pull from a shared queue, so excess files wait instead of
/// fanning out unbounded calls against the external service. Each
/// failure is recorded for its file and nothing else stops.
fn run_judgments(
    judge: &dyn Judge,
    selected: &[&FileSample],
    calibration: &Calibration,
) -> (Vec<Signal>, Vec<Omission>) {
    if selected.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let workers = calibration.llm.concurrency.clamp(1, selected.len());
    let weight = calibration.weights.llm_judgment;

    let (task_tx, task_rx) = crossbeam_channel::unbounded::<&FileSample>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();

    for &sample in selected {
        task_tx.send(sample).expect("queue open while filling");
    }
    drop(task_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok(sample) = task_rx.recv() {
                    let outcome = judge.judge(sample);
                    if result_tx.send((sample, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);
    });

    let mut results: Vec<_> = result_rx.iter().collect();
    // Worker interleaving is nondeterministic; path order is not
    results.sort_by(|a, b| a.0.path.cmp(&b.0.path));

    let mut signals = Vec::new();
    let mut omissions = Vec::new();
    for (sample, outcome) in results {
        match outcome {
            Ok(judgment) => signals.push(judgment_signal(sample, &judgment, weight)),
            Err(e) => {
                warn!("judgment unavailable for {:?}: {}", sample.path, e);
                omissions.push(Omission::new(sample.path.display().to_string(), e.to_string()));
            }
        }
    }

    (signals, omissions)
}
