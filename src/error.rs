//! Pipeline failure taxonomy
//!
//! Per-analyzer and per-file failures are captured and recorded as
//! omissions by the pipeline; only `NoSignals` surfaces to the caller,
//! because a run with zero authenticity evidence must not fabricate a
//! neutral report.

use thiserror::Error;

/// Errors produced by analyzers and the aggregator.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The snapshot carries no data for this evidence domain; the
    /// analyzer is skipped, not faked.
    #[error("no {domain} data available")]
    DataUnavailable { domain: String },

    /// An input that cannot be used as text; skipped with a recorded
    /// rationale.
    #[error("malformed input {path}: {reason}")]
    MalformedInput { path: String, reason: String },

    /// Total failure: no authenticity category produced any signal.
    #[error("no signal category produced evidence; refusing to fabricate a report")]
    NoSignals,
}
