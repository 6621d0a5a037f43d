//! Signal aggregation and scoring
//!
//! This module turns the collected signal set into the final report.
//!
//! # Scoring Formula
//!
//! ```text
//! suspicion = Σ(value × weight) / Σ(weight)   over authenticity signals present
//! authenticity = clamp(100 × (1 − suspicion), 0, 100)
//! ```
//!
//! Missing signals drop out of both sums, so absence renormalizes the
//! mean instead of dragging the score toward either extreme.
//!
//! # Confidence Band
//!
//! - 3 authenticity categories present → high, 2 → medium, 1 → low
//! - category means further apart than the disagreement threshold → one
//!   step down, with a `signal-disagreement` flag
//! - thin evidence (commits or files below the calibrated minimums) →
//!   capped at low; absent LLM judgment → capped at medium
//!
//! # Complexity
//!
//! A fixed monotonic composite over the `complexity_input` signals with a
//! bounded style-genericity discount, bucketed onto the 1-10 scale.

mod aggregator;
mod complexity;

pub use aggregator::{Aggregator, EvidenceVolume};
pub use complexity::ComplexityScorer;
