//! LLM judgment adapter
//!
//! Folds an external language model's qualitative read of a code sample
//! into the pipeline as one more bounded signal. BYOK (bring your own
//! key): API keys come from environment variables.
//!
//! The model is a noisy oracle. Its output is forced through a fixed
//! rubric — a categorical verdict mapped to a fixed value — before it
//! touches the aggregator, and anything that does not parse against the
//! rubric is `JudgmentError`, never a default mid-value guess.
//!
//! # Environment Variables
//!
//! - `ANTHROPIC_API_KEY`: Anthropic backend
//! - `OPENAI_API_KEY`: OpenAI backend
//! - `OLLAMA_MODEL`: local Ollama (no key needed)

mod adapter;
mod client;
mod prompts;

pub use adapter::{judgment_signal, parse_judgment, select_judged_files, Judge, LlmJudgmentAdapter};
pub use client::{ClientConfig, JudgmentClient, LlmBackend, Message, Role};
pub use prompts::build_judgment_prompt;

use crate::models::Confidence;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a judgment is unavailable for one file. Scoped to that file:
/// the rest of the pipeline proceeds and confidence degrades.
#[derive(Error, Debug)]
pub enum JudgmentError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("request failed or timed out: {0}")]
    Transport(String),

    #[error("response does not match the judgment rubric: {0}")]
    Unparseable(String),
}

pub type JudgmentResult<T> = Result<T, JudgmentError>;

/// Categorical AI-authorship verdict, the only values the rubric accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Verdict {
    /// Fixed rubric mapping into signal-value space (suspicion strength).
    pub fn rubric_value(&self) -> f64 {
        match self {
            Verdict::Unlikely => 0.1,
            Verdict::Possible => 0.4,
            Verdict::Likely => 0.7,
            Verdict::VeryLikely => 0.9,
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "unlikely" => Some(Verdict::Unlikely),
            "possible" => Some(Verdict::Possible),
            "likely" => Some(Verdict::Likely),
            "very_likely" | "very likely" => Some(Verdict::VeryLikely),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Unlikely => write!(f, "unlikely"),
            Verdict::Possible => write!(f, "possible"),
            Verdict::Likely => write!(f, "likely"),
            Verdict::VeryLikely => write!(f, "very_likely"),
        }
    }
}

/// A validated per-file judgment: verdict plus the model's self-reported
/// confidence, and whether the excerpt was truncated before judging.
/// Confidence and truncation are recorded in the signal rationale; the
/// value entering the aggregator comes from the rubric alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub truncated: bool,
}
