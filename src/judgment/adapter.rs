//! Per-file judgment adapter
//!
//! Wraps the LLM client with the rubric contract: excerpt truncation
//! (recorded), a fixed retry budget with exponential backoff, strict
//! two-line response parsing, and normalization into a Signal. The
//! `Judge` trait is the seam tests stub.

use crate::config::Calibration;
use crate::judgment::prompts::{build_judgment_prompt, JUDGMENT_SYSTEM_PROMPT};
use crate::judgment::{
    Judgment, JudgmentClient, JudgmentError, JudgmentResult, Message, Verdict,
};
use crate::models::{Confidence, FileSample, Signal, SignalCategory};
use std::time::Duration;
use tracing::{debug, warn};

/// First retry delay; each further retry doubles it.
const BASE_BACKOFF_MS: u64 = 500;

/// Anything that can turn a file sample into a validated judgment.
pub trait Judge: Send + Sync {
    fn judge(&self, sample: &FileSample) -> JudgmentResult<Judgment>;
}

/// The production judge: LLM client + rubric normalization.
pub struct LlmJudgmentAdapter {
    client: JudgmentClient,
    excerpt_max_bytes: usize,
    retry_budget: u32,
}

impl LlmJudgmentAdapter {
    pub fn new(client: JudgmentClient, calibration: &Calibration) -> Self {
        Self {
            client,
            excerpt_max_bytes: calibration.llm.excerpt_max_bytes,
            retry_budget: calibration.llm.retry_budget,
        }
    }

    /// Build from environment keys, honoring the calibration timeout.
    pub fn from_env(calibration: &Calibration) -> JudgmentResult<Self> {
        let client = JudgmentClient::from_env(Duration::from_secs(calibration.llm.timeout_secs))?;
        debug!(
            "judgment adapter using {:?} backend, model {}",
            client.backend(),
            client.model()
        );
        Ok(Self::new(client, calibration))
    }
}

impl Judge for LlmJudgmentAdapter {
    fn judge(&self, sample: &FileSample) -> JudgmentResult<Judgment> {
        let (excerpt, truncated) = excerpt_of(&sample.content, self.excerpt_max_bytes);
        let prompt = build_judgment_prompt(sample, excerpt, truncated);

        let mut attempt = 0u32;
        loop {
            let outcome = self
                .client
                .generate(vec![Message::user(prompt.clone())], Some(JUDGMENT_SYSTEM_PROMPT))
                .and_then(|response| parse_judgment(&response, truncated));

            match outcome {
                Ok(judgment) => return Ok(judgment),
                // Transport and API failures are worth retrying; a missing
                // key or an off-rubric response will not improve.
                Err(e @ (JudgmentError::Transport(_) | JudgmentError::Api { .. }))
                    if attempt < self.retry_budget =>
                {
                    attempt += 1;
                    let delay = Duration::from_millis(BASE_BACKOFF_MS << (attempt - 1));
                    warn!(
                        "judgment for {:?} failed (attempt {}/{}): {}. Retrying in {:?}",
                        sample.path,
                        attempt,
                        self.retry_budget + 1,
                        e,
                        delay
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Truncate content at a char boundary, reporting whether anything was cut.
fn excerpt_of(content: &str, max_bytes: usize) -> (&str, bool) {
    if content.len() <= max_bytes {
        return (content, false);
    }
    let mut end = max_bytes;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    (&content[..end], true)
}

/// Parse the strict two-line judgment format. Both lines must parse
/// against the rubric; a half-valid response is unparseable, never a
/// default guess.
pub fn parse_judgment(response: &str, truncated: bool) -> JudgmentResult<Judgment> {
    let mut verdict: Option<Verdict> = None;
    let mut confidence: Option<Confidence> = None;

    for line in response.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("VERDICT:") {
            verdict = Verdict::parse(rest);
        } else if let Some(rest) = line.strip_prefix("CONFIDENCE:") {
            confidence = parse_confidence(rest);
        }
    }

    match (verdict, confidence) {
        (Some(verdict), Some(confidence)) => Ok(Judgment {
            verdict,
            confidence,
            truncated,
        }),
        _ => Err(JudgmentError::Unparseable(snippet(response))),
    }
}

fn parse_confidence(label: &str) -> Option<Confidence> {
    match label.trim().to_lowercase().as_str() {
        "low" => Some(Confidence::Low),
        "medium" => Some(Confidence::Medium),
        "high" => Some(Confidence::High),
        _ => None,
    }
}

fn snippet(response: &str) -> String {
    let flat = response.trim().replace('\n', " ");
    if flat.len() <= 120 {
        flat
    } else {
        let mut end = 120;
        while !flat.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &flat[..end])
    }
}

/// Normalize a validated judgment into the `llm_judgment` signal.
pub fn judgment_signal(sample: &FileSample, judgment: &Judgment, weight: f64) -> Signal {
    let truncation_note = if judgment.truncated {
        ", excerpt truncated"
    } else {
        ""
    };
    Signal::new(
        "llm_judgment",
        SignalCategory::LlmJudgment,
        judgment.verdict.rubric_value(),
        weight,
        format!(
            "{}: model verdict '{}' (self-confidence {}{})",
            sample.path.display(),
            judgment.verdict,
            judgment.confidence,
            truncation_note
        ),
    )
}

/// Pick the files worth a judgment call: largest first, capped, with a
/// path tie-break so the sample is deterministic.
pub fn select_judged_files(files: &[FileSample], max_judged: usize) -> Vec<&FileSample> {
    let mut ranked: Vec<&FileSample> = files.iter().collect();
    ranked.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    ranked.truncate(max_judged);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(path: &str, size: usize) -> FileSample {
        FileSample {
            path: PathBuf::from(path),
            language: "python".to_string(),
            content: "x".repeat(size),
            size,
        }
    }

    #[test]
    fn test_parse_valid_judgment() {
        let judgment = parse_judgment("VERDICT: likely\nCONFIDENCE: high", false).unwrap();
        assert_eq!(judgment.verdict, Verdict::Likely);
        assert_eq!(judgment.confidence, Confidence::High);
        assert!(!judgment.truncated);
    }

    #[test]
    fn test_parse_tolerates_surrounding_chatter_lines() {
        let response = "Here is my assessment:\nVERDICT: unlikely\nCONFIDENCE: medium\n";
        let judgment = parse_judgment(response, true).unwrap();
        assert_eq!(judgment.verdict, Verdict::Unlikely);
        assert!(judgment.truncated);
    }

    #[test]
    fn test_missing_confidence_is_unparseable() {
        let err = parse_judgment("VERDICT: likely", false).unwrap_err();
        assert!(matches!(err, JudgmentError::Unparseable(_)));
    }

    #[test]
    fn test_off_rubric_verdict_is_unparseable() {
        let err = parse_judgment("VERDICT: definitely\nCONFIDENCE: high", false).unwrap_err();
        assert!(matches!(err, JudgmentError::Unparseable(_)));
    }

    #[test]
    fn test_freeform_response_is_unparseable() {
        let err =
            parse_judgment("This code looks AI generated to me, about 70% sure.", false).unwrap_err();
        assert!(matches!(err, JudgmentError::Unparseable(_)));
    }

    #[test]
    fn test_excerpt_truncation() {
        let (full, truncated) = excerpt_of("short", 100);
        assert_eq!(full, "short");
        assert!(!truncated);

        let content = "é".repeat(100);
        let (cut, truncated) = excerpt_of(&content, 15);
        assert!(truncated);
        assert!(cut.len() <= 15);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_judgment_signal_uses_rubric_value() {
        let file = sample("src/core.py", 10);
        let judgment = Judgment {
            verdict: Verdict::VeryLikely,
            confidence: Confidence::Low,
            truncated: true,
        };
        let signal = judgment_signal(&file, &judgment, 0.8);
        assert_eq!(signal.name, "llm_judgment");
        assert_eq!(signal.category, SignalCategory::LlmJudgment);
        assert!((signal.value - 0.9).abs() < f64::EPSILON);
        assert!(signal.rationale.contains("src/core.py"));
        assert!(signal.rationale.contains("truncated"));
    }

    #[test]
    fn test_selection_is_largest_first_and_capped() {
        let files = vec![
            sample("small.py", 10),
            sample("big.py", 1000),
            sample("mid.py", 500),
        ];
        let selected = select_judged_files(&files, 2);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].path, PathBuf::from("big.py"));
        assert_eq!(selected[1].path, PathBuf::from("mid.py"));
    }

    #[test]
    fn test_selection_tie_break_is_deterministic() {
        let files = vec![sample("b.py", 100), sample("a.py", 100)];
        let selected = select_judged_files(&files, 1);
        assert_eq!(selected[0].path, PathBuf::from("a.py"));
    }
}
