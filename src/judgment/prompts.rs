//! Fixed prompt template for per-file judgments
//!
//! The template is part of the rubric contract: the model is told the
//! exact two-line response shape the adapter will accept, and nothing
//! else is trusted.

use crate::models::FileSample;

/// System prompt pinning the model into the strict response format.
pub const JUDGMENT_SYSTEM_PROMPT: &str = "You are a code provenance analyst. \
You judge whether a code excerpt reads as machine-generated or hand-written. \
Respond in exactly the two-line format requested, with no extra text.";

/// Build the per-file judgment prompt for an (already truncated) excerpt.
pub fn build_judgment_prompt(sample: &FileSample, excerpt: &str, truncated: bool) -> String {
    let truncation_note = if truncated {
        "\n(The excerpt was truncated to fit; judge what is shown.)"
    } else {
        ""
    };

    format!(
        r#"Assess how likely this code was generated by an AI model rather than written by hand. Consider naming, comment style, structural regularity, idiom choice, and algorithmic sophistication.

File: {path}
Language: {language}{truncation_note}

```
{excerpt}
```

Reply with exactly two lines:
VERDICT: unlikely | possible | likely | very_likely
CONFIDENCE: low | medium | high"#,
        path = sample.path.display(),
        language = sample.language,
        truncation_note = truncation_note,
        excerpt = excerpt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_prompt_carries_excerpt_and_format() {
        let sample = FileSample {
            path: PathBuf::from("src/app.py"),
            language: "python".to_string(),
            content: String::new(),
            size: 0,
        };
        let prompt = build_judgment_prompt(&sample, "def main(): pass", false);
        assert!(prompt.contains("src/app.py"));
        assert!(prompt.contains("def main(): pass"));
        assert!(prompt.contains("VERDICT:"));
        assert!(prompt.contains("CONFIDENCE:"));
        assert!(!prompt.contains("truncated"));
    }

    #[test]
    fn test_truncation_is_disclosed() {
        let sample = FileSample {
            path: PathBuf::from("big.rs"),
            language: "rust".to_string(),
            content: String::new(),
            size: 0,
        };
        let prompt = build_judgment_prompt(&sample, "fn main() {}", true);
        assert!(prompt.contains("truncated"));
    }
}
