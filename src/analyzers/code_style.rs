//! Code style analyzer
//!
//! Turns file contents into stylistic signals. Machine-generated code
//! leans on a small generic naming vocabulary, comments that restate the
//! line below them, and formatting with none of the small inconsistencies
//! a hand-written history accrues.

use crate::analyzers::Analyzer;
use crate::config::Calibration;
use crate::error::AnalysisError;
use crate::models::{FileSample, RepoSnapshot, Signal, SignalCategory};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

/// Minimum identifiers before the genericity ratio is quoted without a
/// small-sample caveat
const MIN_IDENTIFIERS: usize = 8;

/// Comment token overlap with the next code line that reads as restating it
const RESTATE_OVERLAP: f64 = 0.5;
/// Comment-to-code ratio at which comment density stops scaling the signal
const DENSITY_CEILING: f64 = 0.4;

/// Files needed before uniformity across the corpus means anything
const MIN_FILES_FOR_UNIFORMITY: usize = 3;
/// Formatting quirks per 1,000 lines that hand-written code tends to carry
const BASELINE_QUIRKS_PER_KLOC: f64 = 8.0;

/// Generic identifier vocabulary (machine-typical naming)
const GENERIC_WORDS: &[&str] = &[
    "result", "results", "retval", "temp", "tmp", "data", "value", "values", "item", "items",
    "elem", "element", "obj", "object", "output", "input", "response", "request", "var", "arg",
    "args", "param", "params", "info", "thing", "things", "content", "entry", "record", "node",
    "count", "num", "index", "key", "flag", "status", "state", "kind", "name", "str", "text",
    "list", "array", "dict", "map", "func", "callback", "handler", "wrapper", "helper", "util",
    "utils",
];

static DECL_PYTHON_RE: OnceLock<Regex> = OnceLock::new();
static DECL_CURLY_RE: OnceLock<Regex> = OnceLock::new();
static DECL_RUST_RE: OnceLock<Regex> = OnceLock::new();
static DECL_GO_RE: OnceLock<Regex> = OnceLock::new();

fn decl_python_re() -> &'static Regex {
    DECL_PYTHON_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:def\s+(\w+)|class\s+(\w+)|(\w+)\s*=\s*[^=])").expect("valid regex")
    })
}

fn decl_curly_re() -> &'static Regex {
    DECL_CURLY_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:function\s+(\w+)|(?:const|let|var)\s+(\w+)|class\s+(\w+))")
            .expect("valid regex")
    })
}

fn decl_rust_re() -> &'static Regex {
    DECL_RUST_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:pub\s+)?(?:fn\s+(\w+)|let\s+(?:mut\s+)?(\w+)|struct\s+(\w+)|enum\s+(\w+))")
            .expect("valid regex")
    })
}

fn decl_go_re() -> &'static Regex {
    DECL_GO_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:func\s+(\w+)|(?:var|type)\s+(\w+)|(\w+)\s*:=)").expect("valid regex")
    })
}

/// Extracts stylistic signals from the sampled files.
pub struct CodeStyleAnalyzer {
    generic_words: HashSet<&'static str>,
}

impl CodeStyleAnalyzer {
    pub fn new() -> Self {
        Self {
            generic_words: GENERIC_WORDS.iter().copied().collect(),
        }
    }

    /// Ratio of declared identifiers drawn from the generic vocabulary.
    fn naming_genericity(&self, files: &[FileSample], calibration: &Calibration) -> Option<Signal> {
        let mut total = 0usize;
        let mut generic = 0usize;

        for file in files {
            for name in declared_identifiers(file) {
                // Private/underscore conventions carry no naming evidence
                if name.starts_with('_') {
                    continue;
                }
                total += 1;
                if self.is_generic(&name) {
                    generic += 1;
                }
            }
        }

        if total == 0 {
            debug!("naming genericity skipped: no declarations found");
            return None;
        }

        let ratio = generic as f64 / total as f64;
        let caveat = if total < MIN_IDENTIFIERS {
            " (small sample)"
        } else {
            ""
        };

        Some(Signal::new(
            "naming_genericity",
            SignalCategory::Style,
            ratio,
            calibration.weights.naming_genericity,
            format!(
                "{} of {} declared identifiers are generic vocabulary{}",
                generic, total, caveat
            ),
        ))
    }

    fn is_generic(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        if lower.len() == 1 {
            return true;
        }
        if self.generic_words.contains(lower.as_str()) {
            return true;
        }
        // Numbered generics: data2, temp3, x1
        let stripped = lower.trim_end_matches(|c: char| c.is_ascii_digit());
        stripped.len() < lower.len()
            && (self.generic_words.contains(stripped) || stripped.len() == 1)
    }

    /// Comment density combined with the fraction of comments that merely
    /// restate the following code line. No comments at all means no
    /// evidence for this check, not innocence or guilt.
    fn comment_redundancy(&self, files: &[FileSample], calibration: &Calibration) -> Option<Signal> {
        let mut code_lines = 0usize;
        let mut comments = 0usize;
        let mut redundant = 0usize;

        for file in files {
            let Some(prefix) = comment_prefix(&file.language) else {
                continue;
            };
            let lines: Vec<&str> = file.content.lines().collect();
            for (i, line) in lines.iter().enumerate() {
                let trimmed = line.trim_start();
                if let Some(comment) = trimmed.strip_prefix(prefix) {
                    comments += 1;
                    if let Some(next_code) = lines[i + 1..]
                        .iter()
                        .map(|l| l.trim())
                        .find(|l| !l.is_empty() && !l.trim_start().starts_with(prefix))
                    {
                        if restates(comment, next_code) {
                            redundant += 1;
                        }
                    }
                } else if !trimmed.is_empty() {
                    code_lines += 1;
                }
            }
        }

        if comments == 0 || code_lines == 0 {
            debug!("comment redundancy skipped: no comments in corpus");
            return None;
        }

        let density = comments as f64 / code_lines as f64;
        let redundant_fraction = redundant as f64 / comments as f64;
        let value = redundant_fraction * (density / DENSITY_CEILING).min(1.0);

        Some(Signal::new(
            "comment_redundancy",
            SignalCategory::Style,
            value,
            calibration.weights.comment_redundancy,
            format!(
                "{} of {} comments restate the next line (comment density {:.0}%)",
                redundant,
                comments,
                density * 100.0
            ),
        ))
    }

    /// Perfect formatting uniformity across several files is suspicious;
    /// hand-written corpora accrue small quirks over time.
    fn formatting_uniformity(
        &self,
        files: &[FileSample],
        calibration: &Calibration,
    ) -> Option<Signal> {
        if files.len() < MIN_FILES_FOR_UNIFORMITY {
            debug!(
                "formatting uniformity skipped: {} files (< {})",
                files.len(),
                MIN_FILES_FOR_UNIFORMITY
            );
            return None;
        }

        let mut total_lines = 0usize;
        let mut quirks = 0usize;
        for file in files {
            let (lines, file_quirks) = count_quirks(&file.content);
            total_lines += lines;
            quirks += file_quirks;
        }

        if total_lines == 0 {
            return None;
        }

        let per_kloc = quirks as f64 * 1000.0 / total_lines as f64;
        let value = 1.0 - (per_kloc / BASELINE_QUIRKS_PER_KLOC).min(1.0);

        Some(Signal::new(
            "formatting_uniformity",
            SignalCategory::Style,
            value,
            calibration.weights.formatting_uniformity,
            format!(
                "{} formatting quirks across {} lines in {} files ({:.1}/kloc vs ~{:.0}/kloc typical)",
                quirks,
                total_lines,
                files.len(),
                per_kloc,
                BASELINE_QUIRKS_PER_KLOC
            ),
        ))
    }
}

impl Default for CodeStyleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for CodeStyleAnalyzer {
    fn name(&self) -> &'static str {
        "CodeStyleAnalyzer"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Style
    }

    fn analyze(
        &self,
        snapshot: &RepoSnapshot,
        calibration: &Calibration,
    ) -> Result<Vec<Signal>, AnalysisError> {
        if snapshot.files.is_empty() {
            return Err(AnalysisError::DataUnavailable {
                domain: "file contents".to_string(),
            });
        }

        let signals: Vec<Signal> = [
            self.naming_genericity(&snapshot.files, calibration),
            self.comment_redundancy(&snapshot.files, calibration),
            self.formatting_uniformity(&snapshot.files, calibration),
        ]
        .into_iter()
        .flatten()
        .collect();

        if signals.is_empty() {
            return Err(AnalysisError::DataUnavailable {
                domain: "style evidence".to_string(),
            });
        }
        Ok(signals)
    }
}

/// Declaration-site identifiers for the file's language.
fn declared_identifiers(file: &FileSample) -> Vec<String> {
    let re = match file.language.as_str() {
        "python" | "ruby" => decl_python_re(),
        "rust" => decl_rust_re(),
        "go" => decl_go_re(),
        _ => decl_curly_re(),
    };

    re.captures_iter(&file.content)
        .filter_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Line-comment prefix for the language, if the analyzer knows one.
fn comment_prefix(language: &str) -> Option<&'static str> {
    match language {
        "python" | "ruby" | "shell" | "yaml" => Some("#"),
        "rust" | "javascript" | "typescript" | "go" | "java" | "c" | "cpp" | "csharp"
        | "kotlin" | "swift" => Some("//"),
        _ => None,
    }
}

/// A comment restates the next line when most of its tokens appear in it.
fn restates(comment: &str, code: &str) -> bool {
    let comment_tokens: Vec<String> = tokenize(comment);
    if comment_tokens.is_empty() {
        return false;
    }
    let code_tokens: HashSet<String> = tokenize(code).into_iter().collect();
    let shared = comment_tokens
        .iter()
        .filter(|t| code_tokens.contains(*t))
        .count();
    shared as f64 / comment_tokens.len() as f64 >= RESTATE_OVERLAP
}

/// Filler words ignored when comparing a comment against code.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "to", "of", "is", "in", "for", "and", "or", "we", "it", "this", "that",
    "then", "so", "with",
];

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(|t| t.to_lowercase())
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Count formatting quirks in one file: trailing whitespace, indentation
/// off the file's dominant unit, long runs of blank lines, overlong lines.
fn count_quirks(content: &str) -> (usize, usize) {
    let lines: Vec<&str> = content.lines().collect();
    let indent_unit = dominant_indent_unit(&lines);

    let mut quirks = 0usize;
    let mut blank_run = 0usize;
    for line in &lines {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                quirks += 1;
            }
            continue;
        }
        blank_run = 0;

        if line.ends_with(' ') || line.ends_with('\t') {
            quirks += 1;
        }
        if line.len() > 120 {
            quirks += 1;
        }
        let leading_spaces = line.len() - line.trim_start_matches(' ').len();
        if indent_unit > 0 && leading_spaces % indent_unit != 0 {
            quirks += 1;
        }
    }

    (lines.len(), quirks)
}

/// Most common leading-space step (2 or 4); 0 when indentation is absent.
fn dominant_indent_unit(lines: &[&str]) -> usize {
    let mut twos = 0usize;
    let mut fours = 0usize;
    for line in lines {
        let leading = line.len() - line.trim_start_matches(' ').len();
        if leading == 0 {
            continue;
        }
        if leading % 4 == 0 {
            fours += 1;
        } else if leading % 2 == 0 {
            twos += 1;
        }
    }
    if twos == 0 && fours == 0 {
        0
    } else if twos > fours {
        2
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(path: &str, language: &str, content: &str) -> FileSample {
        FileSample {
            path: PathBuf::from(path),
            language: language.to_string(),
            size: content.len(),
            content: content.to_string(),
        }
    }

    fn snapshot_with(files: Vec<FileSample>) -> RepoSnapshot {
        RepoSnapshot {
            files,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_corpus_is_data_unavailable() {
        let analyzer = CodeStyleAnalyzer::new();
        let err = analyzer
            .analyze(&RepoSnapshot::default(), &Calibration::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
    }

    #[test]
    fn test_generic_naming_scores_high() {
        let analyzer = CodeStyleAnalyzer::new();
        let snapshot = snapshot_with(vec![sample(
            "gen.py",
            "python",
            "def process(records):\n    result = []\n    data = records\n    temp = sorted(data)\n    value = temp[0]\n    output = [value]\n    item = output\n    obj = item\n    return obj\n",
        )]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        let naming = signals
            .iter()
            .find(|s| s.name == "naming_genericity")
            .unwrap();
        assert!(naming.value > 0.8, "value was {}", naming.value);
    }

    #[test]
    fn test_domain_naming_scores_low() {
        let analyzer = CodeStyleAnalyzer::new();
        let snapshot = snapshot_with(vec![sample(
            "billing.py",
            "python",
            "def settle_invoice(invoice):\n    outstanding_balance = invoice.total\n    late_fee = compute_late_fee(invoice)\n    settlement = outstanding_balance + late_fee\n    ledger_entry = post_to_ledger(settlement)\n    return ledger_entry\n",
        )]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        let naming = signals
            .iter()
            .find(|s| s.name == "naming_genericity")
            .unwrap();
        assert!(naming.value < 0.2, "value was {}", naming.value);
    }

    #[test]
    fn test_restating_comments_flagged() {
        let analyzer = CodeStyleAnalyzer::new();
        let snapshot = snapshot_with(vec![sample(
            "loop.py",
            "python",
            "# increment the counter\ncounter = counter + 1\n# return the counter\nreturn counter\n",
        )]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        let comments = signals
            .iter()
            .find(|s| s.name == "comment_redundancy")
            .unwrap();
        assert!(comments.value > 0.5, "value was {}", comments.value);
    }

    #[test]
    fn test_no_comments_emits_no_redundancy_signal() {
        let analyzer = CodeStyleAnalyzer::new();
        let snapshot = snapshot_with(vec![sample(
            "bare.py",
            "python",
            "def run(queue):\n    job = queue.pop()\n    job.execute()\n",
        )]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        assert!(!signals.iter().any(|s| s.name == "comment_redundancy"));
    }

    #[test]
    fn test_intent_comments_not_flagged() {
        let analyzer = CodeStyleAnalyzer::new();
        let snapshot = snapshot_with(vec![sample(
            "retry.py",
            "python",
            "# upstream throttles bursts, so spread retries\nbackoff_schedule = build_schedule(attempts)\n",
        )]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        let comments = signals
            .iter()
            .find(|s| s.name == "comment_redundancy")
            .unwrap();
        assert_eq!(comments.value, 0.0);
    }

    #[test]
    fn test_perfect_uniformity_raises_signal() {
        let analyzer = CodeStyleAnalyzer::new();
        let clean = "def tidy():\n    return 1\n".repeat(30);
        let snapshot = snapshot_with(vec![
            sample("a.py", "python", &clean),
            sample("b.py", "python", &clean),
            sample("c.py", "python", &clean),
        ]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        let uniformity = signals
            .iter()
            .find(|s| s.name == "formatting_uniformity")
            .unwrap();
        assert!((uniformity.value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quirky_corpus_lowers_signal() {
        let analyzer = CodeStyleAnalyzer::new();
        // Trailing whitespace and odd indentation on most lines
        let quirky = "def messy(): \n   x = 1 \n      y = 2  \n".repeat(20);
        let snapshot = snapshot_with(vec![
            sample("a.py", "python", &quirky),
            sample("b.py", "python", &quirky),
            sample("c.py", "python", &quirky),
        ]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        let uniformity = signals
            .iter()
            .find(|s| s.name == "formatting_uniformity")
            .unwrap();
        assert_eq!(uniformity.value, 0.0);
    }

    #[test]
    fn test_two_files_skip_uniformity() {
        let analyzer = CodeStyleAnalyzer::new();
        let snapshot = snapshot_with(vec![
            sample("a.py", "python", "def f():\n    return 1\n"),
            sample("b.py", "python", "def g():\n    return 2\n"),
        ]);
        let signals = analyzer
            .analyze(&snapshot, &Calibration::default())
            .unwrap();
        assert!(!signals.iter().any(|s| s.name == "formatting_uniformity"));
    }
}
