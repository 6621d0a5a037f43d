//! Structure analyzer
//!
//! Extracts structural facts as `complexity_input` signals: branching
//! density, how much of the code is custom work vs. library plumbing,
//! and how broad the codebase is. These feed only the complexity scorer;
//! their values mean sophistication strength, not suspicion.

use crate::analyzers::Analyzer;
use crate::config::Calibration;
use crate::error::AnalysisError;
use crate::models::{FileSample, RepoSnapshot, Signal, SignalCategory};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Branch constructs per 100 code lines treated as maximal density
const BRANCH_DENSITY_CEILING: f64 = 25.0;
/// File count treated as maximal breadth
const BREADTH_FILES_CEILING: f64 = 40.0;
/// Directory count treated as maximal modular spread
const BREADTH_DIRS_CEILING: f64 = 10.0;

static BRANCH_RE: OnceLock<Regex> = OnceLock::new();
static IMPORT_RE: OnceLock<Regex> = OnceLock::new();
static DEFINITION_RE: OnceLock<Regex> = OnceLock::new();

fn branch_re() -> &'static Regex {
    BRANCH_RE.get_or_init(|| {
        Regex::new(r"\b(if|else|elif|match|switch|case|for|while|catch|except)\b|&&|\|\||\?")
            .expect("valid regex")
    })
}

fn import_re() -> &'static Regex {
    IMPORT_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:import\s|from\s+\S+\s+import|use\s+\w|#include|require\s*\()")
            .expect("valid regex")
    })
}

fn definition_re() -> &'static Regex {
    DEFINITION_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:pub\s+)?(?:def|fn|func|function|class|struct|enum|trait|interface|impl)\b")
            .expect("valid regex")
    })
}

/// Extracts structural complexity inputs from the sampled files.
pub struct StructureAnalyzer;

impl StructureAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Branch-introducing constructs per 100 code lines, normalized.
    fn branching_density(&self, files: &[FileSample]) -> Signal {
        let mut code_lines = 0usize;
        let mut branches = 0usize;
        for file in files {
            for line in file.content.lines() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                code_lines += 1;
                branches += branch_re().find_iter(trimmed).count();
            }
        }

        let per_hundred = if code_lines == 0 {
            0.0
        } else {
            branches as f64 * 100.0 / code_lines as f64
        };

        Signal::new(
            "branching_density",
            SignalCategory::ComplexityInput,
            per_hundred / BRANCH_DENSITY_CEILING,
            1.0,
            format!(
                "{} branch constructs over {} code lines ({:.1}/100)",
                branches, code_lines, per_hundred
            ),
        )
    }

    /// Share of declaration sites that are custom definitions rather than
    /// imports. Heavy library reliance pulls this down.
    fn custom_code_share(&self, files: &[FileSample]) -> Signal {
        let mut imports = 0usize;
        let mut definitions = 0usize;
        for file in files {
            imports += import_re().find_iter(&file.content).count();
            definitions += definition_re().find_iter(&file.content).count();
        }

        let total = imports + definitions;
        let share = if total == 0 {
            0.0
        } else {
            definitions as f64 / total as f64
        };

        Signal::new(
            "custom_code_share",
            SignalCategory::ComplexityInput,
            share,
            1.0,
            format!(
                "{} custom definitions vs {} import statements",
                definitions, imports
            ),
        )
    }

    /// File count and directory spread, normalized by fixed ceilings.
    fn structural_breadth(&self, files: &[FileSample]) -> Signal {
        let dirs: HashSet<_> = files
            .iter()
            .filter_map(|f| f.path.parent().map(|p| p.to_path_buf()))
            .collect();

        let file_term = (files.len() as f64 / BREADTH_FILES_CEILING).min(1.0);
        let dir_term = (dirs.len() as f64 / BREADTH_DIRS_CEILING).min(1.0);
        let value = 0.6 * file_term + 0.4 * dir_term;

        Signal::new(
            "structural_breadth",
            SignalCategory::ComplexityInput,
            value,
            1.0,
            format!("{} files across {} directories", files.len(), dirs.len()),
        )
    }
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for StructureAnalyzer {
    fn name(&self) -> &'static str {
        "StructureAnalyzer"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::ComplexityInput
    }

    fn analyze(
        &self,
        snapshot: &RepoSnapshot,
        _calibration: &Calibration,
    ) -> Result<Vec<Signal>, AnalysisError> {
        if snapshot.files.is_empty() {
            return Err(AnalysisError::DataUnavailable {
                domain: "file contents".to_string(),
            });
        }

        Ok(vec![
            self.branching_density(&snapshot.files),
            self.custom_code_share(&snapshot.files),
            self.structural_breadth(&snapshot.files),
        ])
    }
}
