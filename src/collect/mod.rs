//! Local repository collection
//!
//! Produces the pipeline's inbound boundary types from a local checkout:
//! commit history via libgit2 (ascending, with churn stats) and file
//! samples via a gitignore-aware walk. Platform-API retrieval lives
//! outside this crate; anything that yields the same `RepoSnapshot`
//! shape can replace this module.
//!
//! Collection never aborts on bad inputs: a missing git history or an
//! undecodable file becomes a recorded omission.

use crate::config::Calibration;
use crate::error::AnalysisError;
use crate::models::{Commit, FileSample, Omission, RepoMetadata, RepoSnapshot};
use anyhow::{Context, Result};
use chrono::DateTime;
use git2::{DiffOptions, Repository, Sort};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files larger than this are skipped as samples (blobs, bundles)
const MAX_SAMPLE_BYTES: u64 = 400_000;

/// Build a snapshot plus the omissions recorded while collecting.
pub fn collect(repo_path: &Path, calibration: &Calibration) -> Result<(RepoSnapshot, Vec<Omission>)> {
    let root = repo_path
        .canonicalize()
        .with_context(|| format!("repository path {:?} does not exist", repo_path))?;

    let mut omissions = Vec::new();

    let commits = match collect_commits(&root, calibration.max_commits) {
        Ok(commits) => commits,
        Err(e) => {
            warn!("commit history unavailable: {}", e);
            omissions.push(Omission::new("commit_pattern", e.to_string()));
            Vec::new()
        }
    };

    let (files, mut file_omissions) = collect_files(&root, calibration.max_files);
    omissions.append(&mut file_omissions);

    let metadata = RepoMetadata {
        name: root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        owner: None,
        primary_language: primary_language(&files),
    };

    info!(
        "collected {} commits and {} file samples from {:?}",
        commits.len(),
        files.len(),
        root
    );

    Ok((
        RepoSnapshot {
            metadata,
            commits,
            files,
        },
        omissions,
    ))
}

/// Walk the history oldest-first, with per-commit churn stats.
fn collect_commits(root: &Path, max_commits: usize) -> Result<Vec<Commit>> {
    let repo = Repository::discover(root)
        .with_context(|| format!("no git repository at {:?}", root))?;

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;
    revwalk.push_head().context("repository has no commits")?;

    let mut commits = Vec::new();
    for oid_result in revwalk {
        if commits.len() >= max_commits {
            debug!("commit walk capped at {}", max_commits);
            break;
        }

        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        // First-parent diff, same as log --first-parent churn
        let parent = commit.parent(0).ok();
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;
        let tree = commit.tree()?;

        let mut diff_opts = DiffOptions::new();
        let diff = repo.diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&tree),
            Some(&mut diff_opts),
        )?;
        let stats = diff.stats()?;

        let files_touched: Vec<String> = diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string())
            })
            .collect();

        let timestamp = DateTime::from_timestamp(commit.time().seconds(), 0)
            .unwrap_or(DateTime::UNIX_EPOCH);

        commits.push(Commit {
            id: oid.to_string()[..12].to_string(),
            timestamp,
            message: commit.message().unwrap_or("").to_string(),
            lines_added: stats.insertions(),
            lines_removed: stats.deletions(),
            files_touched,
        });
    }

    Ok(commits)
}

/// Sample tracked source files, gitignore-aware, in stable path order.
fn collect_files(root: &Path, max_files: usize) -> (Vec<FileSample>, Vec<Omission>) {
    let mut paths: Vec<PathBuf> = WalkBuilder::new(root)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(language_for_extension)
                .is_some()
        })
        .collect();
    // Walk order varies by platform; sample order must not
    paths.sort();

    let mut files = Vec::new();
    let mut omissions = Vec::new();

    for path in paths {
        if files.len() >= max_files {
            debug!("file sampling capped at {}", max_files);
            break;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_path_buf();

        match std::fs::metadata(&path) {
            Ok(meta) if meta.len() > MAX_SAMPLE_BYTES => {
                debug!("skipping oversized file {:?} ({} bytes)", relative, meta.len());
                continue;
            }
            Err(e) => {
                omissions.push(Omission::new(
                    relative.display().to_string(),
                    format!("unreadable: {}", e),
                ));
                continue;
            }
            _ => {}
        }

        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) => {
                omissions.push(Omission::new(
                    relative.display().to_string(),
                    format!("unreadable: {}", e),
                ));
                continue;
            }
        };

        match String::from_utf8(raw) {
            Ok(content) => {
                let language = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(language_for_extension)
                    .expect("extension filtered above")
                    .to_string();
                files.push(FileSample {
                    size: content.len(),
                    path: relative,
                    language,
                    content,
                });
            }
            Err(_) => {
                let malformed = AnalysisError::MalformedInput {
                    path: relative.display().to_string(),
                    reason: "cannot be decoded as UTF-8 text".to_string(),
                };
                debug!("{}", malformed);
                omissions.push(Omission::new(
                    relative.display().to_string(),
                    malformed.to_string(),
                ));
            }
        }
    }

    (files, omissions)
}

/// Extension to language table for the walk filter.
fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "py" => Some("python"),
        "rs" => Some("rust"),
        "js" | "jsx" | "mjs" => Some("javascript"),
        "ts" | "tsx" => Some("typescript"),
        "go" => Some("go"),
        "java" => Some("java"),
        "rb" => Some("ruby"),
        "c" | "h" => Some("c"),
        "cpp" | "cc" | "hpp" => Some("cpp"),
        "cs" => Some("csharp"),
        "kt" => Some("kotlin"),
        "swift" => Some("swift"),
        "sh" => Some("shell"),
        _ => None,
    }
}

/// Most common language among the samples.
fn primary_language(files: &[FileSample]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for file in files {
        *counts.entry(file.language.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(language, count)| (*count, std::cmp::Reverse(language.to_string())))
        .map(|(language, _)| language.to_string())
}
