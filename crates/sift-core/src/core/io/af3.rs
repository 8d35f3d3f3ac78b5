//! AlphaFold3-style confidence artifacts.
//!
//! Each predicted model leaves a flat summary JSON whose name contains
//! `summary_confidences`; the interface scalar is the `iptm` field, with
//! `protein_iptm` as a fallback for runs that only report the
//! protein-scoped variant.

use crate::engine::error::SiftError;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Deserialize)]
pub struct Af3Summary {
    #[serde(default)]
    pub iptm: Option<f64>,
    #[serde(default)]
    pub protein_iptm: Option<f64>,
    #[serde(default)]
    pub ptm: Option<f64>,
}

impl Af3Summary {
    /// The interface-confidence scalar this summary exposes, if any.
    pub fn interface_scalar(&self) -> Option<f64> {
        self.iptm.or(self.protein_iptm)
    }
}

pub fn read_summary(path: &Path) -> Result<Af3Summary, SiftError> {
    let text = fs::read_to_string(path).map_err(|e| SiftError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| SiftError::parse(path, e.to_string()))
}

fn summary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"summary_confidences(?:_(\d+))?\.json$").unwrap())
}

/// Finds all per-model summary files under a job directory, recursively.
///
/// The model index is taken from a trailing `_<n>` in the file name when
/// present; otherwise indices are assigned in path order. Results are
/// sorted by index, then path, so repeated scans are stable.
pub fn find_model_summaries(job_dir: &Path) -> Result<Vec<(usize, PathBuf)>, SiftError> {
    let mut files = Vec::new();
    collect_summaries(job_dir, &mut files)?;
    files.sort();

    let mut indexed: Vec<(usize, PathBuf)> = files
        .into_iter()
        .enumerate()
        .map(|(position, path)| {
            let index = summary_pattern()
                .captures(path.file_name().and_then(|n| n.to_str()).unwrap_or(""))
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(position);
            (index, path)
        })
        .collect();
    indexed.sort();
    Ok(indexed)
}

fn collect_summaries(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SiftError> {
    let entries = fs::read_dir(dir).map_err(|e| SiftError::io(dir, e))?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            // A vanished subdirectory mid-walk is not worth failing the job.
            let _ = collect_summaries(&path, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if summary_pattern().is_match(name) {
                out.push(path);
            }
        }
    }
    Ok(())
}
