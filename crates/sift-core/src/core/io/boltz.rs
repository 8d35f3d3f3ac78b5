//! Boltz-2-style prediction artifacts.
//!
//! A job directory holds `input.yaml` plus a `boltz_results_*` tree; the
//! per-model artifacts live under `predictions/<name>/` as paired
//! `pae_<name>_model_<k>.npz` and `confidence_<name>_model_<k>.json`
//! files.

use crate::engine::error::SiftError;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const INPUT_YAML: &str = "input.yaml";

#[derive(Debug, Deserialize)]
pub struct BoltzConfidence {
    #[serde(default)]
    pub iptm: Option<f64>,
    #[serde(default)]
    pub protein_iptm: Option<f64>,
    #[serde(default)]
    pub complex_plddt: Option<f64>,
}

pub fn read_confidence(path: &Path) -> Result<BoltzConfidence, SiftError> {
    let text = fs::read_to_string(path).map_err(|e| SiftError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| SiftError::parse(path, e.to_string()))
}

/// Locates the predictions directory inside the first `boltz_results_*`
/// tree of a job directory (lexicographically first at every level, so
/// repeated scans agree).
pub fn find_prediction_dir(job_dir: &Path) -> Result<Option<PathBuf>, SiftError> {
    let results_dir = match first_matching_dir(job_dir, |name| name.starts_with("boltz_results"))? {
        Some(dir) => dir,
        None => return Ok(None),
    };
    let predictions = results_dir.join("predictions");
    if !predictions.is_dir() {
        return Ok(None);
    }
    first_matching_dir(&predictions, |_| true)
}

fn first_matching_dir(
    dir: &Path,
    accept: impl Fn(&str) -> bool,
) -> Result<Option<PathBuf>, SiftError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| SiftError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(&accept)
                    .unwrap_or(false)
        })
        .collect();
    dirs.sort();
    Ok(dirs.into_iter().next())
}

fn pae_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^pae_(.+)_model_(\d+)\.npz$").unwrap())
}

/// Pairs every pairwise-error matrix in the prediction directory with
/// its companion confidence JSON, sorted by model index. A matrix whose
/// companion is absent is an error: the two are written together, so a
/// missing half means a truncated job.
pub fn find_model_artifacts(
    prediction_dir: &Path,
) -> Result<Vec<(usize, PathBuf, PathBuf)>, SiftError> {
    let mut models = Vec::new();
    let entries = fs::read_dir(prediction_dir).map_err(|e| SiftError::io(prediction_dir, e))?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(caps) = pae_pattern().captures(name) else {
            continue;
        };
        let stem = &caps[1];
        let index: usize = caps[2]
            .parse()
            .map_err(|_| SiftError::parse(&path, "model index out of range"))?;
        let confidence = prediction_dir.join(format!("confidence_{}_model_{}.json", stem, index));
        if !confidence.is_file() {
            return Err(SiftError::MissingArtifact { path: confidence });
        }
        models.push((index, path, confidence));
    }
    models.sort();
    Ok(models)
}
