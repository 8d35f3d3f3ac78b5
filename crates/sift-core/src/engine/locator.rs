use crate::engine::config::DiscoveryRule;
use crate::engine::error::SiftError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A candidate job directory found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredJob {
    /// Directory name, used as the candidate id throughout.
    pub candidate_id: String,
    pub path: PathBuf,
}

/// Discovers candidate job directories under `root`.
///
/// The traversal is read-only and sorted lexicographically by path, so
/// repeated runs over an unchanged tree visit jobs in the same order.
/// Only an unreadable root is fatal; unreadable subtrees are skipped
/// with a debug log and the scan continues.
pub fn locate_jobs(root: &Path, rule: &DiscoveryRule) -> Result<Vec<DiscoveredJob>, SiftError> {
    let mut jobs = match rule {
        DiscoveryRule::Prefix { prefix } => prefix_children(root, prefix)?,
        DiscoveryRule::Marker { file_name } => {
            let mut found = Vec::new();
            marker_walk(root, file_name, true, &mut found)?;
            found
        }
    };
    jobs.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("Discovered {} candidate job directories.", jobs.len());
    Ok(jobs)
}

fn prefix_children(root: &Path, prefix: &str) -> Result<Vec<DiscoveredJob>, SiftError> {
    let entries = fs::read_dir(root).map_err(|e| SiftError::io(root, e))?;
    let jobs = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            let suffix = name.strip_prefix(prefix)?;
            if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some(DiscoveredJob {
                candidate_id: name,
                path,
            })
        })
        .collect();
    Ok(jobs)
}

fn marker_walk(
    dir: &Path,
    marker: &str,
    is_root: bool,
    out: &mut Vec<DiscoveredJob>,
) -> Result<(), SiftError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if is_root => return Err(SiftError::io(dir, e)),
        Err(e) => {
            debug!("Skipping unreadable directory {}: {}", dir.display(), e);
            return Ok(());
        }
    };

    let mut has_marker = false;
    let mut subdirs = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name().and_then(|n| n.to_str()) == Some(marker) {
            has_marker = true;
        }
    }

    if has_marker && !is_root {
        if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
            out.push(DiscoveredJob {
                candidate_id: name.to_string(),
                path: dir.to_path_buf(),
            });
        }
        // A marked directory is a job root; do not descend further.
        return Ok(());
    }

    for sub in subdirs {
        marker_walk(&sub, marker, false, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_rule() -> DiscoveryRule {
        DiscoveryRule::Prefix {
            prefix: "binder_".to_string(),
        }
    }

    #[test]
    fn prefix_rule_requires_integer_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["binder_1", "binder_10", "binder_x", "binder_", "other_2"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("binder_5"), "a file, not a dir").unwrap();

        let jobs = locate_jobs(dir.path(), &prefix_rule()).unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["binder_1", "binder_10"]);
    }

    #[test]
    fn ordering_is_lexicographic_by_path() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["binder_2", "binder_10", "binder_1"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        let jobs = locate_jobs(dir.path(), &prefix_rule()).unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.candidate_id.as_str()).collect();
        // Lexicographic, not natural: binder_10 sorts before binder_2.
        assert_eq!(ids, vec!["binder_1", "binder_10", "binder_2"]);
    }

    #[test]
    fn marker_rule_finds_nested_jobs_without_descending_into_them() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("batch1").join("AB1");
        let b = dir.path().join("batch1").join("AB2");
        let inner = a.join("sub");
        fs::create_dir_all(&inner).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("input.yaml"), "").unwrap();
        fs::write(inner.join("input.yaml"), "").unwrap();
        fs::write(b.join("input.yaml"), "").unwrap();

        let rule = DiscoveryRule::Marker {
            file_name: "input.yaml".to_string(),
        };
        let jobs = locate_jobs(dir.path(), &rule).unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["AB1", "AB2"]);
    }

    #[test]
    fn unreadable_root_is_fatal() {
        let result = locate_jobs(Path::new("/nonexistent/sift-root"), &prefix_rule());
        assert!(matches!(result, Err(SiftError::Io { .. })));
    }
}
