//! Parsing of predictor input documents.
//!
//! Both dialects launch from a structured document with the same logical
//! shape: a `sequences` list of protein entries, each carrying one or
//! more chain ids and a sequence string. Af3 jobs use JSON, Boltz jobs a
//! minimal YAML file.

use crate::engine::error::SiftError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    #[serde(default)]
    pub sequences: Vec<SequenceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SequenceEntry {
    #[serde(default)]
    pub protein: Option<ProteinEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ProteinEntry {
    pub id: ChainIds,
    #[serde(default)]
    pub sequence: Option<String>,
}

/// Chain ids appear either as a bare string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChainIds {
    One(String),
    Many(Vec<String>),
}

impl ChainIds {
    fn labels(&self) -> Vec<char> {
        let ids: Vec<&String> = match self {
            ChainIds::One(id) => vec![id],
            ChainIds::Many(ids) => ids.iter().collect(),
        };
        ids.iter().filter_map(|id| id.chars().next()).collect()
    }
}

impl InputDoc {
    /// Flattens the document into a chain-label to sequence table. An
    /// entry listing several ids contributes the same sequence under
    /// each label.
    pub fn chain_sequences(&self) -> HashMap<char, String> {
        let mut table = HashMap::new();
        for entry in &self.sequences {
            let Some(protein) = &entry.protein else {
                continue;
            };
            let Some(sequence) = &protein.sequence else {
                continue;
            };
            for label in protein.id.labels() {
                table.insert(label, sequence.clone());
            }
        }
        table
    }
}

/// Reads a JSON input document (Af3 launch file).
pub fn read_json(path: &Path) -> Result<InputDoc, SiftError> {
    let text = fs::read_to_string(path).map_err(|e| SiftError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| SiftError::parse(path, e.to_string()))
}

/// Reads a YAML input document (Boltz launch file).
pub fn read_yaml(path: &Path) -> Result<InputDoc, SiftError> {
    let text = fs::read_to_string(path).map_err(|e| SiftError::io(path, e))?;
    serde_yaml::from_str(&text).map_err(|e| SiftError::parse(path, e.to_string()))
}

/// Finds the launch JSON in a job directory: the lexicographically first
/// `.json` file whose top level contains a `sequences` array. Files that
/// fail to parse are skipped, matching how mixed job directories also
/// hold confidence JSONs with a different shape.
pub fn find_input_json(job_dir: &Path) -> Result<Option<PathBuf>, SiftError> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(job_dir)
        .map_err(|e| SiftError::io(job_dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
        })
        .collect();
    candidates.sort();

    for path in candidates {
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            continue;
        };
        if value.get("sequences").map(|s| s.is_array()).unwrap_or(false) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn json_doc_with_string_and_list_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(
            &path,
            r#"{
                "name": "binder_1",
                "sequences": [
                    {"protein": {"id": "A", "sequence": "MKTAYIAK"}},
                    {"protein": {"id": ["B", "D"], "sequence": "EVQLVESG"}}
                ]
            }"#,
        )
        .unwrap();

        let doc = read_json(&path).unwrap();
        let table = doc.chain_sequences();
        assert_eq!(table[&'A'], "MKTAYIAK");
        assert_eq!(table[&'B'], "EVQLVESG");
        assert_eq!(table[&'D'], "EVQLVESG");
    }

    #[test]
    fn yaml_doc_parses_role_keyed_chains() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.yaml");
        std::fs::write(
            &path,
            "sequences:\n  - protein:\n      id: A\n      sequence: MKTAYIAK\n  - protein:\n      id: B\n      sequence: GSHSMRYF\n",
        )
        .unwrap();

        let doc = read_yaml(&path).unwrap();
        let table = doc.chain_sequences();
        assert_eq!(table.len(), 2);
        assert_eq!(table[&'B'], "GSHSMRYF");
    }

    #[test]
    fn find_input_json_skips_confidence_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_summary.json"), r#"{"iptm": 0.8}"#).unwrap();
        let mut launch = std::fs::File::create(dir.path().join("b_input.json")).unwrap();
        write!(
            launch,
            r#"{{"sequences": [{{"protein": {{"id": "A", "sequence": "MK"}}}}]}}"#
        )
        .unwrap();

        let found = find_input_json(dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "b_input.json");
    }

    #[test]
    fn find_input_json_returns_none_without_candidates() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_input_json(dir.path()).unwrap().is_none());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.yaml");
        std::fs::write(&path, "sequences: [unbalanced").unwrap();
        assert!(matches!(
            read_yaml(&path),
            Err(SiftError::Parse { .. })
        ));
    }
}
