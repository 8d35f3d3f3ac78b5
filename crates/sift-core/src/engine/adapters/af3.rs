use super::SchemaAdapter;
use crate::core::io::{af3, input};
use crate::core::models::chain::Dialect;
use crate::core::models::job::ModelArtifacts;
use crate::engine::error::SiftError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// AlphaFold3-style outputs: the interface scalar is read straight from
/// each model's summary JSON, and sequences come from the launch JSON
/// sitting in the job directory.
#[derive(Debug, Clone, Copy)]
pub struct Af3Adapter;

impl SchemaAdapter for Af3Adapter {
    fn dialect(&self) -> Dialect {
        Dialect::Af3
    }

    fn locate_confidence_artifacts(
        &self,
        job_dir: &Path,
    ) -> Result<Vec<(usize, ModelArtifacts)>, SiftError> {
        let summaries = af3::find_model_summaries(job_dir)?;
        if summaries.is_empty() {
            return Err(SiftError::MissingArtifact {
                path: job_dir.join("*summary_confidences*.json"),
            });
        }
        Ok(summaries
            .into_iter()
            .map(|(index, path)| {
                (
                    index,
                    ModelArtifacts {
                        confidence: path,
                        pae_matrix: None,
                    },
                )
            })
            .collect())
    }

    fn parse_confidence(
        &self,
        artifacts: &ModelArtifacts,
        _expected_residues: Option<usize>,
    ) -> Result<Option<f64>, SiftError> {
        let summary = af3::read_summary(&artifacts.confidence)?;
        let scalar = summary.interface_scalar().ok_or_else(|| {
            SiftError::parse(
                &artifacts.confidence,
                "summary carries neither 'iptm' nor 'protein_iptm'",
            )
        })?;
        Ok(Some(scalar.clamp(0.0, 1.0)))
    }

    fn locate_sequence_source(&self, job_dir: &Path) -> Result<PathBuf, SiftError> {
        input::find_input_json(job_dir)?.ok_or_else(|| SiftError::MissingArtifact {
            path: job_dir.join("<launch>.json"),
        })
    }

    fn parse_sequences(&self, source: &Path) -> Result<HashMap<char, String>, SiftError> {
        Ok(input::read_json(source)?.chain_sequences())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_job(dir: &Path) {
        std::fs::write(
            dir.join("binder_input.json"),
            r#"{"sequences": [
                {"protein": {"id": "A", "sequence": "MKTAYIAKQR"}},
                {"protein": {"id": "B", "sequence": "EVQLVESGGG"}},
                {"protein": {"id": "C", "sequence": "DIQMTQSPSS"}}
            ]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("binder_summary_confidences_0.json"),
            r#"{"iptm": 0.81, "ptm": 0.9}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("binder_summary_confidences_1.json"),
            r#"{"iptm": 1.2}"#,
        )
        .unwrap();
    }

    #[test]
    fn scalar_is_read_directly_and_clamped() {
        let dir = tempfile::tempdir().unwrap();
        write_job(dir.path());

        let adapter = Af3Adapter;
        let models = adapter.locate_confidence_artifacts(dir.path()).unwrap();
        assert_eq!(models.len(), 2);

        let s0 = adapter.parse_confidence(&models[0].1, None).unwrap();
        assert_eq!(s0, Some(0.81));
        // Out-of-domain values are clamped, not passed through.
        let s1 = adapter.parse_confidence(&models[1].1, None).unwrap();
        assert_eq!(s1, Some(1.0));
    }

    #[test]
    fn summary_without_any_iptm_field_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x_summary_confidences_0.json");
        std::fs::write(&path, r#"{"ptm": 0.5}"#).unwrap();
        let artifacts = ModelArtifacts {
            confidence: path,
            pae_matrix: None,
        };
        assert!(matches!(
            Af3Adapter.parse_confidence(&artifacts, None),
            Err(SiftError::Parse { .. })
        ));
    }

    #[test]
    fn sequences_come_from_the_launch_json() {
        let dir = tempfile::tempdir().unwrap();
        write_job(dir.path());

        let source = Af3Adapter.locate_sequence_source(dir.path()).unwrap();
        let table = Af3Adapter.parse_sequences(&source).unwrap();
        assert_eq!(table[&'B'], "EVQLVESGGG");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_job_is_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Af3Adapter.locate_confidence_artifacts(dir.path()),
            Err(SiftError::MissingArtifact { .. })
        ));
    }
}
