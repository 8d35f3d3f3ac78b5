use super::SchemaAdapter;
use crate::core::io::{boltz, input, npz};
use crate::core::models::chain::Dialect;
use crate::core::models::job::ModelArtifacts;
use crate::engine::error::SiftError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Boltz-2-style outputs: no direct scalar. Each model contributes a
/// pairwise-error matrix and a per-residue confidence file; the score
/// resolver combines them through the external tool. This adapter only
/// locates the pair and validates the matrix shape against the declared
/// chain lengths.
#[derive(Debug, Clone, Copy)]
pub struct BoltzAdapter;

impl SchemaAdapter for BoltzAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Boltz
    }

    fn locate_confidence_artifacts(
        &self,
        job_dir: &Path,
    ) -> Result<Vec<(usize, ModelArtifacts)>, SiftError> {
        let prediction_dir =
            boltz::find_prediction_dir(job_dir)?.ok_or_else(|| SiftError::MissingArtifact {
                path: job_dir.join("boltz_results_*/predictions"),
            })?;
        let models = boltz::find_model_artifacts(&prediction_dir)?;
        if models.is_empty() {
            return Err(SiftError::MissingArtifact {
                path: prediction_dir.join("pae_*_model_*.npz"),
            });
        }
        Ok(models
            .into_iter()
            .map(|(index, pae, confidence)| {
                (
                    index,
                    ModelArtifacts {
                        confidence,
                        pae_matrix: Some(pae),
                    },
                )
            })
            .collect())
    }

    fn parse_confidence(
        &self,
        artifacts: &ModelArtifacts,
        expected_residues: Option<usize>,
    ) -> Result<Option<f64>, SiftError> {
        // Validates both halves up front so schema problems surface as
        // parse errors on the job rather than tool failures later.
        boltz::read_confidence(&artifacts.confidence)?;

        let pae_path = artifacts
            .pae_matrix
            .as_ref()
            .ok_or_else(|| SiftError::MissingArtifact {
                path: artifacts.confidence.with_file_name("pae_*.npz"),
            })?;
        let matrix = npz::read_pae_matrix(pae_path)?;

        if let Some(expected) = expected_residues {
            let (rows, cols) = matrix.dim();
            if rows != expected {
                return Err(SiftError::DimensionMismatch {
                    rows,
                    cols,
                    expected,
                });
            }
        }
        // The scalar is computed by the resolver, never here.
        Ok(None)
    }

    fn locate_sequence_source(&self, job_dir: &Path) -> Result<PathBuf, SiftError> {
        let path = job_dir.join(boltz::INPUT_YAML);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SiftError::MissingArtifact { path })
        }
    }

    fn parse_sequences(&self, source: &Path) -> Result<HashMap<char, String>, SiftError> {
        Ok(input::read_yaml(source)?.chain_sequences())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use ndarray_npy::NpzWriter;
    use std::fs::File;

    fn write_boltz_job(job_dir: &Path, matrix_size: usize) -> PathBuf {
        let pred = job_dir
            .join("boltz_results_input")
            .join("predictions")
            .join("input");
        std::fs::create_dir_all(&pred).unwrap();

        std::fs::write(
            job_dir.join("input.yaml"),
            "sequences:\n  - protein:\n      id: A\n      sequence: MKTAY\n  - protein:\n      id: B\n      sequence: EVQ\n",
        )
        .unwrap();
        std::fs::write(
            pred.join("confidence_input_model_0.json"),
            r#"{"iptm": 0.5}"#,
        )
        .unwrap();

        let pae = pred.join("pae_input_model_0.npz");
        let mut npz_file = NpzWriter::new(File::create(&pae).unwrap());
        let matrix = Array2::from_elem((matrix_size, matrix_size), 2.5f32);
        npz_file.add_array("pae", &matrix).unwrap();
        npz_file.finish().unwrap();
        pred
    }

    #[test]
    fn matching_matrix_parses_to_no_direct_scalar() {
        let dir = tempfile::tempdir().unwrap();
        write_boltz_job(dir.path(), 8);

        let adapter = BoltzAdapter;
        let models = adapter.locate_confidence_artifacts(dir.path()).unwrap();
        assert_eq!(models.len(), 1);

        // Declared chains sum to 5 + 3 = 8 residues.
        let scalar = adapter.parse_confidence(&models[0].1, Some(8)).unwrap();
        assert_eq!(scalar, None);
    }

    #[test]
    fn mismatched_matrix_is_a_dimension_error() {
        let dir = tempfile::tempdir().unwrap();
        write_boltz_job(dir.path(), 10);

        let adapter = BoltzAdapter;
        let models = adapter.locate_confidence_artifacts(dir.path()).unwrap();
        let result = adapter.parse_confidence(&models[0].1, Some(8));
        assert!(matches!(
            result,
            Err(SiftError::DimensionMismatch {
                rows: 10,
                expected: 8,
                ..
            })
        ));
    }

    #[test]
    fn job_without_results_tree_is_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            BoltzAdapter.locate_confidence_artifacts(dir.path()),
            Err(SiftError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn sequence_source_is_the_input_yaml() {
        let dir = tempfile::tempdir().unwrap();
        write_boltz_job(dir.path(), 8);

        let source = BoltzAdapter.locate_sequence_source(dir.path()).unwrap();
        let table = BoltzAdapter.parse_sequences(&source).unwrap();
        assert_eq!(table[&'A'], "MKTAY");
        assert_eq!(table[&'B'], "EVQ");
    }
}
