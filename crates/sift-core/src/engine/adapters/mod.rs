//! Dialect-specific output-schema adapters.
//!
//! Each predictor dialect implements the same four operations; the
//! engine only ever talks to the trait. The set of dialects is closed
//! (`Dialect`), so dispatch is an enum, not scattered conditionals.

mod af3;
mod boltz;

pub use af3::Af3Adapter;
pub use boltz::BoltzAdapter;

use crate::core::models::chain::Dialect;
use crate::core::models::job::ModelArtifacts;
use crate::engine::error::SiftError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait SchemaAdapter {
    fn dialect(&self) -> Dialect;

    /// Finds every per-model confidence artifact set in the job
    /// directory, sorted by model index. An empty job is an error.
    fn locate_confidence_artifacts(
        &self,
        job_dir: &Path,
    ) -> Result<Vec<(usize, ModelArtifacts)>, SiftError>;

    /// Parses one model's confidence. Returns the interface scalar for
    /// dialects that expose it directly, `None` for dialects whose
    /// scalar must be computed by the score resolver. When
    /// `expected_residues` is known, matrix-shaped artifacts are
    /// validated against it.
    fn parse_confidence(
        &self,
        artifacts: &ModelArtifacts,
        expected_residues: Option<usize>,
    ) -> Result<Option<f64>, SiftError>;

    /// Finds the job's sequence source (the predictor launch file).
    fn locate_sequence_source(&self, job_dir: &Path) -> Result<PathBuf, SiftError>;

    /// Parses the sequence source into a chain-label to sequence table.
    fn parse_sequences(&self, source: &Path) -> Result<HashMap<char, String>, SiftError>;
}

/// Closed dispatch over the known dialects.
#[derive(Debug, Clone, Copy)]
pub enum DialectAdapter {
    Af3(Af3Adapter),
    Boltz(BoltzAdapter),
}

impl From<Dialect> for DialectAdapter {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Af3 => DialectAdapter::Af3(Af3Adapter),
            Dialect::Boltz => DialectAdapter::Boltz(BoltzAdapter),
        }
    }
}

impl DialectAdapter {
    fn inner(&self) -> &dyn SchemaAdapter {
        match self {
            DialectAdapter::Af3(a) => a,
            DialectAdapter::Boltz(a) => a,
        }
    }
}

impl SchemaAdapter for DialectAdapter {
    fn dialect(&self) -> Dialect {
        self.inner().dialect()
    }

    fn locate_confidence_artifacts(
        &self,
        job_dir: &Path,
    ) -> Result<Vec<(usize, ModelArtifacts)>, SiftError> {
        self.inner().locate_confidence_artifacts(job_dir)
    }

    fn parse_confidence(
        &self,
        artifacts: &ModelArtifacts,
        expected_residues: Option<usize>,
    ) -> Result<Option<f64>, SiftError> {
        self.inner().parse_confidence(artifacts, expected_residues)
    }

    fn locate_sequence_source(&self, job_dir: &Path) -> Result<PathBuf, SiftError> {
        self.inner().locate_sequence_source(job_dir)
    }

    fn parse_sequences(&self, source: &Path) -> Result<HashMap<char, String>, SiftError> {
        self.inner().parse_sequences(source)
    }
}
