use crate::core::models::chain::ChainRole;
use crate::core::models::job::JobStatus;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Expected artifact not found: {path}", path = path.display())]
    MissingArtifact { path: PathBuf },

    #[error("Failed to parse {path}: {message}", path = path.display())]
    Parse { path: PathBuf, message: String },

    #[error(
        "Pairwise-error matrix is {rows}x{cols} but declared chains sum to {expected} residues"
    )]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("No chain is mapped to role '{role}' in the sequence table")]
    MissingChain { role: ChainRole },

    #[error("Interface-score tool failed: {reason}")]
    ExternalTool { reason: String },

    #[error("Interface-score tool exceeded the {seconds}s time budget")]
    ToolTimeout { seconds: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SiftError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiftError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SiftError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Status a job is marked with when this error is captured at the
    /// per-job boundary. Configuration errors are fatal before any job
    /// runs and should never reach this mapping.
    pub fn job_status(&self) -> JobStatus {
        match self {
            SiftError::MissingArtifact { .. } => JobStatus::MissingArtifact,
            SiftError::Parse { .. } => JobStatus::ParseError,
            SiftError::DimensionMismatch { .. } => JobStatus::DimensionMismatch,
            SiftError::MissingChain { .. } => JobStatus::MissingChain,
            SiftError::ExternalTool { .. } => JobStatus::ExternalToolFailure,
            SiftError::ToolTimeout { .. } => JobStatus::Timeout,
            SiftError::Io { .. } => JobStatus::MissingInputs,
            SiftError::Config(_) => JobStatus::ParseError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_per_job_error_maps_to_a_reportable_status() {
        let err = SiftError::MissingArtifact {
            path: PathBuf::from("x.json"),
        };
        assert_eq!(err.job_status(), JobStatus::MissingArtifact);

        let err = SiftError::DimensionMismatch {
            rows: 10,
            cols: 10,
            expected: 12,
        };
        assert_eq!(err.job_status(), JobStatus::DimensionMismatch);

        let err = SiftError::ToolTimeout { seconds: 30 };
        assert_eq!(err.job_status(), JobStatus::Timeout);
    }
}
