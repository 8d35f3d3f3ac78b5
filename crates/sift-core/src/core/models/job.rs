use super::chain::{ChainRole, Dialect};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

/// Outcome of processing one candidate job directory.
///
/// Per-job failures are recorded here and surfaced in the report's
/// status column; they never abort the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// Score resolved and all expected chain roles recovered.
    Complete,
    /// Score resolved but the sequence source was absent or unreadable.
    Partial,
    /// The job directory itself was unreadable or structurally empty.
    MissingInputs,
    /// An expected confidence artifact was not found.
    MissingArtifact,
    /// A confidence or sequence artifact failed to parse.
    ParseError,
    /// Pairwise-error matrix shape disagrees with declared chain lengths.
    DimensionMismatch,
    /// Sequences parsed but a chain expected for a role was absent.
    MissingChain,
    /// The external interface-score tool failed after a retry.
    ExternalToolFailure,
    /// The external interface-score tool exceeded its time budget.
    Timeout,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Complete => "complete",
            JobStatus::Partial => "partial",
            JobStatus::MissingInputs => "missing-inputs",
            JobStatus::MissingArtifact => "missing-artifact",
            JobStatus::ParseError => "parse-error",
            JobStatus::DimensionMismatch => "dimension-mismatch",
            JobStatus::MissingChain => "missing-chain",
            JobStatus::ExternalToolFailure => "external-tool-failure",
            JobStatus::Timeout => "timeout",
        };
        write!(f, "{}", name)
    }
}

/// Paths to the confidence artifacts of a single predicted model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    /// Summary (Af3) or per-residue (Boltz) confidence JSON.
    pub confidence: PathBuf,
    /// Pairwise-error matrix, present only for the Boltz dialect.
    pub pae_matrix: Option<PathBuf>,
}

/// One predicted model (seed/sample) of a candidate.
#[derive(Debug, Clone)]
pub struct ModelResult {
    pub model_index: usize,
    /// Interface-confidence scalar, clamped to [0, 1]. `None` until
    /// resolved, and permanently `None` on failure (never a placeholder).
    pub score: Option<f64>,
    pub artifacts: ModelArtifacts,
}

/// Everything known about one candidate after scanning its directory.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub candidate_id: String,
    pub dialect: Dialect,
    pub job_dir: PathBuf,
    /// Ordered by model index, ascending.
    pub models: Vec<ModelResult>,
    /// Index into `models` of the representative model, set by the
    /// score resolver. At most one model is ever designated.
    pub representative: Option<usize>,
    /// Chain label to sequence, as declared in the job's input file.
    pub sequences: HashMap<char, String>,
    /// Role-keyed sequences recovered through the dialect's chain map.
    pub roles: BTreeMap<ChainRole, String>,
    pub status: JobStatus,
    /// Human-readable reason when status is a failure; logged, not reported.
    pub failure: Option<String>,
}

impl JobRecord {
    pub fn new(candidate_id: impl Into<String>, dialect: Dialect, job_dir: PathBuf) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            dialect,
            job_dir,
            models: Vec::new(),
            representative: None,
            sequences: HashMap::new(),
            roles: BTreeMap::new(),
            status: JobStatus::MissingInputs,
            failure: None,
        }
    }

    /// Shorthand for a record that failed before any model was parsed.
    pub fn failed(
        candidate_id: impl Into<String>,
        dialect: Dialect,
        job_dir: PathBuf,
        status: JobStatus,
        reason: impl Into<String>,
    ) -> Self {
        let mut record = Self::new(candidate_id, dialect, job_dir);
        record.status = status;
        record.failure = Some(reason.into());
        record
    }

    /// The representative model's scalar, if one was resolved.
    pub fn representative_score(&self) -> Option<f64> {
        self.representative
            .and_then(|idx| self.models.get(idx))
            .and_then(|model| model.score)
    }
}
