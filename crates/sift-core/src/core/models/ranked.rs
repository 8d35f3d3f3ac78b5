use super::chain::{ChainRole, Dialect};
use super::job::JobStatus;
use std::collections::BTreeMap;

/// One row of the consolidated report. Derived from a `JobRecord` by the
/// ranking workflow and read-only from then on.
#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub candidate_id: String,
    /// Representative interface-confidence scalar; `None` for any
    /// non-complete job.
    pub score: Option<f64>,
    pub sequences: BTreeMap<ChainRole, String>,
    pub status: JobStatus,
    /// Whether the row clears the configured threshold (complete jobs only).
    pub passed: bool,
}

/// Full table plus the threshold-passing subset, both in final row order.
#[derive(Debug, Clone)]
pub struct RankReport {
    pub dialect: Dialect,
    /// Every candidate exactly once, failures included.
    pub rows: Vec<RankedEntry>,
    /// Complete rows meeting the threshold, descending by score.
    pub passing: Vec<RankedEntry>,
}
