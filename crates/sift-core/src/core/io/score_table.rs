//! Parsing of the external interface-score tool's tabular output.
//!
//! The tool is a black box; its contract is a whitespace-delimited table
//! with a header row naming, at minimum, the two chain columns (`Chn1`,
//! `Chn2`), an aggregation `Type` column, and the interface metric
//! column. Rows may cover every chain pair and several aggregation
//! levels; callers extract the metric for one pair.

use crate::engine::error::SiftError;
use std::path::Path;

/// The metric column the tool reports its interface confidence under.
pub const DEFAULT_METRIC_COLUMN: &str = "ipSAE";

const CHAIN1_COLUMN: &str = "Chn1";
const CHAIN2_COLUMN: &str = "Chn2";
const TYPE_COLUMN: &str = "Type";

/// The aggregate row kind the tool emits once per chain pair.
const MAX_ROW: &str = "max";

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub chain1: String,
    pub chain2: String,
    pub row_type: String,
    pub metric: f64,
}

/// Parses the table text. Rows with too few columns or a non-numeric
/// metric are skipped, not fatal; a missing required header column is.
///
/// `source` only labels errors; the text may come from a file or from
/// the tool's captured stdout.
pub fn parse_score_table(
    text: &str,
    metric_column: &str,
    source: &Path,
) -> Result<Vec<ScoreRow>, SiftError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| SiftError::parse(source, "score table is empty"))?
        .split_whitespace()
        .collect();

    let column = |name: &str| {
        header
            .iter()
            .position(|&col| col == name)
            .ok_or_else(|| SiftError::parse(source, format!("missing column '{}'", name)))
    };
    let chain1_idx = column(CHAIN1_COLUMN)?;
    let chain2_idx = column(CHAIN2_COLUMN)?;
    let type_idx = column(TYPE_COLUMN)?;
    let metric_idx = column(metric_column)?;
    let width = chain1_idx.max(chain2_idx).max(type_idx).max(metric_idx);

    let mut rows = Vec::new();
    for line in lines {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() <= width {
            continue;
        }
        let Ok(metric) = cols[metric_idx].parse::<f64>() else {
            continue;
        };
        rows.push(ScoreRow {
            chain1: cols[chain1_idx].to_string(),
            chain2: cols[chain2_idx].to_string(),
            row_type: cols[type_idx].to_string(),
            metric,
        });
    }
    Ok(rows)
}

/// Extracts the interface metric for one chain pair (either orientation).
///
/// The `max` aggregate row wins when present; otherwise the largest
/// metric among the pair's rows is used, matching the tool's own
/// summary semantics. Returns `None` when the pair never appears.
pub fn interface_metric(rows: &[ScoreRow], pair: (char, char)) -> Option<f64> {
    let matches_pair = |row: &&ScoreRow| {
        let (a, b) = pair;
        let forward = row.chain1 == a.to_string() && row.chain2 == b.to_string();
        let reverse = row.chain1 == b.to_string() && row.chain2 == a.to_string();
        forward || reverse
    };

    if let Some(row) = rows.iter().filter(matches_pair).find(|r| r.row_type == MAX_ROW) {
        return Some(row.metric);
    }
    rows.iter()
        .filter(matches_pair)
        .map(|row| row.metric)
        .max_by(|a, b| a.total_cmp(b))
}
