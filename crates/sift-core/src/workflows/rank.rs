use crate::core::models::chain::Dialect;
use crate::core::models::job::{JobRecord, JobStatus};
use crate::core::models::ranked::{RankReport, RankedEntry};
use crate::engine::config::RankConfig;
use crate::engine::error::SiftError;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Merges scanned records into the final report: one row per candidate,
/// descending by representative scalar, ties broken by ascending
/// candidate id. A pure function of its inputs.
pub fn rank(dialect: Dialect, records: &[JobRecord], config: &RankConfig) -> RankReport {
    // Deduplicate by candidate id. Repeated models were already
    // collapsed per job; duplicates here can only come from overlapping
    // discovery (e.g. a marker file nested under another job), and the
    // better-resolved record wins.
    let mut by_id: BTreeMap<&str, &JobRecord> = BTreeMap::new();
    for record in records {
        by_id
            .entry(record.candidate_id.as_str())
            .and_modify(|held| {
                if prefer(record, held) {
                    *held = record;
                }
            })
            .or_insert(record);
    }

    let mut rows: Vec<RankedEntry> = by_id
        .values()
        .map(|record| {
            let score = record.representative_score();
            let passed = record.status == JobStatus::Complete
                && score.is_some_and(|s| config.direction.passes(s, config.threshold));
            RankedEntry {
                candidate_id: record.candidate_id.clone(),
                score,
                sequences: record.roles.clone(),
                status: record.status,
                passed,
            }
        })
        .collect();
    rows.sort_by(compare_entries);

    let passing: Vec<RankedEntry> = rows.iter().filter(|row| row.passed).cloned().collect();
    info!(
        "Ranked {} candidate(s); {} pass the threshold.",
        rows.len(),
        passing.len()
    );
    RankReport {
        dialect,
        rows,
        passing,
    }
}

fn prefer(candidate: &JobRecord, held: &JobRecord) -> bool {
    match (candidate.representative_score(), held.representative_score()) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Descending by scalar with unscored rows last, then ascending by id.
fn compare_entries(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    match (a.score, b.score) {
        (Some(sa), Some(sb)) => sb
            .total_cmp(&sa)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.candidate_id.cmp(&b.candidate_id),
    }
}

/// Writes one table as delimited text: candidate id, scalar, status,
/// then one sequence column per dialect role.
pub fn write_table(
    entries: &[RankedEntry],
    dialect: Dialect,
    path: &Path,
) -> Result<(), SiftError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| match e.into_kind() {
        csv::ErrorKind::Io(io) => SiftError::io(path, io),
        other => SiftError::parse(path, format!("{:?}", other)),
    })?;

    let roles = dialect.roles();
    let mut header = vec!["candidate".to_string(), "score".to_string(), "status".to_string()];
    header.extend(roles.iter().map(|role| format!("{}_sequence", role)));
    writer
        .write_record(&header)
        .map_err(|e| SiftError::parse(path, e.to_string()))?;

    for entry in entries {
        let mut row = vec![
            entry.candidate_id.clone(),
            entry.score.map(|s| format!("{:.6}", s)).unwrap_or_default(),
            entry.status.to_string(),
        ];
        row.extend(
            roles
                .iter()
                .map(|role| entry.sequences.get(role).cloned().unwrap_or_default()),
        );
        writer
            .write_record(&row)
            .map_err(|e| SiftError::parse(path, e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| SiftError::io(path, e))?;
    Ok(())
}

/// Writes the full table and the passing subset to their paths.
pub fn write_report(report: &RankReport, full: &Path, passing: &Path) -> Result<(), SiftError> {
    write_table(&report.rows, report.dialect, full)?;
    write_table(&report.passing, report.dialect, passing)?;
    info!(
        "Wrote {} row(s) to {} and {} passing row(s) to {}.",
        report.rows.len(),
        full.display(),
        report.passing.len(),
        passing.display()
    );
    Ok(())
}
