use crate::core::models::job::{JobRecord, JobStatus, ModelResult};
use crate::engine::adapters::{DialectAdapter, SchemaAdapter};
use crate::engine::config::ScanConfig;
use crate::engine::error::SiftError;
use crate::engine::locator::{DiscoveredJob, locate_jobs};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::recover::recover_roles;
use crate::engine::resolver::ScoreResolver;
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Scans a batch root: discovers candidate job directories, parses each
/// one through its dialect adapter, resolves representative scores, and
/// recovers role-keyed sequences.
///
/// Jobs are independent and processed in parallel; every per-job
/// failure is captured on that record's status. Only an unreadable root
/// aborts the scan.
#[instrument(skip_all, name = "scan_workflow")]
pub fn run(
    root: &Path,
    config: &ScanConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<JobRecord>, SiftError> {
    let jobs = locate_jobs(root, &config.discovery)?;
    info!(
        "Discovered {} candidate job(s) under {}.",
        jobs.len(),
        root.display()
    );
    reporter.report(Progress::ScanStart {
        total_jobs: jobs.len() as u64,
    });

    let adapter = DialectAdapter::from(config.dialect);
    let resolver = ScoreResolver::new(config.resolver.clone());

    let records: Vec<JobRecord> = jobs
        .par_iter()
        .map(|job| {
            let record = process_job(job, &adapter, &resolver, config);
            if let Some(reason) = &record.failure {
                warn!("{}: {} ({})", record.candidate_id, record.status, reason);
            }
            reporter.report(Progress::JobFinished);
            record
        })
        .collect();

    reporter.report(Progress::ScanFinish);
    Ok(records)
}

/// Runs the full per-job pipeline. Never panics or errors out: any
/// failure becomes the record's status and the batch moves on.
fn process_job(
    job: &DiscoveredJob,
    adapter: &DialectAdapter,
    resolver: &ScoreResolver,
    config: &ScanConfig,
) -> JobRecord {
    let mut record = JobRecord::new(&job.candidate_id, config.dialect, job.path.clone());

    // Sequences first: the Boltz adapter validates matrix shape against
    // the declared chain lengths. A missing sequence source is not yet
    // fatal; the score side may still resolve (Partial).
    let sequence_failure = match adapter
        .locate_sequence_source(&job.path)
        .and_then(|source| adapter.parse_sequences(&source))
    {
        Ok(table) => {
            record.sequences = table;
            None
        }
        Err(e) => Some(e),
    };
    let expected_residues = if record.sequences.is_empty() {
        None
    } else {
        Some(record.sequences.values().map(|seq| seq.len()).sum())
    };

    let artifacts = match adapter.locate_confidence_artifacts(&job.path) {
        Ok(artifacts) => artifacts,
        Err(e) => return fail(record, e),
    };
    for (model_index, model_artifacts) in artifacts {
        match adapter.parse_confidence(&model_artifacts, expected_residues) {
            Ok(score) => record.models.push(ModelResult {
                model_index,
                score,
                artifacts: model_artifacts,
            }),
            Err(e) => return fail(record, e),
        }
    }

    if let Err(e) = resolver.resolve(&mut record) {
        return fail(record, e);
    }
    if record.representative_score().is_none() {
        record.status = JobStatus::ParseError;
        record.failure = Some("no model produced a confidence scalar".to_string());
        return record;
    }

    match sequence_failure {
        Some(e) => {
            record.status = JobStatus::Partial;
            record.failure = Some(e.to_string());
        }
        None => match recover_roles(config.dialect, &record.sequences) {
            Ok(roles) => {
                record.roles = roles;
                record.status = JobStatus::Complete;
            }
            Err(e) => {
                record.status = e.job_status();
                record.failure = Some(e.to_string());
            }
        },
    }
    record
}

fn fail(mut record: JobRecord, error: SiftError) -> JobRecord {
    record.status = error.job_status();
    record.failure = Some(error.to_string());
    record
}
