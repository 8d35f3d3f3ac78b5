use crate::core::io::score_table;
use crate::core::models::job::JobRecord;
use crate::engine::cache::{CacheKey, ScoreCache};
use crate::engine::config::ResolverConfig;
use crate::engine::error::SiftError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Produces the one representative scalar per job.
///
/// Models that already carry a scalar (Af3) only need selection; models
/// without one (Boltz) first get their scalar computed by the external
/// interface-score tool, serialized per (job, model) through the cache.
pub struct ScoreResolver {
    config: ResolverConfig,
    cache: ScoreCache,
}

impl ScoreResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            cache: ScoreCache::new(),
        }
    }

    /// Fills missing model scalars and designates the representative
    /// model: the maximum scalar, ties broken by lowest model index.
    pub fn resolve(&self, record: &mut JobRecord) -> Result<(), SiftError> {
        let pair = record.dialect.interface_pair();
        for model in &mut record.models {
            if model.score.is_some() {
                continue;
            }
            let Some(pae) = model.artifacts.pae_matrix.clone() else {
                // Direct-scalar dialects never reach here with a missing
                // score; a model that does is a truncated job.
                return Err(SiftError::MissingArtifact {
                    path: model.artifacts.confidence.clone(),
                });
            };
            let key = CacheKey {
                candidate_id: record.candidate_id.clone(),
                model_index: model.model_index,
            };
            let score = self.cache.with_key_lock(&key, || {
                self.compute_interface_score(&pae, &model.artifacts.confidence, pair)
            })?;
            model.score = Some(score);
        }

        record.representative = select_representative(record);
        Ok(())
    }

    /// Runs (or reuses) one external-tool invocation and extracts the
    /// interface metric for the target-binder chain pair.
    fn compute_interface_score(
        &self,
        pae: &Path,
        confidence: &Path,
        pair: (char, char),
    ) -> Result<f64, SiftError> {
        let table_path = score_table_path(pae);
        let text = if !self.config.force_recompute
            && ScoreCache::is_fresh(&table_path, &[pae, confidence])
        {
            debug!("Reusing cached score table {}", table_path.display());
            fs::read_to_string(&table_path).map_err(|e| SiftError::io(&table_path, e))?
        } else {
            let text = self.invoke_with_retry(pae, confidence, pair)?;
            fs::write(&table_path, &text).map_err(|e| SiftError::io(&table_path, e))?;
            text
        };

        let rows = score_table::parse_score_table(&text, &self.config.metric_column, &table_path)?;
        let metric = score_table::interface_metric(&rows, pair).ok_or_else(|| {
            SiftError::parse(
                &table_path,
                format!("no row for chain pair {}-{}", pair.0, pair.1),
            )
        })?;
        Ok(metric.clamp(0.0, 1.0))
    }

    /// One retry with identical inputs for transient subprocess issues.
    /// Timeouts are not retried: a second attempt would double the hang.
    fn invoke_with_retry(
        &self,
        pae: &Path,
        confidence: &Path,
        pair: (char, char),
    ) -> Result<String, SiftError> {
        match self.invoke(pae, confidence, pair) {
            Ok(text) => Ok(text),
            Err(timeout @ SiftError::ToolTimeout { .. }) => Err(timeout),
            Err(first) => {
                warn!("Interface-score tool failed, retrying once: {}", first);
                self.invoke(pae, confidence, pair)
            }
        }
    }

    fn invoke(&self, pae: &Path, confidence: &Path, pair: (char, char)) -> Result<String, SiftError> {
        let (program, args) = self
            .config
            .score_cmd
            .split_first()
            .ok_or_else(|| SiftError::Config("score command is empty".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .arg(pae)
            .arg(confidence)
            .arg(pair.0.to_string())
            .arg(pair.1.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SiftError::ExternalTool {
                reason: format!("failed to spawn '{}': {}", program, e),
            })?;

        let deadline = Instant::now() + self.config.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SiftError::ToolTimeout {
                        seconds: self.config.timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(SiftError::ExternalTool {
                        reason: format!("failed to poll tool process: {}", e),
                    });
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SiftError::ExternalTool {
                reason: format!("failed to collect tool output: {}", e),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SiftError::ExternalTool {
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Where the tool's table is cached: next to the matrix it was computed
/// from, so the freshness rule can compare sibling mtimes.
fn score_table_path(pae: &Path) -> PathBuf {
    pae.with_extension("txt")
}

/// Index of the model with the maximum scalar; ties go to the lowest
/// model index (models are ordered by index, and only a strictly
/// greater scalar displaces the current best).
fn select_representative(record: &JobRecord) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, model) in record.models.iter().enumerate() {
        let Some(score) = model.score else {
            continue;
        };
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::Dialect;
    use crate::core::models::job::{ModelArtifacts, ModelResult};

    fn record_with_scores(scores: &[Option<f64>]) -> JobRecord {
        let mut record = JobRecord::new("binder_1", Dialect::Af3, PathBuf::from("binder_1"));
        for (index, score) in scores.iter().enumerate() {
            record.models.push(ModelResult {
                model_index: index,
                score: *score,
                artifacts: ModelArtifacts {
                    confidence: PathBuf::from(format!("summary_{}.json", index)),
                    pae_matrix: None,
                },
            });
        }
        record
    }

    #[test]
    fn representative_is_the_maximum_scalar() {
        let record = record_with_scores(&[Some(0.42), Some(0.91), Some(0.77)]);
        assert_eq!(select_representative(&record), Some(1));
    }

    #[test]
    fn exact_ties_pick_the_lowest_model_index() {
        let record = record_with_scores(&[Some(0.8), Some(0.8), Some(0.8)]);
        assert_eq!(select_representative(&record), Some(0));
    }

    #[test]
    fn unscored_models_are_ignored() {
        let record = record_with_scores(&[None, Some(0.3), None]);
        assert_eq!(select_representative(&record), Some(1));
        let record = record_with_scores(&[None, None]);
        assert_eq!(select_representative(&record), None);
    }

    fn boltz_record(dir: &Path) -> JobRecord {
        let pae = dir.join("pae_input_model_0.npz");
        let conf = dir.join("confidence_input_model_0.json");
        // Rewriting the inputs would bump their mtimes and invalidate
        // any cached table, so only seed them once per tempdir.
        if !pae.exists() {
            std::fs::write(&pae, b"matrix bytes").unwrap();
            std::fs::write(&conf, r#"{"iptm": 0.5}"#).unwrap();
        }

        let mut record = JobRecord::new("binder_1", Dialect::Boltz, dir.to_path_buf());
        record.models.push(ModelResult {
            model_index: 0,
            score: None,
            artifacts: ModelArtifacts {
                confidence: conf,
                pae_matrix: Some(pae),
            },
        });
        record
    }

    fn config_with_cmd(cmd: &[&str]) -> ResolverConfig {
        ResolverConfig {
            score_cmd: cmd.iter().map(|s| s.to_string()).collect(),
            ..ResolverConfig::default()
        }
    }

    const FAKE_TABLE_CMD: &str = "printf 'Chn1 Chn2 Type ipSAE\\nA B max 0.8123\\n'";

    #[test]
    fn external_tool_output_becomes_the_model_scalar() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = boltz_record(dir.path());

        let resolver = ScoreResolver::new(config_with_cmd(&["sh", "-c", FAKE_TABLE_CMD]));
        resolver.resolve(&mut record).unwrap();

        assert_eq!(record.models[0].score, Some(0.8123));
        assert_eq!(record.representative, Some(0));
        assert!(dir.path().join("pae_input_model_0.txt").is_file());
    }

    #[test]
    fn fresh_cached_table_skips_the_tool_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = boltz_record(dir.path());

        // Warm the cache with a working tool, then swap in one that
        // always fails; the cached table must keep satisfying resolves.
        let resolver = ScoreResolver::new(config_with_cmd(&["sh", "-c", FAKE_TABLE_CMD]));
        resolver.resolve(&mut record).unwrap();

        let mut rerun = boltz_record(dir.path());
        let failing = ScoreResolver::new(config_with_cmd(&["false"]));
        failing.resolve(&mut rerun).unwrap();
        assert_eq!(rerun.models[0].score, Some(0.8123));
    }

    #[test]
    fn forced_recompute_ignores_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = boltz_record(dir.path());

        let resolver = ScoreResolver::new(config_with_cmd(&["sh", "-c", FAKE_TABLE_CMD]));
        resolver.resolve(&mut record).unwrap();

        let mut rerun = boltz_record(dir.path());
        let mut config = config_with_cmd(&["false"]);
        config.force_recompute = true;
        let failing = ScoreResolver::new(config);
        assert!(matches!(
            failing.resolve(&mut rerun),
            Err(SiftError::ExternalTool { .. })
        ));
    }

    #[test]
    fn transient_failure_is_retried_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = boltz_record(dir.path());
        let marker = dir.path().join("attempted");

        // Fails on the first attempt, succeeds on the second.
        let script = format!(
            "if [ -f {m} ]; then {table}; else touch {m}; exit 1; fi",
            m = marker.display(),
            table = FAKE_TABLE_CMD
        );
        let resolver = ScoreResolver::new(config_with_cmd(&["sh", "-c", &script]));
        resolver.resolve(&mut record).unwrap();
        assert_eq!(record.models[0].score, Some(0.8123));
    }

    #[test]
    fn slow_tool_times_out_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = boltz_record(dir.path());

        let mut config = config_with_cmd(&["sh", "-c", "sleep 5"]);
        config.timeout = Duration::from_millis(200);
        let resolver = ScoreResolver::new(config);

        let start = Instant::now();
        let result = resolver.resolve(&mut record);
        assert!(matches!(result, Err(SiftError::ToolTimeout { .. })));
        // A retry would have waited through a second timeout.
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(record.models[0].score, None);
    }
}
