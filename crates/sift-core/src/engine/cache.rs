use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Identity of one external-tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub candidate_id: String,
    pub model_index: usize,
}

/// Serializes external-tool invocations per (job, model) key and
/// answers freshness questions about cached output artifacts.
///
/// Jobs are processed in parallel, so two workers may ask for the same
/// key when discovery rules overlap; the per-key mutex guarantees
/// at most one concurrent invocation per key while leaving distinct
/// keys fully parallel.
#[derive(Debug, Default)]
pub struct ScoreCache {
    inflight: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding this key's lock.
    pub fn with_key_lock<T>(&self, key: &CacheKey, f: impl FnOnce() -> T) -> T {
        let guard = {
            let mut inflight = self.inflight.lock().expect("inflight map poisoned");
            Arc::clone(inflight.entry(key.clone()).or_default())
        };
        let _held = guard.lock().expect("key lock poisoned");
        f()
    }

    /// Whether `output` exists and is at least as new as every input.
    /// Unreadable metadata counts as stale, forcing recomputation.
    pub fn is_fresh(output: &Path, inputs: &[&Path]) -> bool {
        let Some(output_mtime) = mtime(output) else {
            return false;
        };
        inputs
            .iter()
            .all(|input| mtime(input).is_some_and(|t| t <= output_mtime))
    }
}

fn mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}
