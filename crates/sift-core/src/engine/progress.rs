/// Progress events emitted while a batch scan runs. Consumers (the CLI
/// progress bar, tests) subscribe through a callback; the engine never
/// prints.
#[derive(Debug, Clone)]
pub enum Progress {
    /// Discovery finished; `total_jobs` candidates will be processed.
    ScanStart { total_jobs: u64 },
    /// One candidate finished (any status).
    JobFinished,
    /// All candidates processed.
    ScanFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn silent_reporter_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::ScanStart { total_jobs: 3 });
    }

    #[test]
    fn callback_receives_every_event() {
        let count = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|_| {
            count.fetch_add(1, Ordering::SeqCst);
        }));
        reporter.report(Progress::ScanStart { total_jobs: 2 });
        reporter.report(Progress::JobFinished);
        reporter.report(Progress::ScanFinish);
        drop(reporter);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
