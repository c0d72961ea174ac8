use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Severity classification for pipeline events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MergeSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (sheet skipped, checksum degraded).
    Warning,
    /// Error-level event (file excluded, sheet unreadable, run failed).
    Error,
}

/// Pipeline events emitted during a merge run.
///
/// Each run owns its observer; there is no process-wide logger, so concurrent
/// runs in one process never interleave on shared handler state.
#[derive(Debug, Clone)]
pub enum MergeEvent {
    RunStarted { file_count: usize },
    FileRejected { path: PathBuf, reason: String },
    ChecksumFailed { path: PathBuf, message: String },
    SheetProcessed { filename: String, sheet: String, rows: usize },
    SheetSkipped { filename: String, sheet: String, reason: String },
    SheetFailed { filename: String, sheet: String, error: String },
    FileProcessed { filename: String, sheets: usize, rows: usize },
    FileFailed { filename: String, error: String },
    MergeCompleted { frames: usize, rows: usize },
    OutputWritten { path: PathBuf },
    RunFinished { success: bool, elapsed_secs: f64 },
}

impl MergeEvent {
    /// Severity of this event.
    pub fn severity(&self) -> MergeSeverity {
        match self {
            MergeEvent::RunStarted { .. }
            | MergeEvent::SheetProcessed { .. }
            | MergeEvent::FileProcessed { .. }
            | MergeEvent::MergeCompleted { .. }
            | MergeEvent::OutputWritten { .. } => MergeSeverity::Info,
            MergeEvent::ChecksumFailed { .. } | MergeEvent::SheetSkipped { .. } => {
                MergeSeverity::Warning
            }
            MergeEvent::FileRejected { .. }
            | MergeEvent::SheetFailed { .. }
            | MergeEvent::FileFailed { .. } => MergeSeverity::Error,
            MergeEvent::RunFinished { success, .. } => {
                if *success {
                    MergeSeverity::Info
                } else {
                    MergeSeverity::Error
                }
            }
        }
    }
}

/// Observer hook for merge pipeline events.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait MergeObserver: Send + Sync {
    /// Called once per pipeline event, in emission order.
    fn on_event(&self, event: &MergeEvent);
}

/// Forward an event to an optional observer.
pub(crate) fn emit(observer: Option<&dyn MergeObserver>, event: MergeEvent) {
    if let Some(obs) = observer {
        obs.on_event(&event);
    }
}

/// An observer that fans out events to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn MergeObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn MergeObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl MergeObserver for CompositeObserver {
    fn on_event(&self, event: &MergeEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}

/// Logs merge events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl MergeObserver for StdErrObserver {
    fn on_event(&self, event: &MergeEvent) {
        eprintln!("[merge][{:?}] {event:?}", event.severity());
    }
}

/// Appends merge events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl MergeObserver for FileObserver {
    fn on_event(&self, event: &MergeEvent) {
        self.append_line(&format!(
            "{} {:?} {event:?}",
            unix_ts(),
            event.severity()
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
