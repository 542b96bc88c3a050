use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PipelineError;

/// Severity of a failed run, used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// The run failed on input that could be read.
    Error,
    /// Missing file, I/O or rendering failure.
    Critical,
}

impl PipelineSeverity {
    /// Severity for a failed run.
    ///
    /// Anything that prevents reading the input at all is `Critical`; validation failures on
    /// input that could be read are `Error`.
    pub fn for_error(error: &PipelineError) -> Self {
        match error {
            PipelineError::FileNotFound { .. } | PipelineError::Io(_) | PipelineError::Render { .. } => {
                Self::Critical
            }
            PipelineError::Parse { .. }
            | PipelineError::MissingColumn { .. }
            | PipelineError::TypeError { .. } => Self::Error,
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    Analyze,
    Visualize,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Normalize => "normalize",
            Stage::Analyze => "analyze",
            Stage::Visualize => "visualize",
        }
    }
}

/// Context about one analysis run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Where the input came from: a file path, or the name of an upload.
    pub source: PathBuf,
}

/// Minimal stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Number of analyzed rows.
    pub rows: usize,
    /// Number of chart artifacts produced.
    pub charts: usize,
}

/// Observer interface for pipeline outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage finishes successfully.
    fn on_stage(&self, _ctx: &RunContext, _stage: Stage) {}

    /// Called when the whole run succeeds.
    fn on_success(&self, _ctx: &RunContext, _stats: RunStats) {}

    /// Called when the run fails.
    fn on_failure(&self, _ctx: &RunContext, _severity: PipelineSeverity, _error: &PipelineError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &RunContext, severity: PipelineSeverity, error: &PipelineError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
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

impl PipelineObserver for CompositeObserver {
    fn on_stage(&self, ctx: &RunContext, stage: Stage) {
        for o in &self.observers {
            o.on_stage(ctx, stage);
        }
    }

    fn on_success(&self, ctx: &RunContext, stats: RunStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &RunContext, severity: PipelineSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &RunContext, severity: PipelineSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// One observer callback, rendered as a `key=value` log line by the built-in observers.
enum Event<'a> {
    Stage(Stage),
    Success(RunStats),
    Failure(PipelineSeverity, &'a PipelineError),
    Alert(PipelineSeverity, &'a PipelineError),
}

impl Event<'_> {
    fn render(&self, ctx: &RunContext) -> String {
        let source = ctx.source.display();
        match self {
            Event::Stage(stage) => format!("stage={} source={source}", stage.as_str()),
            Event::Success(stats) => format!("ok source={source} rows={} charts={}", stats.rows, stats.charts),
            Event::Failure(sev, err) => format!("fail severity={sev:?} source={source} err={err}"),
            Event::Alert(sev, err) => format!("ALERT severity={sev:?} source={source} err={err}"),
        }
    }
}

/// Logs pipeline events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver {
    /// Also log each completed stage.
    pub verbose: bool,
}

impl StdErrObserver {
    fn emit(&self, ctx: &RunContext, event: Event<'_>) {
        eprintln!("[social-engagement] {}", event.render(ctx));
    }
}

impl PipelineObserver for StdErrObserver {
    fn on_stage(&self, ctx: &RunContext, stage: Stage) {
        if self.verbose {
            self.emit(ctx, Event::Stage(stage));
        }
    }

    fn on_success(&self, ctx: &RunContext, stats: RunStats) {
        self.emit(ctx, Event::Success(stats));
    }

    fn on_failure(&self, ctx: &RunContext, severity: PipelineSeverity, error: &PipelineError) {
        self.emit(ctx, Event::Failure(severity, error));
    }

    fn on_alert(&self, ctx: &RunContext, severity: PipelineSeverity, error: &PipelineError) {
        self.emit(ctx, Event::Alert(severity, error));
    }
}

/// Appends pipeline events to a local log file, one line per event prefixed with a unix timestamp.
///
/// Writes are best-effort; a log file that cannot be opened never fails a run.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn emit(&self, ctx: &RunContext, event: Event<'_>) {
        let line = event.render(ctx);
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{ts} {line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_stage(&self, ctx: &RunContext, stage: Stage) {
        self.emit(ctx, Event::Stage(stage));
    }

    fn on_success(&self, ctx: &RunContext, stats: RunStats) {
        self.emit(ctx, Event::Success(stats));
    }

    fn on_failure(&self, ctx: &RunContext, severity: PipelineSeverity, error: &PipelineError) {
        self.emit(ctx, Event::Failure(severity, error));
    }

    fn on_alert(&self, ctx: &RunContext, severity: PipelineSeverity, error: &PipelineError) {
        self.emit(ctx, Event::Alert(severity, error));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Event, PipelineSeverity, RunContext, RunStats, Stage};
    use crate::error::PipelineError;

    #[test]
    fn severity_follows_error_class() {
        let missing = PipelineError::FileNotFound {
            path: PathBuf::from("x.csv"),
        };
        let column = PipelineError::MissingColumn {
            column: "Platform".to_string(),
        };
        assert_eq!(PipelineSeverity::for_error(&missing), PipelineSeverity::Critical);
        assert_eq!(PipelineSeverity::for_error(&column), PipelineSeverity::Error);
        assert!(PipelineSeverity::Critical > PipelineSeverity::Error);

        let parse = PipelineError::Parse {
            message: "row 2: bad quote".to_string(),
        };
        let io = PipelineError::Io(std::io::Error::other("disk"));
        assert_eq!(PipelineSeverity::for_error(&parse), PipelineSeverity::Error);
        assert_eq!(PipelineSeverity::for_error(&io), PipelineSeverity::Critical);
    }

    #[test]
    fn events_render_as_key_value_lines() {
        let ctx = RunContext {
            source: PathBuf::from("posts.csv"),
        };
        let err = PipelineError::MissingColumn {
            column: "Platform".to_string(),
        };

        assert_eq!(Event::Stage(Stage::Analyze).render(&ctx), "stage=analyze source=posts.csv");
        assert_eq!(
            Event::Success(RunStats { rows: 3, charts: 4 }).render(&ctx),
            "ok source=posts.csv rows=3 charts=4"
        );
        assert_eq!(
            Event::Alert(PipelineSeverity::Error, &err).render(&ctx),
            "ALERT severity=Error source=posts.csv err=missing column 'Platform'"
        );
    }
}
