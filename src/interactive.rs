//! Interactive mode: analyze one upload after another without ever terminating on bad input.
//!
//! [`AnalysisSession`] turns every [`crate::PipelineError`] into a retryable
//! [`UploadOutcome::Retry`], leaving the session ready for the next upload. Runs share no state
//! apart from the session's counters.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::ErrorKind;
use crate::pipeline::{analyze_bytes, analyze_path, AnalysisOptions, AnalysisReport};
use crate::report;

/// Result of submitting one upload.
#[derive(Debug)]
pub enum UploadOutcome {
    /// The run succeeded.
    Ready(Box<AnalysisReport>),
    /// The run failed; the caller should show `message` and wait for another upload.
    Retry { kind: ErrorKind, message: String },
}

impl UploadOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, UploadOutcome::Ready(_))
    }
}

/// Counters for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// Accepts uploads one at a time.
#[derive(Debug)]
pub struct AnalysisSession {
    options: AnalysisOptions,
    artifacts_dir: Option<PathBuf>,
    stats: SessionStats,
}

impl AnalysisSession {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            artifacts_dir: None,
            stats: SessionStats::default(),
        }
    }

    /// Also write chart and report artifacts for every successful run into `dir`.
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Analyze uploaded CSV bytes.
    pub fn submit_upload(&mut self, name: &str, bytes: &[u8]) -> UploadOutcome {
        let result = analyze_bytes(name, bytes, &self.options);
        self.settle(result)
    }

    /// Analyze a CSV file on disk.
    pub fn submit_path(&mut self, path: impl AsRef<Path>) -> UploadOutcome {
        let result = analyze_path(path, &self.options);
        self.settle(result)
    }

    fn settle(&mut self, result: crate::PipelineResult<AnalysisReport>) -> UploadOutcome {
        match result {
            Ok(report) => {
                self.stats.accepted += 1;
                UploadOutcome::Ready(Box::new(report))
            }
            Err(e) => {
                self.stats.rejected += 1;
                UploadOutcome::Retry {
                    kind: e.kind(),
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Read CSV paths from `input` one per line and analyze each, until EOF or `quit`/`exit`.
///
/// Reports (or errors) are written to `output`. Failed runs never end the loop; only I/O errors
/// on `input`/`output` do.
pub fn run_prompt_loop<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    session: &mut AnalysisSession,
) -> io::Result<SessionStats> {
    write!(output, "csv path> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let path = line.trim();
        match path {
            "" => {}
            "quit" | "exit" => break,
            _ => match session.submit_path(path) {
                UploadOutcome::Ready(report) => {
                    output.write_all(report::render_text(&report).as_bytes())?;
                    if let Some(dir) = session.artifacts_dir.clone() {
                        match report::write_artifacts(&report, &dir) {
                            Ok(written) => writeln!(output, "\nwrote {} files to {}", written.len(), dir.display())?,
                            Err(e) => writeln!(output, "\ncould not write artifacts: {e}")?,
                        }
                    }
                    writeln!(output, "\nAnalysis complete!")?;
                }
                UploadOutcome::Retry { message, .. } => {
                    writeln!(output, "error: {message}")?;
                    writeln!(output, "Please provide another CSV file.")?;
                }
            },
        }
        write!(output, "csv path> ")?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(session.stats())
}
