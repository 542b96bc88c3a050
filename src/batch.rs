//! Analyze several CSV exports in one run.
//!
//! Inputs are independent: each runs the full pipeline via [`analyze_path`] on a bounded
//! `rayon` pool and yields its own [`BatchOutcome`]. A bad file never aborts its neighbours.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{analyze_path, AnalysisOptions, AnalysisReport};

/// Configuration for [`analyze_all`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Number of worker threads.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

/// Result of analyzing one input of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: PipelineResult<AnalysisReport>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Artifact directory for this input under `root`: `root/<file stem>`.
    pub fn artifact_dir(&self, root: &Path) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        root.join(stem)
    }
}

/// Analyze every path, returning one outcome per input in input order.
///
/// Fails only if the worker pool cannot be built.
pub fn analyze_all(
    paths: &[PathBuf],
    options: &AnalysisOptions,
    batch: &BatchOptions,
) -> PipelineResult<Vec<BatchOutcome>> {
    let n_threads = batch
        .num_threads
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
        .clamp(1, paths.len().max(1));

    let pool = ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()
        .map_err(|e| PipelineError::Io(io::Error::other(format!("failed to build worker pool: {e}"))))?;

    Ok(pool.install(|| {
        paths
            .par_iter()
            .map(|path| BatchOutcome {
                path: path.clone(),
                result: analyze_path(path, options),
            })
            .collect()
    }))
}
