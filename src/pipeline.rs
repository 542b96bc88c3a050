//! Unified analysis entrypoint.
//!
//! Most callers should use [`analyze_path`] (batch) or [`analyze_bytes`] (uploads). Both run the
//! four stages in order, Loader → Normalizer → Analyzer → Visualizer, and either return a full
//! [`AnalysisReport`] or the first [`crate::PipelineError`]. No partial report is ever returned.
//!
//! If an [`PipelineObserver`] is configured, stage completion, success, failure and alerts are
//! reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::PipelineResult;
use crate::ingestion::{self, PipelineObserver, PipelineSeverity, RunContext, RunStats, Stage};
use crate::processing::{self, ColumnSummary, PlatformEngagement, Statistics, TopPost, VerifiedUser};
use crate::schema::VERIFIED;
use crate::types::PostTable;
use crate::visualize::{self, Chart, DEFAULT_HISTOGRAM_BINS};

/// Number of rows kept by the top-posts and top-verified rankings by default.
pub const DEFAULT_TOP_N: usize = 5;

/// Options controlling an analysis run.
///
/// Use [`Default`] for the standard report.
#[derive(Clone)]
pub struct AnalysisOptions {
    /// Length of the top-posts and top-verified-users rankings.
    pub top_n: usize,
    /// Number of equal-width bins for both histograms.
    pub histogram_bins: usize,
    /// Exact verification value that marks a verified account.
    pub verified_marker: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: PipelineSeverity,
}

impl fmt::Debug for AnalysisOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisOptions")
            .field("top_n", &self.top_n)
            .field("histogram_bins", &self.histogram_bins)
            .field("verified_marker", &self.verified_marker)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            verified_marker: VERIFIED.to_string(),
            observer: None,
            alert_at_or_above: PipelineSeverity::Critical,
        }
    }
}

/// Everything one run produces: the analyzed table, its aggregates, and the four charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Where the input came from (file path or upload name).
    pub source: PathBuf,
    /// Normalized input with `Total_Engagement` appended.
    pub table: PostTable,
    pub statistics: Statistics,
    pub top_posts: Vec<TopPost>,
    pub platform_engagement: Vec<PlatformEngagement>,
    pub top_verified: Vec<VerifiedUser>,
    pub charts: Vec<Chart>,
}

impl AnalysisReport {
    /// Summary for one engagement column, if the table had rows.
    pub fn summary(&self, column: &str) -> Option<&ColumnSummary> {
        self.statistics.get(column)
    }
}

/// Analyze a CSV file on disk.
///
/// # Examples
///
/// ```no_run
/// use social_engagement::pipeline::{analyze_path, AnalysisOptions};
///
/// # fn main() -> Result<(), social_engagement::PipelineError> {
/// let report = analyze_path("social_media_data.csv", &AnalysisOptions::default())?;
/// for post in &report.top_posts {
///     println!("{} {} {}", post.username, post.platform, post.total_engagement);
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (stderr logging + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use social_engagement::ingestion::{PipelineSeverity, StdErrObserver};
/// use social_engagement::pipeline::{analyze_path, AnalysisOptions};
///
/// let opts = AnalysisOptions {
///     observer: Some(Arc::new(StdErrObserver::default())),
///     alert_at_or_above: PipelineSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are Critical and trigger `on_alert` at this threshold.
/// let _err = analyze_path("does_not_exist.csv", &opts).unwrap_err();
/// ```
pub fn analyze_path(path: impl AsRef<Path>, options: &AnalysisOptions) -> PipelineResult<AnalysisReport> {
    let path = path.as_ref();
    let ctx = RunContext {
        source: path.to_path_buf(),
    };
    observe(&ctx, options, || {
        let table = ingestion::load_csv_from_path(path)?;
        stage_done(&ctx, options, Stage::Load);
        run_stages(&ctx, table, options)
    })
}

/// Analyze CSV content already held in memory, e.g. an uploaded file.
///
/// `name` only identifies the input in reports and observer events.
pub fn analyze_bytes(
    name: impl AsRef<Path>,
    bytes: &[u8],
    options: &AnalysisOptions,
) -> PipelineResult<AnalysisReport> {
    let ctx = RunContext {
        source: name.as_ref().to_path_buf(),
    };
    observe(&ctx, options, || {
        let table = ingestion::load_csv_from_bytes(bytes)?;
        stage_done(&ctx, options, Stage::Load);
        run_stages(&ctx, table, options)
    })
}

/// Run the normalize, analyze and visualize stages on an already loaded table.
pub fn analyze_table(
    source: impl AsRef<Path>,
    table: PostTable,
    options: &AnalysisOptions,
) -> PipelineResult<AnalysisReport> {
    let ctx = RunContext {
        source: source.as_ref().to_path_buf(),
    };
    observe(&ctx, options, || run_stages(&ctx, table, options))
}

fn run_stages(ctx: &RunContext, table: PostTable, options: &AnalysisOptions) -> PipelineResult<AnalysisReport> {
    let table = processing::normalize_columns(table);
    stage_done(ctx, options, Stage::Normalize);

    let analysis = processing::analyze(table, options)?;
    stage_done(ctx, options, Stage::Analyze);

    let charts = visualize::visualize(&analysis.table, &analysis.platform_engagement, options.histogram_bins)?;
    stage_done(ctx, options, Stage::Visualize);

    Ok(AnalysisReport {
        source: ctx.source.clone(),
        table: analysis.table,
        statistics: analysis.statistics,
        top_posts: analysis.top_posts,
        platform_engagement: analysis.platform_engagement,
        top_verified: analysis.top_verified,
        charts,
    })
}

fn stage_done(ctx: &RunContext, options: &AnalysisOptions, stage: Stage) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_stage(ctx, stage);
    }
}

fn observe<F>(ctx: &RunContext, options: &AnalysisOptions, run: F) -> PipelineResult<AnalysisReport>
where
    F: FnOnce() -> PipelineResult<AnalysisReport>,
{
    let result = run();

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(report) => obs.on_success(
                ctx,
                RunStats {
                    rows: report.table.row_count(),
                    charts: report.charts.len(),
                },
            ),
            Err(e) => {
                let sev = PipelineSeverity::for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }

    result
}
