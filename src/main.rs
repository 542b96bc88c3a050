use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use social_engagement::batch::{analyze_all, BatchOptions};
use social_engagement::ingestion::{CompositeObserver, FileObserver, PipelineObserver, StdErrObserver};
use social_engagement::interactive::{run_prompt_loop, AnalysisSession};
use social_engagement::pipeline::{analyze_path, AnalysisOptions, DEFAULT_TOP_N};
use social_engagement::report::{render_text, write_artifacts};
use social_engagement::visualize::DEFAULT_HISTOGRAM_BINS;

/// Social media engagement analysis
#[derive(Parser)]
#[command(name = "social-engagement")]
#[command(about = "Analyze engagement metrics, top posts and verified users from a CSV export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one or more CSV files and exit (non-zero exit status on failure)
    Analyze {
        /// CSV files to analyze
        #[arg(default_value = "social_media_data.csv", num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Worker threads when several files are given (default: available parallelism).
        /// Has no effect with a single file.
        #[arg(long, short)]
        jobs: Option<usize>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Read CSV paths from stdin and analyze each; bad files are reported and the prompt continues
    Interactive {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Directory for report.json and chart files (SVG + Vega-Lite)
    #[arg(long, short, env = "SOCIAL_ENGAGEMENT_OUT")]
    out: Option<PathBuf>,

    /// Length of the top-posts and top-verified-users rankings
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    bins: usize,

    /// Append pipeline events to this file
    #[arg(long, env = "SOCIAL_ENGAGEMENT_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log every pipeline stage to stderr
    #[arg(long, short)]
    verbose: bool,

    /// Do not log pipeline events to stderr
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

impl RunArgs {
    fn options(&self) -> AnalysisOptions {
        let mut observers: Vec<Arc<dyn PipelineObserver>> = Vec::new();
        if !self.quiet {
            observers.push(Arc::new(StdErrObserver { verbose: self.verbose }));
        }
        if let Some(path) = &self.log_file {
            observers.push(Arc::new(FileObserver::new(path)));
        }

        AnalysisOptions {
            top_n: self.top,
            histogram_bins: self.bins,
            observer: (!observers.is_empty())
                .then(|| Arc::new(CompositeObserver::new(observers)) as Arc<dyn PipelineObserver>),
            ..Default::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Warning shown when `--jobs` is given but there is nothing to parallelize.
fn ignored_jobs_note(inputs: usize, jobs: Option<usize>) -> Option<String> {
    match jobs {
        Some(n) if inputs < 2 => Some(format!("warning: --jobs {n} has no effect with a single input file")),
        _ => None,
    }
}

fn analyze_one(path: &Path, run: &RunArgs) -> Result<()> {
    let report = analyze_path(path, &run.options())
        .with_context(|| format!("failed to analyze '{}'", path.display()))?;
    print!("{}", render_text(&report));
    if let Some(dir) = &run.out {
        let written = write_artifacts(&report, dir)
            .with_context(|| format!("failed to write artifacts to '{}'", dir.display()))?;
        println!("\nwrote {} files to {}", written.len(), dir.display());
    }
    println!("\nAnalysis complete!");
    Ok(())
}

fn analyze_many(paths: &[PathBuf], jobs: Option<usize>, run: &RunArgs) -> Result<()> {
    let outcomes = analyze_all(paths, &run.options(), &BatchOptions { num_threads: jobs })?;

    let mut failed = 0usize;
    for outcome in &outcomes {
        println!("== {} ==", outcome.path.display());
        match &outcome.result {
            Ok(report) => {
                print!("{}", render_text(report));
                if let Some(root) = &run.out {
                    let dir = outcome.artifact_dir(root);
                    let written = write_artifacts(report, &dir)
                        .with_context(|| format!("failed to write artifacts to '{}'", dir.display()))?;
                    println!("\nwrote {} files to {}", written.len(), dir.display());
                }
                println!();
            }
            Err(e) => {
                failed += 1;
                println!("error: {e}\n");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed", outcomes.len());
    }
    println!("Analysis complete!");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze { paths, jobs, run } => match paths.as_slice() {
            [path] => {
                if let Some(note) = ignored_jobs_note(paths.len(), jobs) {
                    eprintln!("{note}");
                }
                analyze_one(path, &run)
            }
            _ => analyze_many(&paths, jobs, &run),
        },
        Command::Interactive { run } => {
            let mut session = AnalysisSession::new(run.options());
            if let Some(dir) = &run.out {
                session = session.with_artifacts_dir(dir);
            }
            let stats = run_prompt_loop(io::stdin().lock(), io::stdout().lock(), &mut session)
                .context("interactive session i/o failed")?;
            eprintln!("session finished: {} analyzed, {} rejected", stats.accepted, stats.rejected);
            Ok(())
        }
    }
}
