//! `social-engagement` analyzes a social-media engagement CSV (one row per post) and produces
//! descriptive aggregates plus four chart artifacts.
//!
//! The pipeline is a straight line of pure stages over an in-memory [`types::PostTable`]:
//!
//! 1. **Load** ([`ingestion`]): parse comma-separated text with a header row.
//! 2. **Normalize** ([`processing::normalize`]): trim column labels, spaces → `_`.
//! 3. **Analyze** ([`processing::analyze`]): validate required columns, append
//!    `Total_Engagement`, compute statistics, top posts, per-platform means and top verified users.
//! 4. **Visualize** ([`visualize`]): a bar chart, a scatter plot and two histograms, each an
//!    independent [`visualize::Chart`] value renderable as SVG or Vega-Lite.
//!
//! The primary entrypoints are [`pipeline::analyze_path`] and [`pipeline::analyze_bytes`].
//! Failures are returned as [`PipelineError`] values; nothing in the library exits the process.
//!
//! ## Required columns
//!
//! `Username`, `Platform`, `Likes/Reactions`, `Comments`, `Shares/Retweets`, `User_Followers`,
//! `Account_Verification` (compared after normalization, see [`schema`]).
//!
//! ## Quick example
//!
//! ```rust
//! use social_engagement::pipeline::{analyze_bytes, AnalysisOptions};
//!
//! let csv = "Username,Platform,Likes/Reactions,Comments,Shares/Retweets,Account_Verification,User_Followers\n\
//!            alice,X,10,2,3,Verified,100\n\
//!            bob,X,1,1,1,Not,50\n";
//!
//! let report = analyze_bytes("upload.csv", csv.as_bytes(), &AnalysisOptions::default()).unwrap();
//! assert_eq!(report.top_posts[0].username.to_string(), "alice");
//! assert_eq!(report.platform_engagement[0].mean_engagement, Some(9.0));
//! assert_eq!(report.charts.len(), 4);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV loading and run observers
//! - [`processing`]: normalization, analysis and statistics
//! - [`visualize`]: chart artifacts and their renderers
//! - [`pipeline`]: the unified entrypoint and [`pipeline::AnalysisOptions`]
//! - [`batch`]: several exports per run on a bounded worker pool
//! - [`interactive`]: upload session and prompt loop where failures are retryable
//! - [`report`]: plain-text tables and on-disk artifacts
//! - [`error`]: the error type shared by every stage

pub mod batch;
pub mod error;
pub mod ingestion;
pub mod interactive;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod schema;
pub mod types;
pub mod visualize;

pub use error::{ErrorKind, PipelineError, PipelineResult};
