//! In-memory transformations over a loaded [`crate::types::PostTable`].
//!
//! - [`normalize`]: column label cleanup (must run before any column lookup)
//! - [`analyze`]: total engagement, rankings and per-platform means
//! - [`stats`]: descriptive statistics (count/mean/std/min/quartiles/max)
//!
//! ## Example: normalize → analyze
//!
//! ```rust
//! use social_engagement::ingestion::load_csv_from_bytes;
//! use social_engagement::pipeline::AnalysisOptions;
//! use social_engagement::processing::{analyze, normalize_columns};
//!
//! let csv = "Username, Platform ,Likes/Reactions,Comments,Shares/Retweets,Account Verification,User Followers\n\
//!            alice,X,10,2,3,Verified,100\n\
//!            bob,X,1,1,1,Not,50\n";
//! let table = normalize_columns(load_csv_from_bytes(csv.as_bytes()).unwrap());
//! let analysis = analyze(table, &AnalysisOptions::default()).unwrap();
//!
//! assert_eq!(analysis.platform_engagement[0].mean_engagement, Some(9.0));
//! assert_eq!(analysis.top_verified.len(), 1);
//! ```

pub mod analyze;
pub mod normalize;
pub mod stats;

pub use analyze::{
    analyze, platform_engagement, top_posts, top_verified_users, validate_schema, validate_shape,
    with_total_engagement, Analysis, PlatformEngagement, TopPost, VerifiedUser,
};
pub use normalize::{normalize_columns, normalize_label};
pub use stats::{ColumnSummary, Statistics, STATISTIC_NAMES};
