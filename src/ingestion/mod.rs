//! Loading and run observability.
//!
//! [`csv`] turns a delimited file (by path or as uploaded bytes) into a
//! [`crate::types::PostTable`]. [`observability`] holds the observer hooks the pipeline reports
//! stage completion, success, failure and alerts to.

pub mod csv;
pub mod observability;

pub use self::csv::{load_csv_from_bytes, load_csv_from_path, load_csv_from_reader};
pub use observability::{
    CompositeObserver, FileObserver, PipelineObserver, PipelineSeverity, RunContext, RunStats, Stage,
    StdErrObserver,
};
