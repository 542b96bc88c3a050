//! CSV loading (the pipeline's first stage).

use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{PostTable, Value};

/// Exact cell contents treated as a missing value, matching the usual dataframe CSV readers.
/// Whitespace-only cells are text, not missing.
const NULL_MARKERS: [&str; 12] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "#N/A", "<NA>",
];

/// Load a CSV file into an in-memory [`PostTable`].
///
/// Rules:
///
/// - The file must exist ([`PipelineError::FileNotFound`] otherwise).
/// - The CSV must have a header row; every record must have as many fields as the header.
/// - Cells are kept as text. Empty cells and common null markers become [`Value::Null`].
/// - No column is required at this stage; required columns are checked by the analyzer.
pub fn load_csv_from_path(path: impl AsRef<Path>) -> PipelineResult<PostTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PipelineError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io(e),
    })?;
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an in-memory byte buffer (e.g. an uploaded file).
pub fn load_csv_from_bytes(bytes: &[u8]) -> PipelineResult<PostTable> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: io::Read>(rdr: &mut csv::Reader<R>) -> PipelineResult<PostTable> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PipelineError::Parse {
            message: "no columns to parse from input".to_string(),
        });
    }
    let columns: Vec<String> = headers.iter().map(str::to_owned).collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based line number for users; +1 again because the header is line 1.
        let user_row = row_idx0 + 2;
        let record = result.map_err(|e| match PipelineError::from(e) {
            PipelineError::Parse { message } => PipelineError::Parse {
                message: format!("row {user_row}: {message}"),
            },
            other => other,
        })?;

        let row = record.iter().map(parse_cell).collect();
        rows.push(row);
    }

    Ok(PostTable::new(columns, rows))
}

fn parse_cell(raw: &str) -> Value {
    if NULL_MARKERS.contains(&raw) {
        Value::Null
    } else {
        Value::Utf8(raw.to_owned())
    }
}
