//! Column label normalization.

use crate::types::PostTable;

/// Normalize a single column label: trim surrounding whitespace and replace spaces with `_`.
pub fn normalize_label(label: &str) -> String {
    label.trim().replace(' ', "_")
}

/// Returns `table` with every column label passed through [`normalize_label`].
///
/// Row contents and order are unchanged. Applying this twice gives the same result as once.
pub fn normalize_columns(mut table: PostTable) -> PostTable {
    for col in &mut table.columns {
        *col = normalize_label(col);
    }
    table
}
