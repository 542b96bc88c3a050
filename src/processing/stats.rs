//! Descriptive statistics over numeric columns.

use serde::Serialize;

use crate::types::{PostTable, Value};

/// Summary statistics for one numeric column.
///
/// Nulls are skipped: `count` is the number of non-null values and the remaining fields are
/// computed over those. A statistic that is undefined for the available values (anything on
/// zero values, `std` on fewer than two) is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (denominator `n - 1`).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Names of the summary statistics, in display order.
pub const STATISTIC_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

impl ColumnSummary {
    /// Summarize a sequence of values. Non-numeric values are ignored.
    pub fn from_values<'a>(column: impl Into<String>, values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter_map(Value::as_f64).collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = mean(&sorted);
        Self {
            column: column.into(),
            count,
            mean,
            std: sample_std(&sorted, mean),
            min: sorted.first().copied(),
            p25: percentile_sorted(&sorted, 0.25),
            p50: percentile_sorted(&sorted, 0.50),
            p75: percentile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    /// Value of a statistic by its display name (see [`STATISTIC_NAMES`]).
    pub fn statistic(&self, name: &str) -> Option<f64> {
        match name {
            "count" => Some(self.count as f64),
            "mean" => self.mean,
            "std" => self.std,
            "min" => self.min,
            "25%" => self.p25,
            "50%" => self.p50,
            "75%" => self.p75,
            "max" => self.max,
            _ => None,
        }
    }
}

/// Descriptive statistics: one [`ColumnSummary`] per metric column.
///
/// Empty when the analyzed table has no rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Statistics {
    pub columns: Vec<ColumnSummary>,
}

impl Statistics {
    /// Summarize each of `columns` in `table`. Columns that do not exist are skipped.
    pub fn describe(table: &PostTable, columns: &[&str]) -> Self {
        if table.row_count() == 0 {
            return Self::default();
        }
        let columns = columns
            .iter()
            .filter_map(|name| {
                let idx = table.index_of(name)?;
                Some(ColumnSummary::from_values(*name, table.column(idx)))
            })
            .collect();
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Summary for a column by name.
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Arithmetic mean; `None` for no values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64], mean: Option<f64>) -> Option<f64> {
    let mean = mean?;
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Percentile `q` (in `[0, 1]`) of ascending `sorted`, linearly interpolated between the two
/// closest ranks.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
