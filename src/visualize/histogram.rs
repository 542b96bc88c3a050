use serde::Serialize;

use crate::types::Value;

/// One equal-width histogram bin covering `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Count numeric values into `bins` equal-width bins spanning their observed range.
///
/// Missing and non-numeric values are ignored. If every value is the same the range is widened
/// to `[v - 0.5, v + 0.5]`; with no values at all the range is `[0, 1]` and every count is zero.
/// `bins == 0` is treated as a single bin.
pub fn histogram<'a>(values: impl IntoIterator<Item = &'a Value>, bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let data: Vec<f64> = values
        .into_iter()
        .filter_map(Value::as_f64)
        .filter(|v| v.is_finite())
        .collect();

    let (mut lo, mut hi) = data
        .iter()
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 1.0));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in data {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}
