//! Reporting utilities: per-series statistics and the text summary.

pub mod format;

pub use format::format_summary;

use chrono::NaiveDateTime;

use crate::domain::Dataset;

/// Per-series figures shown by `stockchart summary`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub name: String,
    pub n_points: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    /// Extremes over finite closes only.
    pub min_close: Option<f64>,
    pub max_close: Option<f64>,
    /// Close of the latest point, NaN included.
    pub last_close: Option<f64>,
}

/// Compute stats for a normalized (time-sorted) dataset.
pub fn series_stats(dataset: &Dataset) -> SeriesStats {
    let finite = dataset.values.iter().map(|p| p.close).filter(|v| v.is_finite());
    let (min_close, max_close) = finite.fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), v| {
        (
            Some(lo.map_or(v, |lo| lo.min(v))),
            Some(hi.map_or(v, |hi| hi.max(v))),
        )
    });

    SeriesStats {
        name: dataset.name.clone(),
        n_points: dataset.values.len(),
        first: dataset.values.first().map(|p| p.timestamp),
        last: dataset.values.last().map(|p| p.timestamp),
        min_close,
        max_close,
        last_close: dataset.values.last().map(|p| p.close),
    }
}
