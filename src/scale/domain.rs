//! Global extents across all datasets.

use chrono::NaiveDateTime;

use crate::domain::Dataset;

/// `[start, end]` over every timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDomain {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeDomain {
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// `[min, max]` over every finite close price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceDomain {
    pub min: f64,
    pub max: f64,
}

impl PriceDomain {
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Time extent over the union of all points; `None` when there are no points.
pub fn time_domain(datasets: &[Dataset]) -> Option<TimeDomain> {
    let mut timestamps = datasets.iter().flat_map(|d| d.values.iter().map(|p| p.timestamp));
    let first = timestamps.next()?;
    let (start, end) = timestamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
    Some(TimeDomain { start, end })
}

/// Close-price extent over the union of all points.
///
/// NaN closes are skipped; `None` when no finite close exists.
pub fn price_domain(datasets: &[Dataset]) -> Option<PriceDomain> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for p in datasets.iter().flat_map(|d| d.values.iter()) {
        if !p.close.is_finite() {
            continue;
        }
        min = min.min(p.close);
        max = max.max(p.close);
    }

    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    Some(PriceDomain { min, max })
}
