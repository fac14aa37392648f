//! Axis ticks and tick label formatting.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::domain::{PriceDomain, TimeDomain};

/// Position of a timestamp on the x axis (seconds since the Unix epoch, UTC).
pub fn time_to_x(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

/// Inverse of [`time_to_x`], truncated to whole seconds.
pub fn x_to_time(x: f64) -> Option<NaiveDateTime> {
    if !x.is_finite() {
        return None;
    }
    DateTime::from_timestamp(x.floor() as i64, 0).map(|dt| dt.naive_utc())
}

/// January 1st of every year inside the domain (inclusive).
pub fn year_ticks(domain: &TimeDomain) -> Vec<NaiveDateTime> {
    let mut ticks = Vec::new();
    for year in domain.start.year()..=domain.end.year() {
        let Some(tick) = NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)) else {
            continue;
        };
        if domain.contains(tick) {
            ticks.push(tick);
        }
    }
    ticks
}

/// Roughly `count` "nice" ticks (steps of 1, 2 or 5 times a power of ten)
/// inside the price domain.
pub fn price_ticks(domain: &PriceDomain, count: usize) -> Vec<f64> {
    let (lo, hi) = (domain.min, domain.max);
    if !(lo.is_finite() && hi.is_finite()) || count == 0 {
        return Vec::new();
    }
    if hi <= lo {
        return vec![lo];
    }

    let raw_step = (hi - lo) / count as f64;
    let power = raw_step.log10().floor();
    let error = raw_step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // For sub-unit steps divide by the inverse step; it keeps values like 0.3
    // exact instead of 0.30000000000000004.
    if power >= 0.0 {
        let step = factor * 10f64.powf(power);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    } else {
        let inv = 10f64.powf(-power) / factor;
        let first = (lo * inv).ceil() as i64;
        let last = (hi * inv).floor() as i64;
        (first..=last).map(|i| i as f64 / inv).collect()
    }
}

/// Year label for an x-axis tick, e.g. `2020`.
pub fn format_year(x: f64) -> String {
    x_to_time(x)
        .map(|t| t.format("%Y").to_string())
        .unwrap_or_default()
}

/// Dollar label for a y-axis tick: `$300`, `$302.5`.
pub fn format_currency(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    let rounded = format!("{v:.6}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("${trimmed}")
}
