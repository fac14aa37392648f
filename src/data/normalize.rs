//! Type coercion and chronological ordering.
//!
//! Raw CSV text becomes typed [`DataPoint`]s:
//! - the `Date` field is parsed into a timestamp (date-only values are midnight)
//! - the five numeric fields are coerced to `f64` the way unary plus coerces
//!   text: empty text is `0`, anything non-numeric is NaN
//! - unlike unary plus, non-finite spellings (`inf`, `Infinity`, `nan`) are
//!   read as NaN and reported, so no infinite value reaches the scales
//! - each dataset is then stable-sorted by timestamp
//!
//! In [`Validation::Permissive`] mode malformed fields are kept (as NaN) or the
//! row is dropped (bad date), and every case is reported as a [`RowIssue`].
//! [`Validation::Strict`] turns the first such case into an error.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::domain::{DataPoint, Dataset, RawDataset, RawRecord, RowIssue, Validation};
use crate::error::AppError;

/// Normalizer output across all datasets.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub datasets: Vec<Dataset>,
    pub issues: Vec<RowIssue>,
}

/// Normalize every dataset, keeping input order.
pub fn normalize_all(raw: Vec<RawDataset>, mode: Validation) -> Result<Normalized, AppError> {
    let mut datasets = Vec::with_capacity(raw.len());
    let mut issues = Vec::new();

    for ds in raw {
        let (dataset, mut ds_issues) = normalize_dataset(ds, mode)?;
        if let Some(first) = dataset.values.first() {
            debug!(dataset = %dataset.name, ?first, "first processed point");
        }
        datasets.push(dataset);
        issues.append(&mut ds_issues);
    }

    for issue in &issues {
        warn!("{issue}");
    }

    Ok(Normalized { datasets, issues })
}

/// Normalize one dataset: parse each record, then sort by timestamp.
pub fn normalize_dataset(raw: RawDataset, mode: Validation) -> Result<(Dataset, Vec<RowIssue>), AppError> {
    let mut values = Vec::with_capacity(raw.records.len());
    let mut issues = Vec::new();

    for record in &raw.records {
        let (point, messages) = match parse_record(record) {
            Ok(parsed) => parsed,
            Err(message) => {
                // Without a timestamp the row has no place on the time axis.
                let issue = RowIssue {
                    dataset: raw.name.clone(),
                    line: record.line,
                    message: format!("{message}; row dropped"),
                };
                if mode == Validation::Strict {
                    return Err(strict_error(&raw, &issue));
                }
                issues.push(issue);
                continue;
            }
        };

        for message in messages {
            let issue = RowIssue {
                dataset: raw.name.clone(),
                line: record.line,
                message,
            };
            if mode == Validation::Strict {
                return Err(strict_error(&raw, &issue));
            }
            issues.push(issue);
        }

        values.push(point);
    }

    // `sort_by` is stable: rows sharing a timestamp keep their file order.
    values.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok((Dataset { name: raw.name, values }, issues))
}

fn strict_error(raw: &RawDataset, issue: &RowIssue) -> AppError {
    AppError::new(3, format!("Invalid input in '{}' ({issue})", raw.locator))
}

/// Parse a record into a point plus non-fatal field messages.
///
/// `Err` means the date could not be parsed.
fn parse_record(record: &RawRecord) -> Result<(DataPoint, Vec<String>), String> {
    let timestamp = match record.date.as_deref() {
        None => return Err("missing `Date` value".to_string()),
        Some(text) => parse_timestamp(text).ok_or_else(|| format!("invalid `Date` value '{text}'"))?,
    };

    let mut messages = Vec::new();
    let mut field = |name: &str, value: Option<&str>| {
        let (v, message) = coerce_number(name, value);
        if let Some(m) = message {
            messages.push(m);
        }
        v
    };

    let point = DataPoint {
        timestamp,
        open: field("Open", record.open.as_deref()),
        high: field("High", record.high.as_deref()),
        low: field("Low", record.low.as_deref()),
        close: field("Close", record.close.as_deref()),
        volume: field("Volume", record.volume.as_deref()),
    };

    Ok((point, messages))
}

/// Coerce text to a number, returning a message when the result is not a
/// faithful reading of the text.
fn coerce_number(name: &str, value: Option<&str>) -> (f64, Option<String>) {
    let Some(text) = value else {
        return (f64::NAN, Some(format!("missing `{name}` value")));
    };
    let text = text.trim();
    if text.is_empty() {
        return (0.0, Some(format!("empty `{name}` value read as 0")));
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => (v, None),
        _ => (f64::NAN, Some(format!("non-numeric `{name}` value '{text}'"))),
    }
}

/// Parse a date or date-time string.
///
/// Accepted: `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`, and
/// `YYYY-MM-DD[ T]HH:MM:SS[.fff][Z]`.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let text = text.trim();
    let text = text.strip_suffix('Z').unwrap_or(text);

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    None
}
