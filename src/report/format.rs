//! Formatted terminal output.
//!
//! Formatting lives here so the pipeline stages stay free of presentation code.

use chrono::NaiveDateTime;

use crate::domain::{Dataset, RowIssue};
use crate::scale::ChartScales;

use super::series_stats;

/// Format the run summary: global domains, one row per series, row issues.
pub fn format_summary(datasets: &[Dataset], scales: &ChartScales, issues: &[RowIssue]) -> String {
    let mut out = String::new();

    out.push_str("=== stockchart - series summary ===\n");
    out.push_str(&format!(
        "Time:  {} .. {}\n",
        fmt_date(Some(scales.time.start)),
        fmt_date(Some(scales.time.end))
    ));
    out.push_str(&format!(
        "Close: {:.2} .. {:.2}\n\n",
        scales.price.min, scales.price.max
    ));

    out.push_str(&format_table(datasets, scales));

    out.push_str(&format!("\nRow issues: {}\n", issues.len()));
    for issue in issues.iter().take(MAX_LISTED_ISSUES) {
        out.push_str(&format!("- {issue}\n"));
    }
    if issues.len() > MAX_LISTED_ISSUES {
        out.push_str(&format!("- ... {} more\n", issues.len() - MAX_LISTED_ISSUES));
    }

    out
}

const MAX_LISTED_ISSUES: usize = 10;

fn format_table(datasets: &[Dataset], scales: &ChartScales) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<10} {:<8} {:>7} {:<10} {:<10} {:>10} {:>10} {:>10}",
            "series", "color", "points", "first", "last", "min", "max", "last_close"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<8} {:-<7} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for ds in datasets {
        let s = series_stats(ds);
        out.push_str(
            format!(
                "{:<10} {:<8} {:>7} {:<10} {:<10} {:>10} {:>10} {:>10}",
                truncate(&s.name, 10),
                scales.colors.color(&s.name).hex(),
                s.n_points,
                fmt_date(s.first),
                fmt_date(s.last),
                fmt_price(s.min_close),
                fmt_price(s.max_close),
                fmt_price(s.last_close),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_date(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_price(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        Some(_) => "NaN".to_string(),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
