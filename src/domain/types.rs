//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages (load -> normalize -> scales -> render)
//! - exported to JSON for inspection

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Ticker symbols charted when none are given on the command line.
pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "GOOG", "AMZN", "IBM", "MSFT"];

/// How strictly the normalizer treats malformed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Non-numeric text becomes NaN, unparseable dates drop the row.
    /// Every such row is reported as a [`RowIssue`].
    #[default]
    Permissive,
    /// The first malformed field fails the run.
    Strict,
}

/// Where a dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Path(PathBuf),
    Url(String),
}

impl Locator {
    /// `http://` and `https://` prefixes select a URL, everything else is a path.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Locator::Url(trimmed.to_string())
        } else {
            Locator::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Path(p) => write!(f, "{}", p.display()),
            Locator::Url(u) => write!(f, "{u}"),
        }
    }
}

/// A named input: one CSV resource per data series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    pub locator: Locator,
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, locator: Locator) -> Self {
        Self {
            name: name.into(),
            locator,
        }
    }
}

/// One CSV row, fields still as text.
///
/// A field is `None` when the CSV has no such column, and `Some("")` when the
/// column exists but the row is too short to reach it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source CSV (the header is line 1).
    pub line: usize,
    pub date: Option<String>,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub close: Option<String>,
    pub volume: Option<String>,
}

/// Loader output for one source.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub name: String,
    pub locator: Locator,
    pub records: Vec<RawRecord>,
}

/// A normalized price observation.
///
/// Numeric fields are NaN when the source text was not a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A named series of observations, sorted by `timestamp` after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub values: Vec<DataPoint>,
}

/// A row the normalizer could not fully parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub dataset: String,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}: {}", self.dataset, self.line, self.message)
    }
}

/// Space reserved around the plot area, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50,
            right: 160,
            bottom: 50,
            left: 100,
        }
    }
}

/// Canvas size and margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            margin: Margin::default(),
        }
    }
}

impl ChartLayout {
    /// Width of the plot area (canvas minus left/right margins).
    pub fn inner_width(&self) -> u32 {
        self.width.saturating_sub(self.margin.left + self.margin.right)
    }

    /// Height of the plot area (canvas minus top/bottom margins).
    pub fn inner_height(&self) -> u32 {
        self.height.saturating_sub(self.margin.top + self.margin.bottom)
    }
}

/// Resolved configuration for a run.
///
/// This is derived from CLI flags (plus defaults and the environment).
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub sources: Vec<SourceSpec>,
    pub validation: Validation,
    pub layout: ChartLayout,
    /// Explicit title; `None` derives one from the dataset names.
    pub title: Option<String>,
    pub out_svg: PathBuf,
    pub out_html: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl ChartConfig {
    /// Title used for the chart, e.g. `Historical Stock Prices: AAPL, GOOG`.
    pub fn resolved_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        let names: Vec<&str> = self.sources.iter().map(|s| s.name.as_str()).collect();
        format!("Historical Stock Prices: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_detects_urls() {
        assert_eq!(
            Locator::parse("https://example.com/AAPL.csv"),
            Locator::Url("https://example.com/AAPL.csv".to_string())
        );
        assert_eq!(
            Locator::parse(" data/AAPL.csv "),
            Locator::Path(PathBuf::from("data/AAPL.csv"))
        );
    }

    #[test]
    fn default_layout_inner_size() {
        let layout = ChartLayout::default();
        assert_eq!(layout.inner_width(), 740);
        assert_eq!(layout.inner_height(), 700);
    }

    #[test]
    fn title_defaults_to_source_names() {
        let config = ChartConfig {
            sources: vec![
                SourceSpec::new("AAPL", Locator::parse("a.csv")),
                SourceSpec::new("GOOG", Locator::parse("g.csv")),
            ],
            validation: Validation::Permissive,
            layout: ChartLayout::default(),
            title: None,
            out_svg: PathBuf::from("chart.svg"),
            out_html: None,
            export_json: None,
        };
        assert_eq!(config.resolved_title(), "Historical Stock Prices: AAPL, GOOG");
    }
}
