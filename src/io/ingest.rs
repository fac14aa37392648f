//! CSV loading.
//!
//! This module turns a list of named locators (file paths or URLs) into raw,
//! still-textual datasets. Type coercion lives in `data::normalize`.
//!
//! Behavior:
//! - all sources are fetched concurrently and joined before returning
//! - output order matches input order
//! - the first failing source fails the whole batch (no partial results)

use std::fs::File;
use std::io::Read;
use std::time::Duration;

use csv::StringRecord;
use rayon::prelude::*;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::domain::{Locator, RawDataset, RawRecord, SourceSpec};
use crate::error::AppError;

/// Column names expected in every input CSV.
pub const COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Load every source concurrently.
pub fn load_sources(sources: &[SourceSpec]) -> Result<Vec<RawDataset>, AppError> {
    let client = if needs_http_client(sources) { Some(http_client()?) } else { None };
    let datasets = sources
        .par_iter()
        .map(|source| load_source(client.as_ref(), source))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        datasets = datasets.len(),
        rows = datasets.iter().map(|d| d.records.len()).sum::<usize>(),
        "loaded sources"
    );
    Ok(datasets)
}

fn needs_http_client(sources: &[SourceSpec]) -> bool {
    sources.iter().any(|s| matches!(s.locator, Locator::Url(_)))
}

/// Blocking client without a request timeout; a slow source is waited on.
fn http_client() -> Result<Client, AppError> {
    Client::builder()
        .timeout(None::<Duration>)
        .build()
        .map_err(|e| AppError::new(2, format!("Failed to create HTTP client: {e}")))
}

fn load_source(client: Option<&Client>, source: &SourceSpec) -> Result<RawDataset, AppError> {
    debug!(name = %source.name, locator = %source.locator, "fetching");
    match &source.locator {
        Locator::Path(path) => {
            let file = File::open(path).map_err(|e| {
                AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
            })?;
            parse_csv(&source.name, &source.locator, file)
        }
        Locator::Url(url) => {
            let client = client.ok_or_else(|| AppError::new(2, format!("No HTTP client for '{url}'")))?;
            let response = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|e| AppError::new(2, format!("Failed to fetch CSV '{url}': {e}")))?;
            parse_csv(&source.name, &source.locator, response)
        }
    }
}

/// Parse a CSV stream into raw records.
///
/// Header names must match [`COLUMNS`] exactly (surrounding whitespace and a
/// UTF-8 BOM are ignored). A missing column is not an error here: its fields
/// are `None` and the normalizer decides what that means. A row shorter than
/// the header reads its missing cells as empty strings.
pub fn parse_csv<R: Read>(name: &str, locator: &Locator, input: R) -> Result<RawDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers from '{locator}': {e}")))?
        .clone();

    let columns = ColumnMap::from_headers(&headers);
    for missing in columns.missing() {
        warn!(dataset = name, column = missing, "CSV has no such column");
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::new(2, format!("Failed to read CSV '{locator}' near line {}: {e}", idx + 2))
        })?;
        // Prefer the reader's position (accounts for quoted newlines), fall back
        // to header + 1-based row index.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        records.push(columns.extract(&record, line));
    }

    Ok(RawDataset {
        name: name.to_string(),
        locator: locator.clone(),
        records,
    })
}

/// Column index for each expected field.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    date: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = ColumnMap::default();
        for (idx, raw) in headers.iter().enumerate() {
            let slot = match normalize_header_name(raw) {
                "Date" => &mut map.date,
                "Open" => &mut map.open,
                "High" => &mut map.high,
                "Low" => &mut map.low,
                "Close" => &mut map.close,
                "Volume" => &mut map.volume,
                _ => continue,
            };
            // First occurrence wins for duplicated headers.
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }

    fn missing(&self) -> Vec<&'static str> {
        let slots = [self.date, self.open, self.high, self.low, self.close, self.volume];
        COLUMNS
            .iter()
            .zip(slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    fn extract(&self, record: &StringRecord, line: usize) -> RawRecord {
        let get = |slot: Option<usize>| slot.map(|idx| record.get(idx).unwrap_or_default().to_string());
        RawRecord {
            line,
            date: get(self.date),
            open: get(self.open),
            high: get(self.high),
            low: get(self.low),
            close: get(self.close),
            volume: get(self.volume),
        }
    }
}

fn normalize_header_name(name: &str) -> &str {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_csv(file_name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stock-chart-ingest-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_rows_with_exact_headers() {
        let csv = "\u{feff}Date,Open,High,Low,Close,Volume\n\
                   2020-01-02,296.2,300.6,295.2,300.35,33870100\n\
                   2020-01-03,297.1,300.5,296.5,297.43,36580700\n";
        let locator = Locator::parse("mem.csv");
        let ds = parse_csv("AAPL", &locator, csv.as_bytes()).unwrap();

        assert_eq!(ds.name, "AAPL");
        assert_eq!(ds.records.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.date.as_deref(), Some("2020-01-02"));
        assert_eq!(first.close.as_deref(), Some("300.35"));
        assert_eq!(first.volume.as_deref(), Some("33870100"));
        assert_eq!(ds.records[1].line, 3);
    }

    #[test]
    fn missing_columns_yield_none_and_short_rows_empty() {
        let csv = "Date,Close\n2020-01-02,300\n2020-01-03\n";
        let ds = parse_csv("X", &Locator::parse("mem.csv"), csv.as_bytes()).unwrap();

        assert_eq!(ds.records[0].open, None);
        assert_eq!(ds.records[0].close.as_deref(), Some("300"));
        assert_eq!(ds.records[1].close.as_deref(), Some(""));
        assert_eq!(ds.records[1].open, None);
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let csv = "date,close\n2020-01-02,300\n";
        let ds = parse_csv("X", &Locator::parse("mem.csv"), csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].date, None);
        assert_eq!(ds.records[0].close, None);
    }

    #[test]
    fn load_keeps_input_order() {
        let a = temp_csv("order_a.csv", "Date,Close\n2020-01-01,1\n");
        let b = temp_csv("order_b.csv", "Date,Close\n2020-01-01,2\n2020-01-02,3\n");
        let sources = vec![
            SourceSpec::new("B", Locator::Path(b)),
            SourceSpec::new("A", Locator::Path(a)),
        ];

        let loaded = load_sources(&sources).unwrap();
        let names: Vec<&str> = loaded.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(loaded[0].records.len(), 2);
        assert_eq!(loaded[1].records.len(), 1);
    }

    #[test]
    fn http_client_only_for_url_sources() {
        let local = vec![SourceSpec::new("A", Locator::parse("data/A.csv"))];
        assert!(!needs_http_client(&local));

        let mixed = vec![
            SourceSpec::new("A", Locator::parse("data/A.csv")),
            SourceSpec::new("B", Locator::parse("https://example.com/B.csv")),
        ];
        assert!(needs_http_client(&mixed));
        assert!(http_client().is_ok());
    }

    #[test]
    fn one_missing_source_fails_the_batch() {
        let ok = temp_csv("batch_ok.csv", "Date,Close\n2020-01-01,1\n");
        let sources = vec![
            SourceSpec::new("OK", Locator::Path(ok)),
            SourceSpec::new("GONE", Locator::parse("/definitely/not/here/GONE.csv")),
        ];

        let err = load_sources(&sources).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("GONE.csv"));
    }
}
