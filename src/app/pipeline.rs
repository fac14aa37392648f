//! Shared pipeline logic used by the `render` and `summary` commands.
//!
//! load (concurrent) -> normalize -> scales [-> render]

use tracing::info;

use crate::data::normalize_all;
use crate::domain::{ChartConfig, Dataset, RowIssue, SourceSpec, Validation};
use crate::error::AppError;
use crate::io::load_sources;
use crate::plot::{ChartStyle, render_svg};
use crate::scale::ChartScales;

/// Normalized data and the scales built from it.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub datasets: Vec<Dataset>,
    pub issues: Vec<RowIssue>,
    pub scales: ChartScales,
}

/// Outputs of a `render` run.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub prepared: Prepared,
    pub title: String,
    pub svg: String,
}

/// Load, normalize and build scales.
pub fn prepare(sources: &[SourceSpec], validation: Validation) -> Result<Prepared, AppError> {
    if sources.is_empty() {
        return Err(AppError::new(2, "No data sources given."));
    }

    let raw = load_sources(sources)?;
    let normalized = normalize_all(raw, validation)?;
    let scales = ChartScales::build(&normalized.datasets)?;

    info!(
        series = normalized.datasets.len(),
        points = normalized.datasets.iter().map(|d| d.values.len()).sum::<usize>(),
        issues = normalized.issues.len(),
        "prepared datasets"
    );

    Ok(Prepared {
        datasets: normalized.datasets,
        issues: normalized.issues,
        scales,
    })
}

/// Run the full pipeline and render the chart.
pub fn run_render(config: &ChartConfig) -> Result<RenderOutput, AppError> {
    let prepared = prepare(&config.sources, config.validation)?;
    let title = config.resolved_title();
    let style = ChartStyle::new(config.layout, title.clone());
    let svg = render_svg(&prepared.datasets, &prepared.scales, &style)?;

    Ok(RenderOutput { prepared, title, svg })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartLayout, Locator};
    use std::path::PathBuf;

    fn write_csv(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stock-chart-pipeline-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn single_dataset_end_to_end() {
        let path = write_csv(
            "AAPL.csv",
            "Date,Open,High,Low,Close,Volume\n\
             2020-01-01,1,1,1,300,10\n\
             2020-01-03,1,1,1,310,10\n\
             2020-01-02,1,1,1,305,10\n",
        );
        let sources = vec![SourceSpec::new("AAPL", Locator::Path(path))];

        let prepared = prepare(&sources, Validation::Permissive).unwrap();
        let aapl = &prepared.datasets[0];
        let dates: Vec<String> = aapl.values.iter().map(|p| p.timestamp.format("%Y-%m-%d").to_string()).collect();
        let closes: Vec<f64> = aapl.values.iter().map(|p| p.close).collect();

        assert_eq!(dates, vec!["2020-01-01", "2020-01-02", "2020-01-03"]);
        assert_eq!(closes, vec![300.0, 305.0, 310.0]);
        assert_eq!(prepared.scales.price.min, 300.0);
        assert_eq!(prepared.scales.price.max, 310.0);
        assert!(prepared.issues.is_empty());
    }

    #[test]
    fn render_produces_svg_with_default_title() {
        let a = write_csv("R_A.csv", "Date,Open,High,Low,Close,Volume\n2019-01-01,1,1,1,10,1\n2021-01-01,1,1,1,20,1\n");
        let b = write_csv("R_B.csv", "Date,Open,High,Low,Close,Volume\n2019-06-01,1,1,1,15,1\n2020-06-01,1,1,1,oops,1\n");
        let config = ChartConfig {
            sources: vec![
                SourceSpec::new("AAA", Locator::Path(a)),
                SourceSpec::new("BBB", Locator::Path(b)),
            ],
            validation: Validation::Permissive,
            layout: ChartLayout::default(),
            title: None,
            out_svg: PathBuf::from("unused.svg"),
            out_html: None,
            export_json: None,
        };

        let out = run_render(&config).unwrap();
        assert_eq!(out.title, "Historical Stock Prices: AAA, BBB");
        assert!(out.svg.contains("AAA") && out.svg.contains("BBB"));
        assert_eq!(out.prepared.issues.len(), 1);
    }

    #[test]
    fn strict_mode_surfaces_bad_numbers() {
        let path = write_csv("S.csv", "Date,Open,High,Low,Close,Volume\n2020-01-01,1,1,1,abc,1\n");
        let sources = vec![SourceSpec::new("S", Locator::Path(path))];
        let err = prepare(&sources, Validation::Strict).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn no_sources_is_an_error() {
        assert_eq!(prepare(&[], Validation::Permissive).unwrap_err().exit_code(), 2);
    }
}
