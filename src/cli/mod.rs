//! Command-line parsing for the stock chart renderer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline; `app` turns the parsed arguments into a `ChartConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Locator, SourceSpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "stockchart", version, about = "Multi-series stock price line charts from CSV files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the CSV files and render the chart as SVG (and optionally HTML/JSON).
    Render(RenderArgs),
    /// Load the CSV files and print per-series statistics.
    Summary(SourceArgs),
}

/// Which series to load and how strictly to parse them.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Directory holding `<SYMBOL>.csv` files [env: STOCKCHART_DATA_DIR] [default: data]
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Ticker symbol to chart; repeat for several (default: AAPL GOOG AMZN IBM MSFT).
    #[arg(short = 's', long = "symbol", value_name = "SYMBOL")]
    pub symbols: Vec<String>,

    /// Explicit source as NAME=PATH_OR_URL; repeatable. Replaces `--symbol`.
    #[arg(long = "source", value_name = "NAME=LOCATOR", value_parser = parse_source)]
    pub sources: Vec<SourceSpec>,

    /// Fail on the first malformed date or number instead of coercing it.
    #[arg(long)]
    pub strict: bool,
}

/// Options for rendering.
#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: SourceArgs,

    /// Output SVG file.
    #[arg(short = 'o', long, default_value = "chart.svg")]
    pub out: PathBuf,

    /// Also write an HTML page hosting the chart.
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Chart title (default: "Historical Stock Prices: <names>").
    #[arg(long)]
    pub title: Option<String>,

    /// Canvas width.
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Canvas height.
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Export the normalized datasets to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

fn parse_source(s: &str) -> Result<SourceSpec, String> {
    let (name, locator) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=LOCATOR, got '{s}'"))?;
    let name = name.trim();
    let locator = locator.trim();
    if name.is_empty() || locator.is_empty() {
        return Err(format!("expected NAME=LOCATOR, got '{s}'"));
    }
    Ok(SourceSpec::new(name, Locator::parse(locator)))
}
