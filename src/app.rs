//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments into a `ChartConfig`
//! - runs the load -> normalize -> scales pipeline
//! - renders and writes the chart, or prints the summary

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RenderArgs, SourceArgs};
use crate::domain::{ChartConfig, ChartLayout, DEFAULT_SYMBOLS, Locator, SourceSpec, Validation};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "STOCKCHART_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

/// Entry point for the `stockchart` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // `stockchart` and `stockchart -s AAPL` behave like `stockchart render ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::Summary(args) => handle_summary(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stock_chart=info"));
    // A subscriber may already be installed (e.g. when embedded); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let config = chart_config_from_args(&args, std::env::var(DATA_DIR_ENV).ok())?;
    let output = pipeline::run_render(&config)?;

    crate::io::write_document(&config.out_svg, &output.svg)?;
    info!(path = %config.out_svg.display(), "wrote SVG chart");

    if let Some(path) = &config.out_html {
        let html = crate::plot::wrap_html(&output.svg, &output.title);
        crate::io::write_document(path, &html)?;
        info!(path = %path.display(), "wrote HTML page");
    }
    if let Some(path) = &config.export_json {
        crate::io::write_datasets_json(path, &output.prepared.datasets)?;
        info!(path = %path.display(), "wrote JSON export");
    }

    if !output.prepared.issues.is_empty() {
        info!(issues = output.prepared.issues.len(), "some rows were coerced or dropped");
    }
    Ok(())
}

fn handle_summary(args: SourceArgs) -> Result<(), AppError> {
    let sources = resolve_sources(&args, std::env::var(DATA_DIR_ENV).ok());
    let prepared = pipeline::prepare(&sources, validation_from_args(&args))?;

    println!(
        "{}",
        crate::report::format_summary(&prepared.datasets, &prepared.scales, &prepared.issues)
    );
    Ok(())
}

/// Resolve the run configuration from CLI arguments.
///
/// `env_data_dir` is the value of [`DATA_DIR_ENV`], if set.
pub fn chart_config_from_args(args: &RenderArgs, env_data_dir: Option<String>) -> Result<ChartConfig, AppError> {
    let layout = ChartLayout {
        width: args.width,
        height: args.height,
        ..ChartLayout::default()
    };
    if layout.inner_width() == 0 || layout.inner_height() == 0 {
        return Err(AppError::new(
            2,
            format!(
                "Canvas {}x{} leaves no room for the plot after margins.",
                layout.width, layout.height
            ),
        ));
    }

    Ok(ChartConfig {
        sources: resolve_sources(&args.input, env_data_dir),
        validation: validation_from_args(&args.input),
        layout,
        title: args.title.clone(),
        out_svg: args.out.clone(),
        out_html: args.html.clone(),
        export_json: args.export_json.clone(),
    })
}

/// Explicit `--source` entries win; otherwise each symbol maps to `<data-dir>/<SYMBOL>.csv`.
pub fn resolve_sources(args: &SourceArgs, env_data_dir: Option<String>) -> Vec<SourceSpec> {
    if !args.sources.is_empty() {
        return args.sources.clone();
    }

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| env_data_dir.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let symbols: Vec<String> = if args.symbols.is_empty() {
        DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
    } else {
        args.symbols.clone()
    };

    symbols
        .into_iter()
        .map(|symbol| {
            let path = data_dir.join(format!("{symbol}.csv"));
            SourceSpec::new(symbol, Locator::Path(path))
        })
        .collect()
}

fn validation_from_args(args: &SourceArgs) -> Validation {
    if args.strict {
        Validation::Strict
    } else {
        Validation::Permissive
    }
}

/// Rewrite argv so `stockchart` defaults to `stockchart render`.
///
/// Rules:
/// - `stockchart`                      -> `stockchart render`
/// - `stockchart -s AAPL ...`          -> `stockchart render -s AAPL ...`
/// - `stockchart --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("render".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "render" | "summary");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "render".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn render_args(args: &[&str]) -> RenderArgs {
        let cli = Cli::parse_from(rewrite_args(argv(args)));
        match cli.command {
            Command::Render(args) => args,
            Command::Summary(_) => panic!("expected render"),
        }
    }

    #[test]
    fn bare_invocation_renders() {
        assert_eq!(rewrite_args(argv(&["stockchart"])), argv(&["stockchart", "render"]));
        assert_eq!(
            rewrite_args(argv(&["stockchart", "-s", "AAPL"])),
            argv(&["stockchart", "render", "-s", "AAPL"])
        );
        assert_eq!(rewrite_args(argv(&["stockchart", "--help"])), argv(&["stockchart", "--help"]));
        assert_eq!(rewrite_args(argv(&["stockchart", "summary"])), argv(&["stockchart", "summary"]));
    }

    #[test]
    fn default_sources_use_data_dir() {
        let config = chart_config_from_args(&render_args(&["stockchart"]), None).unwrap();
        let names: Vec<&str> = config.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, DEFAULT_SYMBOLS.to_vec());
        assert_eq!(config.sources[0].locator, Locator::Path(PathBuf::from("data/AAPL.csv")));
        assert_eq!(config.validation, Validation::Permissive);
        assert_eq!(config.layout, ChartLayout::default());
    }

    #[test]
    fn data_dir_flag_beats_environment() {
        let args = render_args(&["stockchart", "--data-dir", "prices", "-s", "IBM"]);
        let config = chart_config_from_args(&args, Some("ignored".to_string())).unwrap();
        assert_eq!(config.sources[0].locator, Locator::Path(PathBuf::from("prices/IBM.csv")));

        let args = render_args(&["stockchart", "-s", "IBM"]);
        let config = chart_config_from_args(&args, Some("from-env".to_string())).unwrap();
        assert_eq!(config.sources[0].locator, Locator::Path(PathBuf::from("from-env/IBM.csv")));
    }

    #[test]
    fn explicit_sources_replace_symbols() {
        let args = render_args(&["stockchart", "-s", "IBM", "--source", "X=x.csv"]);
        let config = chart_config_from_args(&args, None).unwrap();
        assert_eq!(config.sources, vec![SourceSpec::new("X", Locator::parse("x.csv"))]);
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let args = render_args(&["stockchart", "--width", "200"]);
        let err = chart_config_from_args(&args, None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
