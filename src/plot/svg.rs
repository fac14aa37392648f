//! Plotters-powered SVG line chart.
//!
//! The plot area is the canvas minus the layout margins. Tick labels and axis
//! titles live in the left/bottom margins, the title in the top margin and the
//! legend in the right margin.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::{ChartLayout, Dataset};
use crate::error::AppError;
use crate::plot::curve::{finite_runs, monotone_x};
use crate::scale::{ChartScales, SeriesColor, format_currency, format_year, price_ticks, time_to_x, year_ticks};

/// Flattening resolution for each smoothed interval.
const CURVE_STEPS: usize = 8;
/// Target number of price ticks.
const PRICE_TICKS: usize = 10;
const TICK_SIZE: i32 = 6;
const LEGEND_ROW_HEIGHT: i32 = 20;
const LEGEND_SWATCH_WIDTH: i32 = 20;
/// The SVG backend writes `font-size` as the requested size divided by this.
const FONT_SCALE: f64 = 1.24;

/// Font size to request so the SVG carries `size` pixels.
fn px(size: f64) -> f64 {
    size * FONT_SCALE
}

/// Text and geometry for one chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub layout: ChartLayout,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartStyle {
    pub fn new(layout: ChartLayout, title: impl Into<String>) -> Self {
        Self {
            layout,
            title: title.into(),
            x_label: "Year".to_string(),
            y_label: "Stock Price (USD)".to_string(),
        }
    }
}

/// Render all datasets into an SVG document.
pub fn render_svg(datasets: &[Dataset], scales: &ChartScales, style: &ChartStyle) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let size = (style.layout.width, style.layout.height);
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, datasets, scales, style)
            .map_err(|e| AppError::new(4, format!("Failed to render chart: {e}")))?;
        root.present()
            .map_err(|e| AppError::new(4, format!("Failed to finish SVG document: {e}")))?;
    }
    Ok(svg)
}

/// Wrap an SVG document into a minimal HTML page, inside a `#chart` container.
pub fn wrap_html(svg: &str, title: &str) -> String {
    let body = svg.trim_start_matches(|c: char| c != '<');
    // Drop an XML prolog if the backend emitted one; it is invalid inside HTML.
    let body = match body.strip_prefix("<?xml") {
        Some(rest) => rest.split_once("?>").map(|(_, r)| r.trim_start()).unwrap_or(body),
        None => body,
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div id=\"chart\">\n{}\n</div>\n</body>\n</html>\n",
        escape_html(title),
        body.trim_end()
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn rgb(color: SeriesColor) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Widen a degenerate range so the coordinate system stays invertible.
fn padded(lo: f64, hi: f64, pad: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - pad, hi + pad) }
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    datasets: &[Dataset],
    scales: &ChartScales,
    style: &ChartStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let layout = &style.layout;
    let margin = layout.margin;
    root.fill(&WHITE)?;

    let (x0, x1) = padded(time_to_x(scales.time.start), time_to_x(scales.time.end), 86_400.0);
    let (y0, y1) = padded(scales.price.min, scales.price.max, 1.0);

    let plot_area = root.margin(
        margin.top as i32,
        margin.bottom as i32,
        margin.left as i32,
        margin.right as i32,
    );
    let mut chart = ChartBuilder::on(&plot_area).build_cartesian_2d(x0..x1, y0..y1)?;

    // Axes are drawn in canvas pixels; `backend_coord` maps data values.
    let x_ticks: Vec<(i32, String)> = year_ticks(&scales.time)
        .into_iter()
        .map(|t| {
            let x = time_to_x(t);
            (chart.backend_coord(&(x, y0)).0, format_year(x))
        })
        .collect();
    let y_ticks: Vec<(i32, String)> = price_ticks(&scales.price, PRICE_TICKS)
        .into_iter()
        .map(|v| (chart.backend_coord(&(x0, v)).1, format_currency(v)))
        .collect();
    let (left, bottom) = chart.backend_coord(&(x0, y0));
    let (right, top) = chart.backend_coord(&(x1, y1));

    draw_axes(root, (left, top, right, bottom), &x_ticks, &y_ticks)?;

    for dataset in datasets {
        let color = rgb(scales.colors.color(&dataset.name));
        let raw: Vec<(f64, f64)> = dataset
            .values
            .iter()
            .map(|p| (time_to_x(p.timestamp), p.close))
            .collect();

        for run in finite_runs(&raw) {
            chart.draw_series(LineSeries::new(monotone_x(&run, CURVE_STEPS), color.stroke_width(2)))?;
        }
    }

    let axis_title = ("sans-serif", px(14.0)).into_font().color(&BLACK);
    let plot_center_x = (left + right) / 2;
    root.draw(&Text::new(
        style.x_label.clone(),
        (plot_center_x, layout.height as i32 - 10),
        axis_title.pos(Pos::new(HPos::Center, VPos::Bottom)),
    ))?;
    root.draw(&Text::new(
        style.y_label.clone(),
        (40, (top + bottom) / 2),
        ("sans-serif", px(14.0))
            .into_font()
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    // Title, centered over the plot area in the top margin.
    let title_style = ("sans-serif", px(18.0))
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(style.title.clone(), (plot_center_x, (margin.top / 2) as i32), title_style))?;

    // Legend: one swatch + name per series, stacked in the right margin.
    let legend_x = right + 20;
    let name_style = ("sans-serif", px(12.0))
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (i, dataset) in datasets.iter().enumerate() {
        let color = rgb(scales.colors.color(&dataset.name));
        let y = top + i as i32 * LEGEND_ROW_HEIGHT + 10;
        root.draw(&PathElement::new(
            vec![(legend_x, y), (legend_x + LEGEND_SWATCH_WIDTH, y)],
            color.stroke_width(2),
        ))?;
        root.draw(&Text::new(
            dataset.name.clone(),
            (legend_x + LEGEND_SWATCH_WIDTH + 5, y),
            name_style.clone(),
        ))?;
    }

    Ok(())
}

/// Bottom time axis and left price axis with outward ticks.
///
/// `frame` is `(left, top, right, bottom)` of the plot area in canvas pixels.
fn draw_axes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: (i32, i32, i32, i32),
    x_ticks: &[(i32, String)],
    y_ticks: &[(i32, String)],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (left, top, right, bottom) = frame;
    let line = BLACK.stroke_width(1);
    let font = ("sans-serif", px(12.0)).into_font().color(&BLACK);

    root.draw(&PathElement::new(vec![(left, bottom), (right, bottom)], line))?;
    for (x, label) in x_ticks {
        root.draw(&PathElement::new(vec![(*x, bottom), (*x, bottom + TICK_SIZE)], line))?;
        root.draw(&Text::new(
            label.clone(),
            (*x, bottom + TICK_SIZE + 3),
            font.clone().pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
    }

    root.draw(&PathElement::new(vec![(left, top), (left, bottom)], line))?;
    for (y, label) in y_ticks {
        root.draw(&PathElement::new(vec![(left - TICK_SIZE, *y), (left, *y)], line))?;
        root.draw(&Text::new(
            label.clone(),
            (left - TICK_SIZE - 3, *y),
            font.clone().pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
    }

    Ok(())
}
