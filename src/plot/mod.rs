//! Chart rendering.
//!
//! - curve smoothing (`curve`)
//! - SVG chart + HTML host page (`svg`)

pub mod curve;
pub mod svg;

pub use svg::{ChartStyle, render_svg, wrap_html};
