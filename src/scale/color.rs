//! Categorical color assignment.

use std::cell::RefCell;
use std::collections::HashMap;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SeriesColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The ten-color "category10" palette.
pub const CATEGORY10: [SeriesColor; 10] = [
    SeriesColor::rgb(0x1f, 0x77, 0xb4), // blue
    SeriesColor::rgb(0xff, 0x7f, 0x0e), // orange
    SeriesColor::rgb(0x2c, 0xa0, 0x2c), // green
    SeriesColor::rgb(0xd6, 0x27, 0x28), // red
    SeriesColor::rgb(0x94, 0x67, 0xbd), // purple
    SeriesColor::rgb(0x8c, 0x56, 0x4b), // brown
    SeriesColor::rgb(0xe3, 0x77, 0xc2), // pink
    SeriesColor::rgb(0x7f, 0x7f, 0x7f), // gray
    SeriesColor::rgb(0xbc, 0xbd, 0x22), // olive
    SeriesColor::rgb(0x17, 0xbe, 0xcf), // cyan
];

/// Ordinal scale from series name to palette color.
///
/// Names get colors in first-seen order, cycling through the palette. Looking
/// up an unknown name assigns it the next color, so the mapping is total and
/// stable for the lifetime of the scale.
#[derive(Debug, Clone)]
pub struct ColorScale {
    palette: Vec<SeriesColor>,
    assigned: RefCell<HashMap<String, usize>>,
}

impl ColorScale {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::with_palette(CATEGORY10.to_vec(), names)
    }

    /// An empty palette falls back to [`CATEGORY10`].
    pub fn with_palette<'a>(palette: Vec<SeriesColor>, names: impl IntoIterator<Item = &'a str>) -> Self {
        let palette = if palette.is_empty() { CATEGORY10.to_vec() } else { palette };
        let scale = Self {
            palette,
            assigned: RefCell::new(HashMap::new()),
        };
        for name in names {
            scale.color(name);
        }
        scale
    }

    /// Color for `name`.
    pub fn color(&self, name: &str) -> SeriesColor {
        let mut assigned = self.assigned.borrow_mut();
        let next = assigned.len();
        let idx = *assigned.entry(name.to_string()).or_insert(next);
        self.palette[idx % self.palette.len()]
    }

    /// Number of distinct names seen so far.
    pub fn len(&self) -> usize {
        self.assigned.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_in_first_seen_order() {
        let scale = ColorScale::new(["AAPL", "GOOG", "AMZN"]);
        assert_eq!(scale.color("AAPL"), CATEGORY10[0]);
        assert_eq!(scale.color("GOOG"), CATEGORY10[1]);
        assert_eq!(scale.color("AMZN"), CATEGORY10[2]);
    }

    #[test]
    fn same_name_same_color() {
        let scale = ColorScale::new(["AAPL", "AAPL", "IBM"]);
        assert_eq!(scale.len(), 2);
        assert_eq!(scale.color("AAPL"), scale.color("AAPL"));
        assert_eq!(scale.color("IBM"), CATEGORY10[1]);
    }

    #[test]
    fn unknown_names_extend_the_domain() {
        let scale = ColorScale::new(["AAPL"]);
        let msft = scale.color("MSFT");
        assert_eq!(msft, CATEGORY10[1]);
        assert_eq!(scale.color("MSFT"), msft);
    }

    #[test]
    fn cycles_past_palette_end() {
        let names: Vec<String> = (0..12).map(|i| format!("S{i}")).collect();
        let scale = ColorScale::new(names.iter().map(String::as_str));
        assert_eq!(scale.color("S10"), CATEGORY10[0]);
        assert_eq!(scale.color("S11"), CATEGORY10[1]);
    }

    #[test]
    fn hex_format() {
        assert_eq!(CATEGORY10[0].hex(), "#1f77b4");
    }
}
