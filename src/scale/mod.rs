//! Scale building: global domains, colors and axis ticks.
//!
//! All of it is computed once per run from the normalized datasets and then
//! handed to the renderer (and the summary report).

pub mod color;
pub mod domain;
pub mod ticks;

pub use color::{CATEGORY10, ColorScale, SeriesColor};
pub use domain::{PriceDomain, TimeDomain, price_domain, time_domain};
pub use ticks::{format_currency, format_year, price_ticks, time_to_x, x_to_time, year_ticks};

use tracing::debug;

use crate::domain::Dataset;
use crate::error::AppError;

/// Everything the renderer needs to position and color the series.
#[derive(Debug, Clone)]
pub struct ChartScales {
    pub time: TimeDomain,
    pub price: PriceDomain,
    pub colors: ColorScale,
}

impl ChartScales {
    /// Build scales over the union of all datasets.
    ///
    /// Fails with exit code 3 when there is no point (or no finite close) to plot.
    pub fn build(datasets: &[Dataset]) -> Result<Self, AppError> {
        let time = time_domain(datasets)
            .ok_or_else(|| AppError::new(3, "No data points to plot."))?;
        let price = price_domain(datasets)
            .ok_or_else(|| AppError::new(3, "No finite close prices to plot."))?;
        let colors = ColorScale::new(datasets.iter().map(|d| d.name.as_str()));

        debug!(
            start = %time.start,
            end = %time.end,
            min = price.min,
            max = price.max,
            series = colors.len(),
            "built scales"
        );

        Ok(Self { time, price, colors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataPoint;
    use chrono::NaiveDate;

    #[test]
    fn build_rejects_empty_input() {
        let err = ChartScales::build(&[]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn build_assigns_colors_in_dataset_order() {
        let t = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let p = DataPoint { timestamp: t, open: 1.0, high: 1.0, low: 1.0, close: 1.0, volume: 1.0 };
        let data = vec![
            Dataset { name: "GOOG".to_string(), values: vec![p] },
            Dataset { name: "AAPL".to_string(), values: vec![p] },
        ];

        let scales = ChartScales::build(&data).unwrap();
        assert_eq!(scales.colors.color("GOOG"), CATEGORY10[0]);
        assert_eq!(scales.colors.color("AAPL"), CATEGORY10[1]);
        assert_eq!(scales.price, PriceDomain { min: 1.0, max: 1.0 });
    }
}
