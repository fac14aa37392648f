//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input descriptions (`SourceSpec`, `Locator`) and raw rows (`RawRecord`)
//! - normalized series (`Dataset`, `DataPoint`)
//! - chart geometry and run configuration (`ChartLayout`, `ChartConfig`)

pub mod types;

pub use types::*;
