//! `stock-chart` library crate.
//!
//! The binary (`stockchart`) is a thin wrapper around this library so that:
//!
//! - the data pipeline is testable without spawning processes
//! - loading, normalization, scales and rendering stay separate stages

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod scale;
