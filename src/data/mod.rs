//! Data preparation: turning loaded CSV text into typed, ordered series.

pub mod normalize;

pub use normalize::{Normalized, normalize_all, normalize_dataset, parse_timestamp};
