//! Input/output helpers.
//!
//! - concurrent CSV loading from files or URLs (`ingest`)
//! - chart documents and JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
