//! Input/output helpers.
//!
//! - CSV ingest into a `PriceTable` (`ingest`)
//! - fitted-points CSV export (`export`)
//! - metrics JSON read/write (`metrics`)

pub mod export;
pub mod ingest;
pub mod metrics;

pub use export::*;
pub use ingest::*;
pub use metrics::*;
