//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the input table (`PriceTable`) and observations (`PriceObservation`)
//! - window split outputs (`Window`, `WindowSplit`)
//! - fit and valuation outputs (`TrendFit`, `FittedPoint`, `ValuationMetrics`)
//! - configuration (`ModelConfig`, `FitParams`, `ValuationParams`, `RunConfig`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
