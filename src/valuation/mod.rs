//! Valuation metrics derived from a fitted trend.

pub mod metrics;

pub use metrics::*;
