//! `gsv` library crate: growth-stock trend valuation.
//!
//! A price history is split into a training window and a recent window, a
//! (log-)linear trend is fitted on the training window with one round of
//! outlier removal, and the latest price is valued against the extrapolated
//! trend.
//!
//! The binary (`gsv`) is a thin wrapper around this library so the pipeline is
//! testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod valuation;
pub mod window;

pub use engine::TrendValuator;
pub use error::{GsvError, Result};
