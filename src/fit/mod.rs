//! Trend fitting.
//!
//! Responsibilities:
//!
//! - fit a (log-)linear OLS trend on the training window
//! - flag residual outliers and re-fit once without them
//! - extrapolate the re-fitted trend across the recent window

pub mod fitter;
pub mod outliers;

pub use fitter::*;
pub use outliers::*;
