//! Mathematical utilities: least squares line fitting and descriptive statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
