//! Window splitting.
//!
//! Responsibilities:
//!
//! - pull one price column out of the input table and drop non-positive prices
//! - resolve the effective "current" date
//! - compute the adjacent training / recent date windows and partition the rows

pub mod split;

pub use split::*;
