//! Model evaluation for the linear and log-linear trend.
//!
//! The fitter relies on three primitive operations:
//! - map a price into regression space (`transform`)
//! - map a regression-space value back to a price (`back_transform`)
//! - predict the trend price at an index given a fitted line (`predict`)

use crate::domain::TrendForm;
use crate::math::LineFit;

/// Price → regression space.
///
/// Log-linear fits take `ln(price)`; callers only pass positive prices.
pub fn transform(form: TrendForm, price: f64) -> f64 {
    match form {
        TrendForm::Linear => price,
        TrendForm::LogLinear => price.ln(),
    }
}

/// Regression space → price.
pub fn back_transform(form: TrendForm, y: f64) -> f64 {
    match form {
        TrendForm::Linear => y,
        TrendForm::LogLinear => y.exp(),
    }
}

/// Trend price at index `x`.
pub fn predict(form: TrendForm, line: &LineFit, x: f64) -> f64 {
    back_transform(form, line.eval(x))
}
