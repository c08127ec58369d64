//! Two-pass trend fit over a window split.
//!
//! Given the training window (rows in date order, indexed `x = 0..n-1`):
//!
//! 1. fit OLS of `y` on `x` (`y = ln(price)` for log-linear fits, else `price`)
//! 2. residual = predicted - actual; flag points outside `mean ± n_std·std`
//! 3. re-fit on the non-flagged points and recompute the trend for every
//!    training point; flags from step 2 are kept as they are
//! 4. continue `x` into the recent window and extrapolate the re-fitted line
//!
//! Exactly one re-fit happens. Flags are not re-evaluated against the second line.

use crate::domain::{FitParams, FittedPoint, TrendFit, TrendForm, TrendModel, Window, WindowSplit};
use crate::error::{GsvError, Result};
use crate::fit::outliers::classify_outliers;
use crate::math::{LineFit, fit_line};
use crate::models::{predict, transform};
use crate::report::Reporter;

/// Fit the trend on `split.training` and extend it over `split.recent`.
pub fn fit_trend(
    split: &WindowSplit,
    price_field: &str,
    params: &FitParams,
    reporter: &Reporter,
) -> Result<TrendFit> {
    if !params.n_std.is_finite() {
        return Err(GsvError::InvalidConfig(format!(
            "outlier multiplier n_std must be finite, got {}.",
            params.n_std
        )));
    }

    let training = &split.training;
    if training.is_empty() {
        return Err(GsvError::InsufficientData("training window is empty.".to_string()));
    }

    let form = TrendForm::from_log_flag(params.log_space);
    let n = training.len();
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<f64> = training
        .observations
        .iter()
        .map(|o| transform(form, o.price))
        .collect();

    reporter.key("Fit regression...");
    let first_pass = solve_line(&x, &y, "first-pass")?;

    let residuals: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| first_pass.eval(xi) - yi)
        .collect();
    let band = classify_outliers(&residuals, params.n_std);
    let n_outliers = band.count();
    reporter.detail(&format!("{n_outliers} out of {n} dates are outliers."));

    reporter.detail("Re-fit without outliers...");
    let (x_kept, y_kept): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .zip(band.flags.iter())
        .filter(|(_, is_outlier)| !**is_outlier)
        .map(|((&xi, &yi), _)| (xi, yi))
        .unzip();

    if x_kept.is_empty() {
        return Err(GsvError::InsufficientData(format!(
            "all {n} training points were classified as outliers (n_std={}).",
            params.n_std
        )));
    }
    let line = solve_line(&x_kept, &y_kept, "re-fit")?;

    let model = TrendModel {
        form,
        first_pass,
        line,
        residual_mean: band.mean,
        residual_std: band.std,
        n_std: params.n_std,
        n_outliers,
    };

    let train = fitted_points(training, &model, 0, &band.flags, false)?;

    let recent = if split.recent.is_empty() {
        reporter.detail("No recent data to estimate.");
        Vec::new()
    } else {
        reporter.detail("Extend trend to recent data.");
        let no_flags = vec![false; split.recent.len()];
        fitted_points(&split.recent, &model, n, &no_flags, true)?
    };

    reporter.key("done!");

    Ok(TrendFit {
        price_field: price_field.to_string(),
        current_date: split.current_date,
        train_bounds: split.training.bounds,
        recent_bounds: split.recent.bounds,
        model,
        train,
        recent,
    })
}

fn solve_line(x: &[f64], y: &[f64], stage: &str) -> Result<LineFit> {
    fit_line(x, y).ok_or_else(|| GsvError::Computation(format!("{stage} regression could not be solved.")))
}

fn fitted_points(
    window: &Window,
    model: &TrendModel,
    x_offset: usize,
    flags: &[bool],
    is_recent: bool,
) -> Result<Vec<FittedPoint>> {
    window
        .observations
        .iter()
        .zip(flags.iter())
        .enumerate()
        .map(|(i, (obs, &is_outlier))| {
            let x = x_offset + i;
            let trend = predict(model.form, &model.line, x as f64);
            if !trend.is_finite() {
                return Err(GsvError::Computation(format!(
                    "non-finite trend value at {} (x={x}).",
                    obs.date
                )));
            }
            Ok(FittedPoint {
                date: obs.date,
                price: obs.price,
                x,
                trend,
                is_outlier,
                is_recent,
            })
        })
        .collect()
}
