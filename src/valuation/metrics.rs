//! Valuation metrics.
//!
//! All metrics are computed from a `TrendFit`:
//!
//! - `r2_train`: `1 - SSE/SST` of price vs trend over non-outlier training points
//! - `train_years`: `(last training date - first training date) / 365`
//! - `annualized_return`: `(trend_last / trend_first)^(1 / train_years) - 1`
//!   over the training rows
//! - `current_price` / `fair_price`: price and trend of the last row
//!   (recent rows follow training rows)
//! - `over_value_range`: `current_price / fair_price - 1`
//! - `over_value_years`: only defined when `annualized_return >= min_annual_return`;
//!   `range / annualized_return` when over-valued, otherwise
//!   `range · annualized_return · under_value_weight`
//!
//! Divisions by zero and logs/powers outside their domain are reported as
//! `GsvError::Computation` rather than returned as NaN/Inf.

use crate::domain::{TrendFit, ValuationMetrics, ValuationParams};
use crate::error::{GsvError, Result};
use crate::math::r_squared;
use crate::report::Reporter;

const DAYS_PER_YEAR: f64 = 365.0;

pub fn evaluate_valuation(
    fit: &TrendFit,
    params: &ValuationParams,
    reporter: &Reporter,
) -> Result<ValuationMetrics> {
    if !params.min_annual_return.is_finite() || !params.under_value_weight.is_finite() {
        return Err(GsvError::InvalidConfig(
            "min_annual_return and under_value_weight must be finite.".to_string(),
        ));
    }

    let (Some(first), Some(last_train)) = (fit.train.first(), fit.train.last()) else {
        return Err(GsvError::NotFitted("the fit holds no training rows.".to_string()));
    };

    let (prices, trends): (Vec<f64>, Vec<f64>) = fit
        .train
        .iter()
        .filter(|p| !p.is_outlier)
        .map(|p| (p.price, p.trend))
        .unzip();
    if prices.is_empty() {
        return Err(GsvError::InsufficientData(
            "no non-outlier training rows to score the trend on.".to_string(),
        ));
    }
    let r2_train = r_squared(&prices, &trends).ok_or_else(|| {
        GsvError::Computation("R² is undefined: non-outlier training prices have zero variance.".to_string())
    })?;

    let span_days = (last_train.date - first.date).num_days();
    if span_days <= 0 {
        return Err(GsvError::Computation(format!(
            "training data spans {span_days} days; cannot annualize the trend."
        )));
    }
    let train_years = span_days as f64 / DAYS_PER_YEAR;

    let annualized_return = annualize(first.trend, last_train.trend, train_years)?;

    let Some(last) = fit.last_point() else {
        return Err(GsvError::NotFitted("the fit holds no rows.".to_string()));
    };
    let current_price = last.price;
    let fair_price = last.trend;
    if !(fair_price.is_finite() && fair_price > 0.0) {
        return Err(GsvError::Computation(format!(
            "fair price must be positive, got {fair_price}."
        )));
    }
    let over_value_range = current_price / fair_price - 1.0;

    let over_value_years = over_value_years(over_value_range, annualized_return, params)?;

    let metrics = ValuationMetrics {
        r2_train,
        train_years,
        annualized_return,
        current_price,
        fair_price,
        over_value_range,
        over_value_years,
    };

    reporter.detail(&format!(
        "R2 train = {r2_train:.3}, train years = {train_years:.3}, annualized return = {annualized_return:.3}."
    ));
    reporter.detail(&format!(
        "current price = {current_price:.3}, fair price = {fair_price:.3}, over-value range = {over_value_range:.3}, over-value years = {:.3}.",
        metrics.over_value_years_or_nan()
    ));

    Ok(metrics)
}

/// `(end / start)^(1 / years) - 1`.
fn annualize(start: f64, end: f64, years: f64) -> Result<f64> {
    if !(start.is_finite() && start > 0.0) {
        return Err(GsvError::Computation(format!(
            "trend at the first training row must be positive, got {start}."
        )));
    }
    if !(end.is_finite() && end > 0.0) {
        return Err(GsvError::Computation(format!(
            "trend at the last training row must be positive, got {end}."
        )));
    }
    let r = (end / start).powf(1.0 / years) - 1.0;
    if !r.is_finite() {
        return Err(GsvError::Computation("annualized return is not finite.".to_string()));
    }
    Ok(r)
}

fn over_value_years(range: f64, annualized_return: f64, params: &ValuationParams) -> Result<Option<f64>> {
    if annualized_return < params.min_annual_return {
        return Ok(None);
    }

    let years = if range >= 0.0 {
        range / annualized_return
    } else {
        range * annualized_return * params.under_value_weight
    };

    if years.is_finite() {
        Ok(Some(years))
    } else {
        Err(GsvError::Computation(format!(
            "over-value years is not finite (range={range}, annualized return={annualized_return})."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    use crate::domain::{FittedPoint, TrendForm, TrendModel, Verbosity, WindowBounds};
    use crate::math::LineFit;
    use crate::report::sink::testing::capture;

    fn day(i: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 1, 1).unwrap() + Days::new(i)
    }

    /// Points given as `(day offset, price, trend, is_outlier)`.
    fn fit_from(train: &[(u64, f64, f64, bool)], recent: &[(u64, f64, f64)]) -> TrendFit {
        let train_pts: Vec<FittedPoint> = train
            .iter()
            .enumerate()
            .map(|(x, &(d, price, trend, is_outlier))| FittedPoint {
                date: day(d),
                price,
                x,
                trend,
                is_outlier,
                is_recent: false,
            })
            .collect();
        let recent_pts: Vec<FittedPoint> = recent
            .iter()
            .enumerate()
            .map(|(i, &(d, price, trend))| FittedPoint {
                date: day(d),
                price,
                x: train.len() + i,
                trend,
                is_outlier: false,
                is_recent: true,
            })
            .collect();
        let line = LineFit { intercept: 0.0, slope: 0.0 };
        TrendFit {
            price_field: "close".to_string(),
            current_date: day(0),
            train_bounds: WindowBounds { start: day(0), end: day(0) },
            recent_bounds: WindowBounds { start: day(1), end: day(0) },
            model: TrendModel {
                form: TrendForm::LogLinear,
                first_pass: line,
                line,
                residual_mean: 0.0,
                residual_std: None,
                n_std: 1.5,
                n_outliers: train.iter().filter(|p| p.3).count(),
            },
            train: train_pts,
            recent: recent_pts,
        }
    }

    fn eval(fit: &TrendFit, min_annual_return: f64) -> Result<ValuationMetrics> {
        let params = ValuationParams { min_annual_return, ..ValuationParams::default() };
        evaluate_valuation(fit, &params, &Reporter::silent())
    }

    #[test]
    fn annualizes_trend_over_calendar_span() {
        // Trend doubles over 730 days → 2 years → sqrt(2) - 1.
        let fit = fit_from(&[(0, 99.0, 100.0, false), (365, 151.0, 141.0, false), (730, 199.0, 200.0, false)], &[]);
        let m = eval(&fit, 0.01).unwrap();
        assert!((m.train_years - 2.0).abs() < 1e-12);
        assert!((m.annualized_return - (2.0_f64.sqrt() - 1.0)).abs() < 1e-12);
        assert_eq!(m.current_price, 199.0);
        assert_eq!(m.fair_price, 200.0);
    }

    #[test]
    fn over_valued_branch_divides_by_growth() {
        // 21% growth over one year; last recent row 10% over trend.
        let fit = fit_from(&[(0, 100.0, 100.0, false), (365, 121.0, 121.0, false)], &[(400, 133.1, 121.0)]);
        let m = eval(&fit, 0.01).unwrap();
        assert!((m.annualized_return - 0.21).abs() < 1e-12);
        assert!((m.over_value_range - 0.1).abs() < 1e-12);
        assert!((m.over_value_years.unwrap() - 0.1 / 0.21).abs() < 1e-12);
    }

    #[test]
    fn under_valued_branch_uses_weight_of_one_hundred() {
        let fit = fit_from(&[(0, 100.0, 100.0, false), (365, 121.0, 121.0, false)], &[(400, 108.9, 121.0)]);
        let m = eval(&fit, 0.01).unwrap();
        assert!((m.over_value_range + 0.1).abs() < 1e-12);
        // -0.1 · 0.21 · 100
        assert!((m.over_value_years.unwrap() + 2.1).abs() < 1e-9);

        let params = ValuationParams { min_annual_return: 0.01, under_value_weight: 10.0 };
        let m = evaluate_valuation(&fit, &params, &Reporter::silent()).unwrap();
        assert!((m.over_value_years.unwrap() + 0.21).abs() < 1e-9);
    }

    #[test]
    fn years_undefined_below_min_return() {
        let fit = fit_from(&[(0, 100.0, 100.0, false), (365, 121.0, 105.0, false)], &[(380, 150.0, 105.5)]);
        for threshold in [0.051, 0.06, 0.5, 10.0] {
            let m = eval(&fit, threshold).unwrap();
            assert!(m.annualized_return < threshold);
            assert!(m.over_value_years.is_none());
            assert!(m.to_map()["over_value_years"].is_nan());
        }
        for threshold in [-1.0, 0.0, 0.049] {
            assert!(eval(&fit, threshold).unwrap().over_value_years.is_some());
        }
    }

    #[test]
    fn price_on_trend_gives_zero_range_and_years() {
        let fit = fit_from(&[(0, 90.0, 100.0, false), (365, 120.0, 110.0, false), (730, 121.0, 121.0, false)], &[]);
        let m = eval(&fit, 0.01).unwrap();
        assert_eq!(m.over_value_range, 0.0);
        assert_eq!(m.over_value_years, Some(0.0));
    }

    #[test]
    fn r2_ignores_outliers() {
        let fit = fit_from(
            &[
                (0, 100.0, 100.0, false),
                (100, 500.0, 103.0, true),
                (200, 106.0, 106.0, false),
                (300, 109.0, 109.0, false),
            ],
            &[],
        );
        let m = eval(&fit, 0.01).unwrap();
        assert!((m.r2_train - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_row_training_span_fails() {
        let fit = fit_from(&[(0, 100.0, 100.0, false), (0, 102.0, 100.0, false)], &[]);
        let err = eval(&fit, 0.01).unwrap_err();
        assert!(matches!(err, GsvError::Computation(_)));

        let fit = fit_from(&[(0, 100.0, 100.0, false)], &[]);
        assert!(matches!(eval(&fit, 0.01), Err(GsvError::Computation(_))));
    }

    #[test]
    fn non_positive_trend_is_a_computation_error() {
        let fit = fit_from(&[(0, 1.0, -5.0, false), (365, 20.0, 15.0, false)], &[]);
        assert!(matches!(eval(&fit, 0.01), Err(GsvError::Computation(_))));

        let fit = fit_from(&[(0, 10.0, 12.0, false), (365, 20.0, 15.0, false)], &[(370, 3.0, 0.0)]);
        assert!(matches!(eval(&fit, 0.01), Err(GsvError::Computation(_))));
    }

    #[test]
    fn empty_fit_is_not_fitted() {
        let fit = fit_from(&[], &[]);
        assert!(matches!(eval(&fit, 0.01), Err(GsvError::NotFitted(_))));
    }

    #[test]
    fn summary_lines_are_detail_messages() {
        let fit = fit_from(&[(0, 100.0, 100.0, false), (365, 121.0, 121.0, false)], &[]);
        let (reporter, log) = capture(Verbosity::Detailed);
        evaluate_valuation(&fit, &ValuationParams::default(), &reporter).unwrap();
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert!(log[0].0.starts_with("R2 train = "));
        assert!(log[1].0.contains("over-value years = 0.000"));
    }
}
