//! The trend valuation component.
//!
//! `TrendValuator` holds the windowing configuration and the message sink, and
//! runs the three stages:
//!
//! ```text
//! PriceTable -> split_train_recent -> fit_trend -> TrendFit -> evaluate_valuation -> ValuationMetrics
//! ```
//!
//! Fit results are returned to the caller instead of being kept on the
//! component, so a valuation can only be requested for a fit that exists.

use crate::domain::{
    FitParams, ModelConfig, PriceTable, TrendFit, ValuationMetrics, ValuationParams, WindowSplit,
};
use crate::error::Result;
use crate::fit::fit_trend;
use crate::report::{MessageSink, Reporter};
use crate::valuation::evaluate_valuation;
use crate::window::split_train_recent;

#[derive(Debug)]
pub struct TrendValuator {
    config: ModelConfig,
    reporter: Reporter,
}

impl TrendValuator {
    /// Component reporting through the `log` facade.
    pub fn new(config: ModelConfig) -> Self {
        let reporter = Reporter::with_log(config.verbosity);
        Self { config, reporter }
    }

    /// Component reporting through a caller-supplied sink.
    pub fn with_sink(config: ModelConfig, sink: impl MessageSink + 'static) -> Self {
        let reporter = Reporter::new(config.verbosity, sink);
        Self { config, reporter }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn split(&self, table: &PriceTable, price_field: &str) -> Result<WindowSplit> {
        split_train_recent(table, price_field, &self.config, &self.reporter)
    }

    /// Split, fit, flag outliers, and extrapolate.
    pub fn fit_transform(&self, table: &PriceTable, price_field: &str, params: &FitParams) -> Result<TrendFit> {
        let split = self.split(table, price_field)?;
        fit_trend(&split, price_field, params, &self.reporter)
    }

    pub fn evaluate_valuation(&self, fit: &TrendFit, params: &ValuationParams) -> Result<ValuationMetrics> {
        evaluate_valuation(fit, params, &self.reporter)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::data::sample::{SampleSpec, generate_table};
    use crate::domain::{MessageLevel, Verbosity};
    use crate::error::GsvError;

    fn config(recent_months: u32, train_years: u32) -> ModelConfig {
        ModelConfig {
            recent_months,
            train_years,
            date_end: None,
            verbosity: Verbosity::Silent,
        }
    }

    #[test]
    fn recovers_cagr_of_exponential_series() {
        let spec = SampleSpec { days: 3650, annual_growth: 0.10, noise: 0.0, ..SampleSpec::default() };
        let table = generate_table(&spec, "close_adj").unwrap();

        let model = TrendValuator::new(config(0, 10));
        let fit = model.fit_transform(&table, "close_adj", &FitParams::default()).unwrap();
        assert!(fit.recent.is_empty());
        assert_eq!(fit.train.len(), 3650);
        assert_eq!(fit.train[0].date, spec.start);

        let m = model.evaluate_valuation(&fit, &ValuationParams::default()).unwrap();
        assert!((m.annualized_return - 0.10).abs() < 1e-9, "got {}", m.annualized_return);
        assert!((m.train_years - 3649.0 / 365.0).abs() < 1e-12);
        assert!((m.r2_train - 1.0).abs() < 1e-9);
    }

    #[test]
    fn noisy_series_growth_is_close_to_generator() {
        let spec = SampleSpec { days: 3650, annual_growth: 0.07, noise: 0.02, seed: 3, ..SampleSpec::default() };
        let table = generate_table(&spec, "close_adj").unwrap();

        let model = TrendValuator::new(config(6, 10));
        let fit = model.fit_transform(&table, "close_adj", &FitParams::default()).unwrap();
        let m = model.evaluate_valuation(&fit, &ValuationParams::default()).unwrap();
        assert!((m.annualized_return - 0.07).abs() < 0.005, "got {}", m.annualized_return);
        assert!(!fit.recent.is_empty());
        assert!(m.over_value_range.abs() < 0.15);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let spec = SampleSpec { days: 1500, noise: 0.03, jump_prob: 0.01, seed: 5, ..SampleSpec::default() };
        let table = generate_table(&spec, "close").unwrap();
        let model = TrendValuator::new(config(3, 3));

        let fit_a = model.fit_transform(&table, "close", &FitParams::default()).unwrap();
        let fit_b = model.fit_transform(&table, "close", &FitParams::default()).unwrap();
        assert_eq!(fit_a, fit_b);

        let params = ValuationParams::default();
        assert_eq!(
            model.evaluate_valuation(&fit_a, &params).unwrap(),
            model.evaluate_valuation(&fit_b, &params).unwrap()
        );
    }

    #[test]
    fn injected_sink_receives_messages_with_levels() {
        let spec = SampleSpec { days: 400, ..SampleSpec::default() };
        let table = generate_table(&spec, "close").unwrap();

        let seen: Rc<RefCell<Vec<MessageLevel>>> = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = Rc::clone(&seen);
        let cfg = ModelConfig { verbosity: Verbosity::Key, ..config(1, 1) };
        let model = TrendValuator::with_sink(cfg, move |_: &str, level: MessageLevel| {
            sink_seen.borrow_mut().push(level);
        });

        let fit = model.fit_transform(&table, "close", &FitParams::default()).unwrap();
        model.evaluate_valuation(&fit, &ValuationParams::default()).unwrap();

        let seen = seen.borrow();
        // Two window summaries, "Fit regression...", "done!".
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|l| *l == MessageLevel::Key));
    }

    #[test]
    fn missing_price_field_is_reported() {
        let table = generate_table(&SampleSpec { days: 10, ..SampleSpec::default() }, "close").unwrap();
        let model = TrendValuator::new(config(0, 10));
        let err = model.fit_transform(&table, "close_adj", &FitParams::default()).unwrap_err();
        assert_eq!(err, GsvError::MissingColumn { field: "close_adj".to_string() });
    }
}
