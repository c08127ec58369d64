//! Shared valuation pipeline used by `gsv fit` and `gsv demo`.
//!
//! PriceTable -> TrendValuator::fit_transform -> evaluate_valuation
//!
//! The commands differ only in where the table comes from; presentation and
//! exports happen in `app`.

use crate::domain::{PriceTable, RunConfig, TrendFit, ValuationMetrics};
use crate::engine::TrendValuator;
use crate::error::Result;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub fit: TrendFit,
    pub metrics: ValuationMetrics,
}

/// Fit the trend on `table` and value the latest price against it.
pub fn run_valuation(config: &RunConfig, table: &PriceTable) -> Result<RunOutput> {
    let valuator = TrendValuator::new(config.model.clone());
    let fit = valuator.fit_transform(table, &config.price_field, &config.fit)?;
    let metrics = valuator.evaluate_valuation(&fit, &config.valuation)?;
    Ok(RunOutput { fit, metrics })
}
