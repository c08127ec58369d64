//! Split a price history into a training window and a recent (holdout) window.
//!
//! With `current` the effective end date:
//!
//! ```text
//! recent   = [current - recent_months + 1d, current]
//! training = [recent_start - train_years, recent_start - 1d]   (start clamped to first date)
//! ```
//!
//! Month and year offsets clamp to the end of the month (`2024-03-31` minus one
//! month is `2024-02-29`), so the two windows are always adjacent.

use chrono::{Days, Months, NaiveDate};

use crate::domain::{ModelConfig, PriceObservation, PriceTable, Window, WindowBounds, WindowRole, WindowSplit};
use crate::error::{GsvError, Result};
use crate::report::Reporter;

/// Split `table[price_field]` into training and recent windows.
pub fn split_train_recent(
    table: &PriceTable,
    price_field: &str,
    config: &ModelConfig,
    reporter: &Reporter,
) -> Result<WindowSplit> {
    let mut observations: Vec<PriceObservation> = table
        .series(price_field)?
        .into_iter()
        .filter(|o| o.price.is_finite() && o.price > 0.0)
        .collect();

    // Stable: rows sharing a date keep their input order.
    observations.sort_by_key(|o| o.date);

    let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
        return Err(GsvError::EmptyInput { field: price_field.to_string() });
    };
    let (date_min, date_max) = (first.date, last.date);

    let current_date = match config.date_end {
        Some(end) => end.min(date_max),
        None => date_max,
    };

    let (train_bounds, recent_bounds) =
        compute_bounds(current_date, config.recent_months, config.train_years, date_min)?;

    let training = collect_window(&observations, WindowRole::Training, train_bounds);
    let recent = collect_window(&observations, WindowRole::Recent, recent_bounds);

    if training.is_empty() {
        return Err(GsvError::InsufficientData(format!(
            "no training rows between {} and {}.",
            train_bounds.start, train_bounds.end
        )));
    }

    reporter.key(&describe_window(&training));
    if recent.is_empty() {
        reporter.key("No recent data specified.");
    } else {
        reporter.key(&describe_window(&recent));
    }

    Ok(WindowSplit {
        current_date,
        training,
        recent,
    })
}

/// Compute `(training, recent)` bounds for an effective current date.
///
/// The training start never precedes `date_min`.
pub fn compute_bounds(
    current_date: NaiveDate,
    recent_months: u32,
    train_years: u32,
    date_min: NaiveDate,
) -> Result<(WindowBounds, WindowBounds)> {
    let overflow = || {
        GsvError::InvalidConfig(format!(
            "window offsets (recent_months={recent_months}, train_years={train_years}) leave the supported date range."
        ))
    };

    let recent_start = current_date
        .checked_sub_months(Months::new(recent_months))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .ok_or_else(overflow)?;
    let train_end = recent_start.pred_opt().ok_or_else(overflow)?;

    let train_months = train_years.checked_mul(12).ok_or_else(overflow)?;
    let train_start = train_end
        .checked_sub_months(Months::new(train_months))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .ok_or_else(overflow)?
        .max(date_min);

    Ok((
        WindowBounds { start: train_start, end: train_end },
        WindowBounds { start: recent_start, end: current_date },
    ))
}

fn collect_window(observations: &[PriceObservation], role: WindowRole, bounds: WindowBounds) -> Window {
    Window {
        role,
        bounds,
        observations: observations
            .iter()
            .filter(|o| bounds.contains(o.date))
            .copied()
            .collect(),
    }
}

fn describe_window(window: &Window) -> String {
    let (Some(first), Some(last)) = (window.first_date(), window.last_date()) else {
        return format!("{} data is empty.", window.role.label());
    };
    format!(
        "{} data contains {} rows over {} dates from {} to {}.",
        window.role.label(),
        window.len(),
        window.distinct_dates(),
        first,
        last
    )
}
