//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and valuation
//! - exported to JSON/CSV
//! - reloaded later for display

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::math::LineFit;

/// Name of the date column every input table must carry.
pub const DATE_FIELD: &str = "date";

/// Default price column (close adjusted for splits and distributions).
pub const DEFAULT_PRICE_FIELD: &str = "close_adj";

/// A single dated price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub price: f64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Role of a window within the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowRole {
    Training,
    Recent,
}

impl WindowRole {
    pub fn label(self) -> &'static str {
        match self {
            WindowRole::Training => "Train",
            WindowRole::Recent => "Recent",
        }
    }
}

/// Inclusive date bounds of a window.
///
/// An empty recent window has `start > end` (e.g. `recent_months = 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WindowBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A contiguous, date-bounded, date-ordered subset of the input observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub role: WindowRole,
    pub bounds: WindowBounds,
    pub observations: Vec<PriceObservation>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of distinct dates (duplicates by date are kept as separate rows).
    pub fn distinct_dates(&self) -> usize {
        let mut n = 0;
        let mut prev = None;
        for obs in &self.observations {
            if prev != Some(obs.date) {
                n += 1;
                prev = Some(obs.date);
            }
        }
        n
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }
}

/// Output of the window splitter.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSplit {
    /// The effective "current" date (reference date clamped to the data).
    pub current_date: NaiveDate,
    pub training: Window,
    pub recent: Window,
}

/// Regression space for the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendForm {
    /// `price ~ a + b·x`
    Linear,
    /// `ln(price) ~ a + b·x`
    LogLinear,
}

impl TrendForm {
    pub fn from_log_flag(log_space: bool) -> Self {
        if log_space { TrendForm::LogLinear } else { TrendForm::Linear }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TrendForm::Linear => "linear",
            TrendForm::LogLinear => "log-linear",
        }
    }
}

/// An observation augmented with the fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedPoint {
    pub date: NaiveDate,
    pub price: f64,
    /// 0-based position in the combined training + recent ordering.
    pub x: usize,
    /// Model price at `x` (back-transformed for log-linear fits).
    pub trend: f64,
    /// Only ever true for training points.
    pub is_outlier: bool,
    pub is_recent: bool,
}

/// The fitted regression and the residual band used to classify outliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub form: TrendForm,
    /// First pass, fitted on every training point.
    pub first_pass: LineFit,
    /// Second pass, fitted on non-outlier training points. Used for all trend values.
    pub line: LineFit,
    /// Mean of first-pass residuals (`predicted - actual`, in regression space).
    pub residual_mean: f64,
    /// Sample standard deviation of first-pass residuals; `None` with fewer than two points.
    pub residual_std: Option<f64>,
    pub n_std: f64,
    pub n_outliers: usize,
}

impl TrendModel {
    /// Trend price at index `x` from the second-pass line.
    pub fn predict(&self, x: f64) -> f64 {
        crate::models::predict(self.form, &self.line, x)
    }

    /// Inclusive residual band `[mean - n_std·std, mean + n_std·std]`.
    pub fn outlier_band(&self) -> Option<(f64, f64)> {
        let std = self.residual_std?;
        Some((
            self.residual_mean - self.n_std * std,
            self.residual_mean + self.n_std * std,
        ))
    }
}

/// Everything the fit stage produces; valuation and plotting consume this by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFit {
    pub price_field: String,
    pub current_date: NaiveDate,
    pub train_bounds: WindowBounds,
    pub recent_bounds: WindowBounds,
    pub model: TrendModel,
    pub train: Vec<FittedPoint>,
    pub recent: Vec<FittedPoint>,
}

impl TrendFit {
    /// Training points followed by recent points.
    pub fn combined(&self) -> impl Iterator<Item = &FittedPoint> {
        self.train.iter().chain(self.recent.iter())
    }

    /// Last row of the training + recent concatenation.
    pub fn last_point(&self) -> Option<&FittedPoint> {
        self.recent.last().or_else(|| self.train.last())
    }

    pub fn outliers(&self) -> impl Iterator<Item = &FittedPoint> {
        self.train.iter().filter(|p| p.is_outlier)
    }
}

/// Valuation snapshot derived from a `TrendFit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationMetrics {
    /// R² of the trend over non-outlier training points (price space).
    pub r2_train: f64,
    /// Span of the training data in years (`days / 365`).
    pub train_years: f64,
    /// Annualized growth of the trend across the training data.
    pub annualized_return: f64,
    pub current_price: f64,
    /// Trend value at the last row.
    pub fair_price: f64,
    /// `current_price / fair_price - 1`.
    pub over_value_range: f64,
    /// Undefined (`None`) when the trend grows slower than `min_annual_return`.
    pub over_value_years: Option<f64>,
}

impl ValuationMetrics {
    pub const NAMES: [&'static str; 7] = [
        "r2_train",
        "train_years",
        "annualized_return",
        "current_price",
        "fair_price",
        "over_value_range",
        "over_value_years",
    ];

    /// `over_value_years` with NaN standing in for "undefined".
    pub fn over_value_years_or_nan(&self) -> f64 {
        self.over_value_years.unwrap_or(f64::NAN)
    }

    /// Flat metric name → value mapping.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let values = [
            self.r2_train,
            self.train_years,
            self.annualized_return,
            self.current_price,
            self.fair_price,
            self.over_value_range,
            self.over_value_years_or_nan(),
        ];
        Self::NAMES.into_iter().zip(values).collect()
    }
}

/// How much the model reports through its message sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    Key,
    Detailed,
}

impl Verbosity {
    /// Map the numeric level (`0`, `1`, `2+`).
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Key,
            _ => Verbosity::Detailed,
        }
    }

    pub fn allows(self, level: MessageLevel) -> bool {
        match level {
            MessageLevel::Key => self >= Verbosity::Key,
            MessageLevel::Detail => self >= Verbosity::Detailed,
        }
    }
}

/// Severity attached to each emitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Key,
    Detail,
}

/// Windowing and reporting options of the model component.
///
/// Values are validated when used, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Months at the end of the data excluded from fitting.
    pub recent_months: u32,
    /// Length of the training window in years.
    pub train_years: u32,
    /// The "current" date. Defaults to the last date in the data.
    pub date_end: Option<NaiveDate>,
    pub verbosity: Verbosity,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            recent_months: 0,
            train_years: 10,
            date_end: None,
            verbosity: Verbosity::Detailed,
        }
    }
}

/// Options of a single fit call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub log_space: bool,
    /// Outliers are residuals outside `mean ± n_std·std`.
    pub n_std: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self { log_space: true, n_std: 1.5 }
    }
}

/// Options of a single valuation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationParams {
    /// Minimum annualized trend growth for `over_value_years` to be defined.
    pub min_annual_return: f64,
    /// Multiplier applied in the under-valued branch:
    /// `over_value_range · annualized_return · under_value_weight`.
    ///
    /// Tuned value with no derivation; `100` keeps results comparable with
    /// earlier runs of the tool.
    pub under_value_weight: f64,
}

pub const DEFAULT_UNDER_VALUE_WEIGHT: f64 = 100.0;

impl Default for ValuationParams {
    fn default() -> Self {
        Self {
            min_annual_return: 0.01,
            under_value_weight: DEFAULT_UNDER_VALUE_WEIGHT,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub price_field: String,
    pub model: ModelConfig,
    pub fit: FitParams,
    pub valuation: ValuationParams,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_points: Option<PathBuf>,
    pub export_metrics: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

/// A saved valuation file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsFile {
    pub tool: String,
    pub price_field: String,
    pub form: TrendForm,
    pub current_date: NaiveDate,
    pub train: WindowBounds,
    pub recent: WindowBounds,
    pub n_train: usize,
    pub n_recent: usize,
    pub n_outliers: usize,
    pub metrics: ValuationMetrics,
}
