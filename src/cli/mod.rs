//! Command-line parsing for the `gsv` growth-stock valuation tool.
//!
//! Argument parsing and command dispatch are kept apart from the fitting and
//! valuation code. Every model flag can also come from a `GSV_*` environment
//! variable (a `.env` file is loaded before parsing).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_PRICE_FIELD;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gsv", version, about = "Growth-stock trend valuation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the trend on a price CSV, print metrics, and optionally plot/export.
    Fit(FitArgs),
    /// Run the same pipeline on a generated price series.
    Demo(DemoArgs),
    /// Print a metrics JSON written by `--export-metrics`.
    Show(ShowArgs),
}

/// Options for `gsv fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Price CSV with a `date` column and one or more price columns.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `gsv demo`.
#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// First date of the generated series.
    #[arg(long, default_value = "2014-01-01")]
    pub start: NaiveDate,

    /// Number of daily observations.
    #[arg(long, default_value_t = 3650)]
    pub days: usize,

    /// Price on the first day.
    #[arg(long, default_value_t = 100.0)]
    pub start_price: f64,

    /// Annual growth of the underlying trend.
    #[arg(long, default_value_t = 0.08)]
    pub growth: f64,

    /// Daily log-noise standard deviation.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// Probability of a jump outlier on any given day.
    #[arg(long, default_value_t = 0.01)]
    pub jump_prob: f64,

    /// Jump size in log space.
    #[arg(long, default_value_t = 0.5)]
    pub jump_scale: f64,

    /// Random seed for the generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Windowing, fit, and valuation parameters.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Price column to model.
    #[arg(long = "price-col", env = "GSV_PRICE_COL", default_value = DEFAULT_PRICE_FIELD)]
    pub price_col: String,

    /// Months of data at the end held out as the recent window.
    #[arg(long, env = "GSV_RECENT_MONTHS", default_value_t = 0)]
    pub recent_months: u32,

    /// Years of training data before the recent window.
    #[arg(long, env = "GSV_TRAIN_YEARS", default_value_t = 10)]
    pub train_years: u32,

    /// Last date to use (YYYY-MM-DD); defaults to the last date in the data.
    #[arg(long, env = "GSV_DATE_END")]
    pub date_end: Option<NaiveDate>,

    /// Fit raw prices instead of log prices.
    #[arg(long, env = "GSV_LINEAR")]
    pub linear: bool,

    /// Residual band half-width, in standard deviations, for outliers.
    #[arg(long, env = "GSV_N_STD", default_value_t = 1.5, allow_negative_numbers = true)]
    pub n_std: f64,

    /// Minimum annualized return for over-value years to be defined.
    #[arg(long, env = "GSV_MIN_ANNUAL_RETURN", default_value_t = 0.01, allow_negative_numbers = true)]
    pub min_annual_return: f64,

    /// Weight applied to under-valued over-value years.
    #[arg(long, env = "GSV_UNDER_VALUE_WEIGHT", default_value_t = 100.0)]
    pub under_value_weight: f64,

    /// Progress verbosity: 0 silent, 1 key steps, 2 details.
    #[arg(short = 'v', long, env = "GSV_VERBOSE", default_value_t = 2)]
    pub verbose: u8,
}

/// Terminal and file outputs.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export fitted points to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the valuation metrics to JSON.
    #[arg(long = "export-metrics")]
    pub export_metrics: Option<PathBuf>,

    /// Write an SVG chart of price, trend, and outliers.
    #[arg(long)]
    pub chart: Option<PathBuf>,
}

/// Options for `gsv show`.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Metrics JSON produced by `gsv fit --export-metrics`.
    #[arg(long, value_name = "JSON")]
    pub metrics: PathBuf,
}
