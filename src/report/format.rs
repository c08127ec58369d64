//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{MetricsFile, TrendFit, TrendForm, ValuationMetrics, WindowBounds};

/// Format the run summary (windows, fitted line, outliers).
pub fn format_run_summary(fit: &TrendFit) -> String {
    let mut out = String::new();

    out.push_str("=== gsv - Trend Valuation ===\n");
    out.push_str(&format!("Price field: {}\n", fit.price_field));
    out.push_str(&format!("Current date: {}\n", fit.current_date));
    out.push_str(&format!(
        "Train: {} | n={}\n",
        fmt_bounds(&fit.train_bounds),
        fit.train.len()
    ));
    if fit.recent.is_empty() {
        out.push_str("Recent: none\n");
    } else {
        out.push_str(&format!(
            "Recent: {} | n={}\n",
            fmt_bounds(&fit.recent_bounds),
            fit.recent.len()
        ));
    }

    let model = &fit.model;
    out.push_str("\nTrend:\n");
    out.push_str(&format!("- form: {}\n", model.form.display_name()));
    out.push_str(&format!(
        "- first pass: intercept={:.6} slope={:.6e}\n",
        model.first_pass.intercept, model.first_pass.slope
    ));
    out.push_str(&format!(
        "- re-fit    : intercept={:.6} slope={:.6e}\n",
        model.line.intercept, model.line.slope
    ));
    if model.form == TrendForm::LogLinear {
        out.push_str(&format!("- growth per row: {:.4}%\n", model.line.slope.exp_m1() * 100.0));
    }
    match model.outlier_band() {
        Some((lo, hi)) => out.push_str(&format!(
            "- outliers: {} of {} (residual band [{lo:.6}, {hi:.6}], n_std={})\n",
            model.n_outliers,
            fit.train.len(),
            model.n_std
        )),
        None => out.push_str(&format!("- outliers: {} of {}\n", model.n_outliers, fit.train.len())),
    }
    out.push('\n');

    out
}

/// Format the valuation metrics as a two-column table.
pub fn format_metrics(metrics: &ValuationMetrics) -> String {
    let mut out = String::new();
    out.push_str("Valuation:\n");
    out.push_str(&format!("{:<20} {:>14}\n", "metric", "value"));
    out.push_str(&format!("{:-<20} {:-<14}\n", "", ""));
    let values = metrics.to_map();
    for name in ValuationMetrics::NAMES {
        let value = values.get(name).copied().unwrap_or(f64::NAN);
        out.push_str(&format!("{name:<20} {:>14}\n", fmt_value(value)));
    }
    out
}

/// Format a saved metrics file.
pub fn format_metrics_file(file: &MetricsFile) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} - saved valuation ===\n", file.tool));
    out.push_str(&format!("Price field: {}\n", file.price_field));
    out.push_str(&format!("Form: {}\n", file.form.display_name()));
    out.push_str(&format!("Current date: {}\n", file.current_date));
    out.push_str(&format!(
        "Train: {} | n={} | outliers={}\n",
        fmt_bounds(&file.train),
        file.n_train,
        file.n_outliers
    ));
    if file.n_recent > 0 {
        out.push_str(&format!("Recent: {} | n={}\n", fmt_bounds(&file.recent), file.n_recent));
    } else {
        out.push_str("Recent: none\n");
    }
    out.push('\n');
    out.push_str(&format_metrics(&file.metrics));
    out
}

fn fmt_bounds(b: &WindowBounds) -> String {
    format!("[{}, {}]", b.start, b.end)
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() { "nan".to_string() } else { format!("{v:.4}") }
}
