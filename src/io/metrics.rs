//! Read/write metrics JSON files.
//!
//! A metrics file is the portable record of one valuation run: window bounds,
//! trend form, row counts, and the `ValuationMetrics` themselves. `gsv show`
//! reads it back without refitting. The schema is `domain::MetricsFile`;
//! an undefined `over_value_years` is stored as `null`.

use std::fs::File;
use std::path::Path;

use crate::domain::{MetricsFile, TrendFit, ValuationMetrics};
use crate::error::{GsvError, Result};

/// Assemble the metrics file contents for a run.
pub fn metrics_file(fit: &TrendFit, metrics: &ValuationMetrics) -> MetricsFile {
    MetricsFile {
        tool: "gsv".to_string(),
        price_field: fit.price_field.clone(),
        form: fit.model.form,
        current_date: fit.current_date,
        train: fit.train_bounds,
        recent: fit.recent_bounds,
        n_train: fit.train.len(),
        n_recent: fit.recent.len(),
        n_outliers: fit.model.n_outliers,
        metrics: *metrics,
    }
}

/// Write a metrics JSON file.
pub fn write_metrics_json(path: &Path, file: &MetricsFile) -> Result<()> {
    let out = File::create(path)
        .map_err(|e| GsvError::Io(format!("Failed to create metrics JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| GsvError::Io(format!("Failed to write metrics JSON: {e}")))?;
    Ok(())
}

/// Read a metrics JSON file.
pub fn read_metrics_json(path: &Path) -> Result<MetricsFile> {
    let input = File::open(path)
        .map_err(|e| GsvError::Io(format!("Failed to open metrics JSON '{}': {e}", path.display())))?;
    let file: MetricsFile =
        serde_json::from_reader(input).map_err(|e| GsvError::Parse(format!("Invalid metrics JSON: {e}")))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{TrendForm, WindowBounds};

    fn sample_file(over_value_years: Option<f64>) -> MetricsFile {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        MetricsFile {
            tool: "gsv".to_string(),
            price_field: "close_adj".to_string(),
            form: TrendForm::LogLinear,
            current_date: d(6, 28),
            train: WindowBounds { start: d(1, 2), end: d(3, 28) },
            recent: WindowBounds { start: d(3, 29), end: d(6, 28) },
            n_train: 60,
            n_recent: 62,
            n_outliers: 4,
            metrics: ValuationMetrics {
                r2_train: 0.875,
                train_years: 0.25,
                annualized_return: 0.0625,
                current_price: 102.5,
                fair_price: 100.0,
                over_value_range: 0.025,
                over_value_years,
            },
        }
    }

    #[test]
    fn undefined_years_is_stored_as_null() {
        let json = serde_json::to_string(&sample_file(None)).unwrap();
        assert!(json.contains("\"over_value_years\":null"));
        let back: MetricsFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metrics.over_value_years, None);
    }

    #[test]
    fn file_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("gsv-metrics-{}.json", std::process::id()));
        let file = sample_file(Some(0.5));
        write_metrics_json(&path, &file).unwrap();
        let back = read_metrics_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, file);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("gsv-metrics-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_metrics_json(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, GsvError::Parse(_)));
    }
}
