//! Export fitted points to CSV.
//!
//! One row per training and recent point, in `x` order, so the file can be
//! charted or checked in a spreadsheet.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::TrendFit;
use crate::error::{GsvError, Result};

const HEADER: &str = "date,price,x,trend,is_outlier,is_recent";

/// Write the fitted points to a CSV file.
pub fn write_points_csv(path: &Path, fit: &TrendFit) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| GsvError::Io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_points(file, fit)
}

/// Write the fitted points to any writer.
pub fn write_points<W: Write>(mut out: W, fit: &TrendFit) -> Result<()> {
    writeln!(out, "{HEADER}").map_err(|e| GsvError::Io(format!("Failed to write export CSV header: {e}")))?;

    for p in fit.combined() {
        writeln!(
            out,
            "{},{:.6},{},{:.6},{},{}",
            p.date, p.price, p.x, p.trend, p.is_outlier, p.is_recent
        )
        .map_err(|e| GsvError::Io(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
