//! CSV ingest into a `PriceTable`.
//!
//! The CSV needs a `date` header; every other column is read as numeric.
//! Header names are trimmed and lowercased, so `Close_Adj` and `close_adj`
//! name the same column.
//!
//! Rows whose date cannot be parsed are skipped and reported. Blank or
//! non-numeric cells become NaN; the window splitter drops those rows for the
//! chosen price column only, so a gap in `close` does not hide a valid
//! `close_adj` value on the same row.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Column, DATE_FIELD, PriceTable};
use crate::error::{GsvError, Result};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the table plus what was skipped on the way.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: PriceTable,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a price CSV from disk.
pub fn load_price_table(path: &Path) -> Result<IngestedTable> {
    let file = File::open(path)
        .map_err(|e| GsvError::Io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_price_table(file)
}

/// Read a price CSV from any reader.
pub fn read_price_table<R: Read>(input: R) -> Result<IngestedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| GsvError::Parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let Some(&date_idx) = header_map.get(DATE_FIELD) else {
        return Err(GsvError::MissingColumn { field: DATE_FIELD.to_string() });
    };

    // Keep the header order for numeric columns; duplicates resolve to the last one.
    let mut numeric: Vec<(String, usize)> = header_map
        .iter()
        .filter(|(name, _)| name.as_str() != DATE_FIELD && !name.is_empty())
        .map(|(name, &idx)| (name.clone(), idx))
        .collect();
    numeric.sort_by_key(|(_, idx)| *idx);

    let mut dates = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); numeric.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError { line, message: format!("CSV parse error: {e}") });
                continue;
            }
        };

        let date = match record.get(date_idx).map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => match parse_date(s) {
                Ok(d) => d,
                Err(message) => {
                    row_errors.push(RowError { line, message });
                    continue;
                }
            },
            None => {
                row_errors.push(RowError { line, message: "Missing required value: `date`".to_string() });
                continue;
            }
        };

        dates.push(date);
        for ((_, col_idx), column) in numeric.iter().zip(values.iter_mut()) {
            column.push(parse_cell(record.get(*col_idx)));
        }
    }

    for err in &row_errors {
        log::warn!("Skipped CSV line {}: {}", err.line, err.message);
    }

    let mut table = PriceTable::new();
    table.insert_column(DATE_FIELD, Column::Date(dates))?;
    for ((name, _), column) in numeric.into_iter().zip(values) {
        table.insert_column(name, Column::Numeric(column))?;
    }

    log::debug!(
        "Read {rows_read} CSV rows, kept {}, skipped {}.",
        table.len(),
        row_errors.len()
    );

    Ok(IngestedTable { table, row_errors, rows_read })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // Timestamps such as `2024-01-02 00:00:00` or `2024-01-02T00:00:00Z`.
    if let Some(prefix) = s.get(..10) {
        if s.len() > 10 && matches!(s.as_bytes()[10], b' ' | b'T') {
            if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Ok(d);
            }
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_cell(s: Option<&str>) -> f64 {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
