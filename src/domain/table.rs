//! Column-oriented price table.
//!
//! This is the input contract of the pipeline: a `date` column plus any number
//! of named numeric columns (e.g. `close`, `close_adj`). Loaders (CSV ingest,
//! the synthetic generator) build it; the window splitter reads one price
//! column out of it.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DATE_FIELD, PriceObservation};
use crate::error::{GsvError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Date(Vec<NaiveDate>),
    /// Missing or unparseable cells are NaN.
    Numeric(Vec<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Date(v) => v.len(),
            Column::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    n_rows: usize,
    columns: BTreeMap<String, Column>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a two-column table (`date` + `price_field`).
    pub fn from_observations(observations: &[PriceObservation], price_field: &str) -> Self {
        let mut columns = BTreeMap::new();
        columns.insert(
            DATE_FIELD.to_string(),
            Column::Date(observations.iter().map(|o| o.date).collect()),
        );
        columns.insert(
            price_field.to_string(),
            Column::Numeric(observations.iter().map(|o| o.price).collect()),
        );
        Self { n_rows: observations.len(), columns }
    }

    /// Add or replace a column. All columns must have the same length.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.n_rows {
            return Err(GsvError::InvalidConfig(format!(
                "Column `{name}` has {} rows, table has {}.",
                column.len(),
                self.n_rows
            )));
        }
        self.n_rows = column.len();
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Pair the `date` column with `price_field`, in table row order.
    ///
    /// No filtering or sorting happens here.
    pub fn series(&self, price_field: &str) -> Result<Vec<PriceObservation>> {
        let Some(Column::Date(dates)) = self.columns.get(DATE_FIELD) else {
            return Err(GsvError::MissingColumn { field: DATE_FIELD.to_string() });
        };
        let Some(Column::Numeric(prices)) = self.columns.get(price_field) else {
            return Err(GsvError::MissingColumn { field: price_field.to_string() });
        };

        Ok(dates
            .iter()
            .zip(prices.iter())
            .map(|(&date, &price)| PriceObservation { date, price })
            .collect())
    }
}
