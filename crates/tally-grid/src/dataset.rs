//! Tabular dataset backing one grid view.
//!
//! A [`Dataset`] is a fixed column list plus an ordered sequence of rows.
//! The column set and order come from the first ingested record and never
//! change for the dataset's lifetime; later records never introduce new
//! columns. Datasets are replaced wholesale when new data loads, never
//! mutated in place, so every derived view (filter, sort, statistics,
//! export) can borrow the dataset read-only.

use crate::error::{GridError, Result};
use crate::value::CellValue;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

static NULL_CELL: CellValue = CellValue::Null;

/// One record: a mapping from column name to cell value.
///
/// A column absent from the underlying record reads as [`CellValue::Null`].
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: HashMap<String, CellValue>,
}

impl Row {
    /// Look up a cell, treating absent columns as null.
    pub fn cell(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&NULL_CELL)
    }

    /// Look up a cell without the null fallback.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().collect(),
        }
    }
}

/// The full row collection backing one table view.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// An empty dataset (no columns, no rows).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset from a sequence of JSON records.
    ///
    /// Column names and order are taken from the first record's keys. Every
    /// record must be a JSON object; anything else fails with
    /// [`GridError::InvalidRecord`]. An empty sequence yields an empty
    /// dataset.
    pub fn from_records(records: Vec<JsonValue>) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<Row> = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let JsonValue::Object(map) = record else {
                return Err(GridError::InvalidRecord { index });
            };
            if index == 0 {
                columns = map.keys().cloned().collect();
            }
            rows.push(
                map.into_iter()
                    .map(|(key, value)| (key, CellValue::from(value)))
                    .collect(),
            );
        }

        debug!("Ingested {} rows across {} columns", rows.len(), columns.len());
        Ok(Self { columns, rows })
    }

    /// Build a dataset from a JSON array in text form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<JsonValue> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Column names in their original order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at a row index and column name. Out-of-range rows and unknown
    /// columns read as null, mirroring the absent-key behavior of the
    /// underlying records.
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        match self.rows.get(row) {
            Some(r) => r.cell(column),
            None => &NULL_CELL,
        }
    }
}
