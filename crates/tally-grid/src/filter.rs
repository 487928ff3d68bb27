//! Row filtering: per-column substring filters plus a global filter.
//!
//! Filtering derives an index view over the dataset; source rows are never
//! copied or reordered here. Matching is case-insensitive substring
//! containment against each cell's canonical text form. A row whose cell is
//! null never matches a column filter, and null cells never satisfy the
//! global filter either.

use crate::dataset::Dataset;
use crate::view::GridView;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Filter control state: one optional substring per column plus one global
/// substring applied across all columns. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    column_filters: HashMap<String, String>,
    global_filter: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) the filter substring for one column.
    pub fn set_column_filter(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.column_filters.insert(column.into(), value.into());
    }

    /// Current filter for a column, if any was set.
    pub fn column_filter(&self, column: &str) -> Option<&str> {
        self.column_filters.get(column).map(String::as_str)
    }

    /// Set the global cross-column filter substring.
    pub fn set_global_filter(&mut self, value: impl Into<String>) {
        self.global_filter = value.into();
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    /// Drop every column filter and the global filter.
    pub fn clear_all(&mut self) {
        self.column_filters.clear();
        self.global_filter.clear();
    }

    /// Number of filters currently doing anything: non-empty column filters
    /// plus the global filter if non-empty.
    pub fn active_filter_count(&self) -> usize {
        let columns = self
            .column_filters
            .values()
            .filter(|value| !value.is_empty())
            .count();
        columns + usize::from(!self.global_filter.is_empty())
    }

    fn active_column_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.column_filters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }
}

/// Apply column filters and the global filter to a dataset, producing a
/// filtered view that preserves the original row order.
///
/// Column filters AND together; the global filter requires at least one
/// column to match (OR across columns) and ANDs with the column filters.
pub fn apply(dataset: &Dataset, filters: &FilterState) -> GridView {
    let mut indices: Vec<usize> = (0..dataset.len()).collect();

    for (column, value) in filters.active_column_filters() {
        let needle = value.to_lowercase();
        indices.retain(|&row| {
            let cell = dataset.cell(row, column);
            !cell.is_null() && cell.as_text().to_lowercase().contains(&needle)
        });
    }

    if !filters.global_filter.is_empty() {
        let needle = filters.global_filter.to_lowercase();
        indices.retain(|&row| {
            dataset.columns().iter().any(|column| {
                let cell = dataset.cell(row, column);
                !cell.is_null() && cell.as_text().to_lowercase().contains(&needle)
            })
        });
    }

    debug!(
        "Filtered {} rows down to {} ({} active filters)",
        dataset.len(),
        indices.len(),
        filters.active_filter_count()
    );
    GridView::from_indices(indices)
}
