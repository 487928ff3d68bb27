//! Derived views and the grid control state that produces them.
//!
//! A [`GridView`] is an ordered set of row indices into a [`Dataset`]:
//! filtering narrows it, sorting reorders it, and statistics and export
//! both consume it. [`GridState`] owns the filter and sort state and
//! re-derives the view from scratch on demand; there is no incremental
//! update and no caching, every derivation is a pure function of the
//! dataset plus the current state.

use crate::dataset::Dataset;
use crate::export;
use crate::filter::{self, FilterState};
use crate::profiler::{self, ColumnStatistic};
use crate::sort::{self, SortState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An ordered selection of dataset rows: the dataset after filter+sort,
/// driving both display and export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridView {
    indices: Vec<usize>,
}

impl GridView {
    /// A view over every row in natural order.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            indices: (0..dataset.len()).collect(),
        }
    }

    /// A view over an explicit index selection.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Row indices into the parent dataset, in view order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the view shows no rows.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Control state for one table: column filters, global filter, and sort.
///
/// The grid borrows its dataset read-only and owns only this state plus
/// whatever views it derives. Replacing the dataset means starting from a
/// fresh `GridState`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    filters: FilterState,
    sort: SortState,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Set the filter substring for one column. Empty means no filter.
    pub fn set_column_filter(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.filters.set_column_filter(column, value);
    }

    /// Set the cross-column filter substring. Empty means no filter.
    pub fn set_global_filter(&mut self, value: impl Into<String>) {
        self.filters.set_global_filter(value);
    }

    /// Drop all filters, keeping the sort untouched.
    pub fn clear_all_filters(&mut self) {
        self.filters.clear_all();
    }

    /// Number of filters currently narrowing the view.
    pub fn active_filter_count(&self) -> usize {
        self.filters.active_filter_count()
    }

    /// Request a sort on a column: the active column flips direction, a new
    /// column sorts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort.toggle(column);
    }

    /// Derive the visible view: filter, then sort.
    pub fn derive_view(&self, dataset: &Dataset) -> GridView {
        let filtered = filter::apply(dataset, &self.filters);
        sort::apply(dataset, &filtered, &self.sort)
    }

    /// Per-column statistics over the current derived view.
    pub fn statistics(&self, dataset: &Dataset) -> HashMap<String, ColumnStatistic> {
        profiler::compute_column_stats(dataset, &self.derive_view(dataset))
    }

    /// CSV text for the current derived view, or `None` when the dataset is
    /// empty.
    pub fn export_csv(&self, dataset: &Dataset) -> Option<String> {
        export::view_to_csv(dataset, &self.derive_view(dataset))
    }
}
