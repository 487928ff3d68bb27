//! Row ordering by a single column with numeric-aware comparison.
//!
//! Sorting reorders an existing filtered view; it never touches the dataset
//! itself. A column where every non-null cell parses as a finite number is
//! ordered numerically, anything else orders by case-insensitive text.
//! Deciding numeric-vs-text once per column keeps the comparison a total
//! order; a per-pair decision can go cyclic on mixed data (`"2"` < `"10"`
//! numerically but `"10"` < `"1x"` < `"2"` as text), and the standard sorts
//! are allowed to panic when they detect that. Null cells always sort last,
//! in both directions.

use crate::dataset::Dataset;
use crate::value::CellValue;
use crate::view::GridView;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Sort direction for the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Human-readable name for logs and CLI output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// Sort control state: the active column (if any) and a direction.
///
/// No key means natural order: the filtered view passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    key: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active sort column, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// React to a sort request on a column: re-requesting the active column
    /// flips the direction, any other column becomes the new key sorted
    /// ascending.
    pub fn toggle(&mut self, column: &str) {
        if self.key.as_deref() == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(column.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    /// Return to natural order.
    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::Ascending;
    }
}

/// Order a filtered view by the active sort column.
///
/// The sort is stable, so rows that compare equal keep their filtered
/// relative order. Without an active key the view is returned unchanged.
pub fn apply(dataset: &Dataset, view: &GridView, sort: &SortState) -> GridView {
    let Some(key) = sort.key() else {
        return view.clone();
    };

    let mut indices = view.indices().to_vec();
    let numeric = indices.iter().all(|&row| {
        let cell = dataset.cell(row, key);
        cell.is_null() || cell.as_number().is_some()
    });
    indices.sort_by(|&a, &b| {
        compare_cells_with(
            dataset.cell(a, key),
            dataset.cell(b, key),
            sort.direction(),
            numeric,
        )
    });

    debug!(
        "Sorted {} rows by '{}' {} ({})",
        indices.len(),
        key,
        sort.direction().display_name(),
        if numeric { "numeric" } else { "text" }
    );
    GridView::from_indices(indices)
}

/// Compare one pair of cells under a direction, deciding numeric-vs-text
/// from the pair itself. Suitable for standalone comparisons; `apply` makes
/// the numeric decision per column instead so the order stays total.
pub fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    compare_cells_with(a, b, direction, true)
}

/// Null placement is direction-independent: a null cell sorts after any
/// non-null cell whether ascending or descending. Only the non-null
/// comparison reverses with the direction.
fn compare_cells_with(
    a: &CellValue,
    b: &CellValue,
    direction: SortDirection,
    numeric: bool,
) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = match (numeric, a.as_number(), b.as_number()) {
                (true, Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => compare_text(&a.as_text(), &b.as_text()),
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// Case-insensitive text ordering with a raw tiebreak for determinism.
///
/// Lowercase folding gives collation-style results ("Apple" before
/// "banana") without pulling in a full locale table.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{self, FilterState};
    use serde_json::json;

    fn sorted_column(dataset: &Dataset, sort: &SortState, column: &str) -> Vec<CellValue> {
        let view = apply(dataset, &GridView::all(dataset), sort);
        view.indices()
            .iter()
            .map(|&row| dataset.cell(row, column).clone())
            .collect()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    // ==================== comparison tests ====================

    #[test]
    fn test_numeric_strings_compare_numerically() {
        let dataset = Dataset::from_records(vec![
            json!({"a": "3"}),
            json!({"a": "10"}),
            json!({"a": null}),
        ])
        .unwrap();
        let mut sort = SortState::new();
        sort.toggle("a");
        assert_eq!(
            sorted_column(&dataset, &sort, "a"),
            [text("3"), text("10"), CellValue::Null]
        );
    }

    #[test]
    fn test_null_sorts_last_in_both_directions() {
        let dataset = Dataset::from_records(vec![
            json!({"a": null}),
            json!({"a": 5}),
            json!({"a": 2}),
        ])
        .unwrap();
        let mut sort = SortState::new();
        sort.toggle("a");
        assert_eq!(
            sorted_column(&dataset, &sort, "a"),
            [CellValue::Number(2.0), CellValue::Number(5.0), CellValue::Null]
        );
        sort.toggle("a");
        assert_eq!(
            sorted_column(&dataset, &sort, "a"),
            [CellValue::Number(5.0), CellValue::Number(2.0), CellValue::Null]
        );
    }

    #[test]
    fn test_text_compares_by_case_fold() {
        let dataset = Dataset::from_records(vec![
            json!({"a": "banana"}),
            json!({"a": "Apple"}),
        ])
        .unwrap();
        let mut sort = SortState::new();
        sort.toggle("a");
        assert_eq!(
            sorted_column(&dataset, &sort, "a"),
            [text("Apple"), text("banana")]
        );
    }

    #[test]
    fn test_mixed_column_orders_as_text() {
        // "10" would beat "9" numerically, but one unparseable value makes
        // the whole column compare as text.
        let dataset = Dataset::from_records(vec![
            json!({"a": "9"}),
            json!({"a": "10"}),
            json!({"a": "pending"}),
        ])
        .unwrap();
        let mut sort = SortState::new();
        sort.toggle("a");
        assert_eq!(
            sorted_column(&dataset, &sort, "a"),
            [text("10"), text("9"), text("pending")]
        );
    }

    #[test]
    fn test_pairwise_comparison_is_numeric_when_both_parse() {
        assert_eq!(
            compare_cells(&text("9"), &text("10"), SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&text("10"), &text("x"), SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&text("x"), &text("10"), SortDirection::Descending),
            Ordering::Less
        );
    }

    #[test]
    fn test_both_null_equal() {
        assert_eq!(
            compare_cells(&CellValue::Null, &CellValue::Null, SortDirection::Descending),
            Ordering::Equal
        );
    }

    // ==================== state transition tests ====================

    #[test]
    fn test_toggle_same_column_flips_direction() {
        let mut sort = SortState::new();
        sort.toggle("vin");
        assert_eq!(sort.key(), Some("vin"));
        assert_eq!(sort.direction(), SortDirection::Ascending);
        sort.toggle("vin");
        assert_eq!(sort.direction(), SortDirection::Descending);
    }

    #[test]
    fn test_toggle_new_column_resets_to_ascending() {
        let mut sort = SortState::new();
        sort.toggle("vin");
        sort.toggle("vin");
        sort.toggle("branch");
        assert_eq!(sort.key(), Some("branch"));
        assert_eq!(sort.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_direction_round_trip_is_deterministic() {
        let dataset = Dataset::from_records(vec![
            json!({"a": "b"}),
            json!({"a": "c"}),
            json!({"a": "a"}),
        ])
        .unwrap();
        let mut sort = SortState::new();
        sort.toggle("a");
        let first = sorted_column(&dataset, &sort, "a");
        sort.toggle("a");
        sort.toggle("a");
        assert_eq!(sorted_column(&dataset, &sort, "a"), first);
    }

    #[test]
    fn test_clear_restores_filtered_order() {
        let dataset = Dataset::from_records(vec![
            json!({"a": "z", "keep": "yes"}),
            json!({"a": "m", "keep": "no"}),
            json!({"a": "a", "keep": "yes"}),
        ])
        .unwrap();
        let mut filters = FilterState::new();
        filters.set_column_filter("keep", "yes");
        let filtered = filter::apply(&dataset, &filters);

        let mut sort = SortState::new();
        sort.toggle("a");
        let sorted = apply(&dataset, &filtered, &sort);
        assert_eq!(sorted.indices(), [2, 0]);

        sort.clear();
        let natural = apply(&dataset, &filtered, &sort);
        assert_eq!(natural.indices(), filtered.indices());
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let dataset = Dataset::from_records(vec![
            json!({"a": "same", "id": 0}),
            json!({"a": "same", "id": 1}),
            json!({"a": "aaa", "id": 2}),
            json!({"a": "same", "id": 3}),
        ])
        .unwrap();
        let mut sort = SortState::new();
        sort.toggle("a");
        let view = apply(&dataset, &GridView::all(&dataset), &sort);
        assert_eq!(view.indices(), [2, 0, 1, 3]);
    }
}
