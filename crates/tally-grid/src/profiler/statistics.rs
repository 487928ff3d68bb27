//! Per-column summary statistics over a derived view.

use crate::dataset::Dataset;
use crate::profiler::is_numeric_column;
use crate::value::CellValue;
use crate::view::GridView;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Aggregate for one column, computed over the current view.
///
/// Purely derived: recomputed whenever the view changes, never cached
/// across dataset replacements, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnStatistic {
    /// Aggregates for a predominantly numeric column. `min`/`max` are
    /// absent when no value parses, rather than signed infinities.
    Numeric {
        count: usize,
        distinct: usize,
        sum: f64,
        min: Option<f64>,
        max: Option<f64>,
        avg: f64,
    },
    /// Aggregates for a text (or mixed) column.
    Text { count: usize, distinct: usize },
}

impl ColumnStatistic {
    /// Number of non-blank values behind this statistic.
    pub fn count(&self) -> usize {
        match self {
            Self::Numeric { count, .. } | Self::Text { count, .. } => *count,
        }
    }

    /// Number of unique string representations among those values.
    pub fn distinct(&self) -> usize {
        match self {
            Self::Numeric { distinct, .. } | Self::Text { distinct, .. } => *distinct,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric { .. })
    }
}

/// Compute statistics for every dataset column over the given view.
///
/// Blank cells are excluded before anything is counted. `distinct` counts
/// unique canonical text forms, so the number `1` and the string `"1"`
/// collapse together. Numeric columns additionally aggregate the values
/// that parse as finite numbers, silently dropping the stragglers that do
/// not; with nothing parsed, `avg` is 0 and `min`/`max` are `None`.
pub fn compute_column_stats(
    dataset: &Dataset,
    view: &GridView,
) -> HashMap<String, ColumnStatistic> {
    let mut stats = HashMap::with_capacity(dataset.columns().len());

    for column in dataset.columns() {
        let values: Vec<&CellValue> = view
            .indices()
            .iter()
            .map(|&row| dataset.cell(row, column))
            .filter(|cell| !cell.is_blank())
            .collect();

        let distinct = values
            .iter()
            .map(|cell| cell.as_text().into_owned())
            .collect::<HashSet<_>>()
            .len();

        let statistic = if is_numeric_column(dataset, view, column) {
            let numbers: Vec<f64> = values.iter().filter_map(|cell| cell.as_number()).collect();
            let sum: f64 = numbers.iter().sum();
            ColumnStatistic::Numeric {
                count: values.len(),
                distinct,
                sum,
                min: numbers.iter().copied().reduce(f64::min),
                max: numbers.iter().copied().reduce(f64::max),
                avg: if numbers.is_empty() {
                    0.0
                } else {
                    sum / numbers.len() as f64
                },
            }
        } else {
            ColumnStatistic::Text {
                count: values.len(),
                distinct,
            }
        };
        stats.insert(column.clone(), statistic);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn stats_for(records: Vec<serde_json::Value>) -> HashMap<String, ColumnStatistic> {
        let dataset = Dataset::from_records(records).unwrap();
        let view = GridView::all(&dataset);
        compute_column_stats(&dataset, &view)
    }

    // ==================== numeric column tests ====================

    #[test]
    fn test_numeric_aggregates() {
        let stats = stats_for(vec![
            json!({"n": 1}),
            json!({"n": 2}),
            json!({"n": 3}),
            json!({"n": 4}),
        ]);
        assert_eq!(
            stats["n"],
            ColumnStatistic::Numeric {
                count: 4,
                distinct: 4,
                sum: 10.0,
                min: Some(1.0),
                max: Some(4.0),
                avg: 2.5,
            }
        );
    }

    #[test]
    fn test_numeric_ignores_blanks() {
        let stats = stats_for(vec![
            json!({"n": "5"}),
            json!({"n": null}),
            json!({"n": ""}),
            json!({"n": "-"}),
            json!({"n": "15"}),
        ]);
        assert_eq!(
            stats["n"],
            ColumnStatistic::Numeric {
                count: 2,
                distinct: 2,
                sum: 20.0,
                min: Some(5.0),
                max: Some(15.0),
                avg: 10.0,
            }
        );
    }

    #[test]
    fn test_distinct_collapses_number_and_text_forms() {
        let stats = stats_for(vec![json!({"n": 7}), json!({"n": "7"})]);
        assert_eq!(stats["n"].count(), 2);
        assert_eq!(stats["n"].distinct(), 1);
    }

    // ==================== text column tests ====================

    #[test]
    fn test_text_column() {
        let stats = stats_for(vec![
            json!({"branch": "Dallas"}),
            json!({"branch": "Austin"}),
            json!({"branch": "Dallas"}),
            json!({"branch": null}),
        ]);
        assert_eq!(
            stats["branch"],
            ColumnStatistic::Text {
                count: 3,
                distinct: 2,
            }
        );
    }

    #[test]
    fn test_all_blank_column_is_empty_text() {
        let stats = stats_for(vec![json!({"c": null}), json!({"c": ""})]);
        assert_eq!(
            stats["c"],
            ColumnStatistic::Text {
                count: 0,
                distinct: 0,
            }
        );
    }

    #[test]
    fn test_mostly_numeric_keeps_unparsed_in_count_only() {
        // 5 of 6 parse, so the column profiles numeric; the straggler still
        // shows up in count and distinct but not in the aggregates.
        let stats = stats_for(vec![
            json!({"n": "1"}),
            json!({"n": "2"}),
            json!({"n": "3"}),
            json!({"n": "4"}),
            json!({"n": "5"}),
            json!({"n": "oops"}),
        ]);
        assert_eq!(
            stats["n"],
            ColumnStatistic::Numeric {
                count: 6,
                distinct: 6,
                sum: 15.0,
                min: Some(1.0),
                max: Some(5.0),
                avg: 3.0,
            }
        );
    }

    // ==================== view interaction tests ====================

    #[test]
    fn test_stats_follow_the_view() {
        let dataset = Dataset::from_records(vec![
            json!({"n": 10}),
            json!({"n": 20}),
            json!({"n": 30}),
        ])
        .unwrap();
        let narrowed = GridView::from_indices(vec![0, 2]);
        let stats = compute_column_stats(&dataset, &narrowed);
        assert_eq!(
            stats["n"],
            ColumnStatistic::Numeric {
                count: 2,
                distinct: 2,
                sum: 40.0,
                min: Some(10.0),
                max: Some(30.0),
                avg: 20.0,
            }
        );
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let stat = ColumnStatistic::Text {
            count: 3,
            distinct: 2,
        };
        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["count"], 3);
    }
}
