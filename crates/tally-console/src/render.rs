//! Terminal rendering for loaded views.
//!
//! All user-facing output goes through `println!` on purpose: unlike log
//! lines, report output must stay visible regardless of log level. The
//! formatting helpers are pure so the table and statistics layouts can be
//! asserted in tests.

use crate::session::{LoadedView, ReportSummary};
use serde_json::Value;
use tally_grid::{CellValue, ColumnStatistic, Dataset, GridView};

/// Output format for the view body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Column width before a cell is truncated with an ellipsis.
const CELL_WIDTH: usize = 20;

/// Truncate a string to max length with ellipsis.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Display form of one cell: `-` for null, compact JSON for nested values.
pub fn cell_display(cell: &CellValue) -> String {
    if cell.is_null() {
        "-".to_string()
    } else {
        cell.as_text().into_owned()
    }
}

/// Lay out the visible rows as terminal lines.
///
/// The first line reports visible-of-total counts; an empty view renders a
/// "no records" notice instead of a header. `limit` caps the printed rows,
/// with a trailing "... and N more" marker when rows are cut off.
pub fn table_lines(dataset: &Dataset, view: &GridView, limit: Option<usize>) -> Vec<String> {
    let mut lines = vec![format!(
        "Showing {} of {} records",
        view.len(),
        dataset.len()
    )];

    if view.is_empty() {
        lines.push("No records match the current filters".to_string());
        return lines;
    }

    let columns = dataset.columns();
    let header: Vec<String> = columns
        .iter()
        .map(|c| format!("{:<width$}", truncate_str(c, CELL_WIDTH - 1), width = CELL_WIDTH))
        .collect();
    lines.push(header.join(" ").trim_end().to_string());
    lines.push("-".repeat((CELL_WIDTH + 1) * columns.len().max(1) - 1));

    let shown = limit.unwrap_or(usize::MAX).min(view.len());
    for &row in &view.indices()[..shown] {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                let text = cell_display(dataset.cell(row, column));
                format!(
                    "{:<width$}",
                    truncate_str(&text, CELL_WIDTH - 1),
                    width = CELL_WIDTH
                )
            })
            .collect();
        lines.push(cells.join(" ").trim_end().to_string());
    }

    if shown < view.len() {
        lines.push(format!("... and {} more", view.len() - shown));
    }
    lines
}

/// Lay out per-column statistics, in dataset column order.
pub fn statistics_lines(
    dataset: &Dataset,
    stats: &std::collections::HashMap<String, ColumnStatistic>,
) -> Vec<String> {
    let mut lines = vec!["COLUMN STATISTICS".to_string(), "-".repeat(40)];
    for column in dataset.columns() {
        let Some(stat) = stats.get(column) else {
            continue;
        };
        match stat {
            ColumnStatistic::Numeric {
                count,
                distinct,
                sum,
                min,
                max,
                avg,
            } => {
                let bound = |b: &Option<f64>| match b {
                    Some(v) => tally_grid::format_number(*v),
                    None => "-".to_string(),
                };
                lines.push(format!(
                    "  {}: count {}, distinct {}, sum {}, avg {:.2}, min {}, max {}",
                    column,
                    count,
                    distinct,
                    tally_grid::format_number(*sum),
                    avg,
                    bound(min),
                    bound(max),
                ));
            }
            ColumnStatistic::Text { count, distinct } => {
                lines.push(format!("  {}: count {}, distinct {}", column, count, distinct));
            }
        }
    }
    lines
}

/// Lay out the summary cards above a view.
pub fn summary_lines(view: &LoadedView) -> Vec<String> {
    let mut lines = vec![view.title.clone(), "=".repeat(view.title.len())];
    match &view.summary {
        ReportSummary::Inventory {
            total_inventory,
            total_matched,
            match_rate,
        } => {
            lines.push(format!("  Total physical inventory: {}", total_inventory));
            lines.push(format!("  Matched to trailers:      {}", total_matched));
            lines.push(format!("  Match rate:               {}", match_rate));
        }
        ReportSummary::Comparison(summary) => {
            lines.push(format!("  Left records:  {}", summary.total_left_records));
            lines.push(format!("  Right records: {}", summary.total_right_records));
            lines.push(format!("  Matched:       {}", summary.total_matched));
            lines.push(format!("  Match rate:    {}", summary.match_rate_display()));
        }
    }
    lines
}

/// The visible rows as a JSON array, for `--format json`.
pub fn view_to_json(dataset: &Dataset, view: &GridView) -> Value {
    let rows: Vec<Value> = view
        .indices()
        .iter()
        .map(|&row| {
            let mut object = serde_json::Map::new();
            for column in dataset.columns() {
                let cell = dataset.cell(row, column);
                object.insert(column.clone(), serde_json::to_value(cell).unwrap_or(Value::Null));
            }
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}

/// Print a loaded view: summary cards, then the body in the chosen format.
pub fn print_view(view: &LoadedView, format: OutputFormat, limit: Option<usize>, stats: bool) {
    let derived = view.grid.derive_view(&view.dataset);

    match format {
        OutputFormat::Json => {
            let payload = view_to_json(&view.dataset, &derived);
            println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
        }
        OutputFormat::Table => {
            for line in summary_lines(view) {
                println!("{}", line);
            }
            println!();
            for line in table_lines(&view.dataset, &derived, limit) {
                println!("{}", line);
            }
            if stats {
                println!();
                for line in statistics_lines(&view.dataset, &view.grid.statistics(&view.dataset)) {
                    println!("{}", line);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
