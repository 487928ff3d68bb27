//! CSV export of the current view.
//!
//! The output format follows the reporting page this grid feeds: the header
//! row is the raw column names joined by commas, and every data cell is the
//! JSON string encoding of the cell's text form. JSON quoting escapes
//! embedded commas, quotes, and newlines, but this is not RFC 4180; a
//! consumer expecting strict CSV quoting may need adaptation.

use crate::dataset::Dataset;
use crate::value::CellValue;
use crate::view::GridView;
use chrono::{NaiveDate, Utc};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Render the view as CSV text.
///
/// Returns `None` for an empty dataset so callers cannot produce a
/// header-only file for data that was never there. A non-empty dataset
/// whose view filtered every row away still exports its header. Null cells
/// render as `""`. Lines are joined with `\n` and there is no trailing
/// newline.
pub fn view_to_csv(dataset: &Dataset, view: &GridView) -> Option<String> {
    if dataset.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(view.len() + 1);
    lines.push(dataset.columns().join(","));
    for &row in view.indices() {
        let cells: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| encode_cell(dataset.cell(row, column)))
            .collect();
        lines.push(cells.join(","));
    }

    debug!("Rendered CSV export: {} data rows", view.len());
    Some(lines.join("\n"))
}

/// JSON-string-quote one cell.
fn encode_cell(cell: &CellValue) -> String {
    let text = if cell.is_null() {
        String::new()
    } else {
        cell.as_text().into_owned()
    };
    JsonValue::String(text).to_string()
}

/// Export filename for a given date: `{base}-{YYYY-MM-DD}.csv`.
pub fn stamped_filename(base: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", base, date.format("%Y-%m-%d"))
}

/// Export filename stamped with today's UTC date.
pub fn export_filename(base: &str) -> String {
    stamped_filename(base, Utc::now().date_naive())
}
