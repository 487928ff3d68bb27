//! Numeric column detection.

use crate::dataset::Dataset;
use crate::view::GridView;

/// Fraction of non-blank values that must parse as finite numbers for a
/// column to be treated as numeric. The comparison is strict, so exactly
/// 80% is still text.
pub const NUMERIC_RATIO_THRESHOLD: f64 = 0.8;

/// Decide whether a column in the given view is predominantly numeric.
///
/// Blank cells (null, `""`, `"-"`) are ignored entirely. A column with no
/// non-blank values is not numeric: all-empty columns default to text
/// treatment. Otherwise the column is numeric iff strictly more than 80% of
/// its non-blank values parse as finite numbers. Values that fail to parse
/// are never an error; they just count against the ratio.
pub fn is_numeric_column(dataset: &Dataset, view: &GridView, column: &str) -> bool {
    let mut numeric = 0usize;
    let mut total = 0usize;

    for &row in view.indices() {
        let cell = dataset.cell(row, column);
        if cell.is_blank() {
            continue;
        }
        total += 1;
        if cell.as_number().is_some() {
            numeric += 1;
        }
    }

    total > 0 && (numeric as f64 / total as f64) > NUMERIC_RATIO_THRESHOLD
}
