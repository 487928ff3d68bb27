//! Column profiling over a derived view.
//!
//! This module classifies columns as numeric or text and computes the
//! per-column aggregates shown in the statistics panel. Profiling always
//! runs against the current filtered+sorted view, never the raw dataset,
//! so the numbers track what the user is actually looking at.

mod numeric;
mod statistics;

pub use numeric::{NUMERIC_RATIO_THRESHOLD, is_numeric_column};
pub use statistics::{ColumnStatistic, compute_column_stats};
