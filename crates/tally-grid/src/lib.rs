//! Data Grid Core Library
//!
//! A filterable, sortable, statistics-producing grid over dynamic tabular
//! records, built for reporting views whose row shape is only known at
//! runtime.
//!
//! # Overview
//!
//! This library provides the derivation pipeline behind one table view:
//!
//! - **Dynamic rows**: records are JSON objects; every cell is a tagged
//!   scalar (null, number, text, or nested structure)
//! - **Filtering**: case-insensitive substring filters per column plus one
//!   global filter across all columns
//! - **Sorting**: numeric-aware single-column ordering with nulls always
//!   last
//! - **Column profiling**: numeric detection and per-column
//!   count/distinct/sum/min/max/avg statistics over the visible view
//! - **CSV export**: a date-stamped, JSON-string-quoted dump of exactly
//!   what the view shows
//!
//! Every stage derives purely from the dataset plus control state. The
//! dataset itself is immutable; new data replaces it wholesale.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tally_grid::{Dataset, GridState};
//!
//! // Ingest the rows a backend handed us
//! let dataset = Dataset::from_records(records)?;
//!
//! // Drive the view like a user would
//! let mut grid = GridState::new();
//! grid.set_column_filter("branch", "dallas");
//! grid.set_global_filter("active");
//! grid.toggle_sort("created_date");
//!
//! let view = grid.derive_view(&dataset);
//! println!("Showing {} of {} records", view.len(), dataset.len());
//!
//! // Statistics for the visible rows only
//! for (column, stat) in grid.statistics(&dataset) {
//!     println!("{column}: {} values, {} distinct", stat.count(), stat.distinct());
//! }
//!
//! // Export what is on screen
//! if let Some(csv) = grid.export_csv(&dataset) {
//!     std::fs::write(tally_grid::export_filename("branch-report"), csv)?;
//! }
//! ```

pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod profiler;
pub mod sort;
pub mod value;
pub mod view;

// Re-exports for convenient access
pub use dataset::{Dataset, Row};
pub use error::{GridError, Result as GridResult, ResultExt};
pub use export::{export_filename, stamped_filename, view_to_csv};
pub use filter::FilterState;
pub use profiler::{
    ColumnStatistic, NUMERIC_RATIO_THRESHOLD, compute_column_stats, is_numeric_column,
};
pub use sort::{SortDirection, SortState, compare_cells};
pub use value::{CellValue, PLACEHOLDER, format_number, parse_number};
pub use view::{GridState, GridView};
