//! Reporting Console Library
//!
//! An access-gated console for comparing datasets across two backend
//! entities (or the fixed physical-inventory-vs-trailer report), built on
//! the [`tally_grid`] view pipeline.
//!
//! # Overview
//!
//! This library provides the page-level layer around the grid core:
//!
//! - **Access gate**: the console is restricted to one administrator
//!   account checked against the remote identity service
//! - **Backend abstraction**: identity, entity store, and comparison
//!   engine behind one [`Backend`] trait, with an HTTP implementation
//!   behind the `http` feature (enabled by default)
//! - **Field discovery**: typed-schema extraction with a sample-record
//!   fallback chain that always yields at least the built-in fields
//! - **Comparison workflow**: two-sided entity/join-field/display-field
//!   selection, validated before the engine runs
//! - **Report session**: generation-guarded report slots (last request
//!   wins) each carrying its own dataset and grid state
//! - **Rendering**: terminal tables, column statistics, summary cards,
//!   and a JSON output mode
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tally_console::{HttpBackend, ReportSession, Side};
//!
//! let backend = HttpBackend::new(api_key, app_id)?;
//! let session = ReportSession::new();
//! session.authorize(&backend)?;
//!
//! session.set_entity(Side::Left, "Trailer")?;
//! session.set_entity(Side::Right, "ScanLog")?;
//! session.set_join_field(Side::Left, "trailer_number")?;
//! session.set_join_field(Side::Right, "scanned_number")?;
//! session.toggle_field(Side::Left, "status");
//! session.run_comparison(&backend)?;
//!
//! if let Some(view) = session.comparison().as_ref() {
//!     println!("{} rows matched", view.dataset.len());
//! }
//! ```

pub mod access;
pub mod backend;
pub mod comparison;
pub mod error;
pub mod render;
pub mod schema;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use access::{AUTHORIZED_EMAIL, authorize};
pub use backend::Backend;
#[cfg(feature = "http")]
pub use backend::{HttpBackend, HttpConfig, HttpConfigBuilder};
pub use comparison::{SelectionState, Side, SideSelection};
pub use error::{ConsoleError, Result, ResultExt};
pub use render::OutputFormat;
pub use schema::{
    BUILT_IN_FIELDS, DiscoveredFields, ENTITIES, FieldSource, discover_fields,
    extract_schema_fields,
};
pub use session::{LoadedView, ReportSession, ReportSummary};
pub use types::{
    ComparisonOutcome, ComparisonRequest, ComparisonSummary, FieldRef, InventoryReport,
    UserProfile,
};
