//! Report session: everything the console holds between commands.
//!
//! A [`ReportSession`] owns the authorized identity, the comparison
//! selection, and one slot per loadable report (the fixed inventory report
//! and the two-entity comparison). Each loaded slot carries its own dataset
//! and [`GridState`], so filters and sort reset whenever new data replaces
//! the old.
//!
//! Loads follow a last-request-wins policy: beginning a load takes a ticket
//! from the slot's generation counter, and the result installs only if no
//! newer load has begun since. A stale response is logged and dropped, never
//! applied over fresher state. Failed loads leave the slot untouched.

use crate::backend::Backend;
use crate::comparison::{SelectionState, Side};
use crate::error::{ConsoleError, Result};
use crate::schema::{self, DiscoveredFields};
use crate::types::{ComparisonSummary, UserProfile, format_match_rate};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use static_assertions::assert_impl_all;
use std::sync::atomic::{AtomicU64, Ordering};
use tally_grid::{Dataset, GridState};
use tracing::{error, info, warn};

/// Display title and export filename base for the inventory report.
const INVENTORY_TITLE: &str = "Physical Inventory Comparison";
const INVENTORY_EXPORT_BASE: &str = "physical-inventory-comparison";

/// Display title and export filename base for entity comparisons.
const COMPARISON_TITLE: &str = "Entity Comparison";
const COMPARISON_EXPORT_BASE: &str = "entity-comparison";

/// Aggregate counters shown above a loaded view.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSummary {
    /// Totals of the fixed physical-inventory-vs-trailer report. The rate
    /// is computed console-side since the wire carries only the counts.
    Inventory {
        total_inventory: u64,
        total_matched: u64,
        match_rate: String,
    },
    /// Summary returned by the comparison engine, rate preformatted.
    Comparison(ComparisonSummary),
}

/// One loaded report: its dataset plus the grid state driving the view.
#[derive(Debug, Clone)]
pub struct LoadedView {
    pub title: String,
    pub export_base: String,
    pub dataset: Dataset,
    pub grid: GridState,
    pub summary: ReportSummary,
}

impl LoadedView {
    fn new(
        title: &str,
        export_base: &str,
        dataset: Dataset,
        summary: ReportSummary,
    ) -> Self {
        Self {
            title: title.to_string(),
            export_base: export_base.to_string(),
            dataset,
            // Fresh state: filters and sort never survive a data replacement.
            grid: GridState::new(),
            summary,
        }
    }
}

/// One loadable report slot with a generation counter guarding installs.
#[derive(Debug, Default)]
struct ReportSlot {
    generation: AtomicU64,
    view: RwLock<Option<LoadedView>>,
}

impl ReportSlot {
    /// Take a ticket for a new load, superseding any pending one.
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a finished load unless a newer one has begun since.
    fn install(&self, ticket: u64, view: LoadedView) -> bool {
        if self.generation.load(Ordering::SeqCst) != ticket {
            warn!(
                "Discarding stale {} response (superseded load)",
                view.title
            );
            return false;
        }
        *self.view.write() = Some(view);
        true
    }

    /// Drop the loaded view and invalidate any pending load.
    fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.view.write() = None;
    }
}

/// Session state for one console run.
///
/// Shared state sits behind `parking_lot` locks so a host may drive the
/// session from multiple threads; the reference CLI is single-threaded.
#[derive(Debug, Default)]
pub struct ReportSession {
    profile: RwLock<Option<UserProfile>>,
    selection: RwLock<SelectionState>,
    inventory: ReportSlot,
    comparison: ReportSlot,
}

assert_impl_all!(ReportSession: Send, Sync);

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Run the access gate and remember the authorized identity.
    pub fn authorize(&self, backend: &dyn Backend) -> Result<UserProfile> {
        let profile = crate::access::authorize(backend)?;
        *self.profile.write() = Some(profile.clone());
        Ok(profile)
    }

    /// The authorized identity, if the gate has passed.
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().clone()
    }

    // -------------------------------------------------------------------------
    // Inventory report
    // -------------------------------------------------------------------------

    /// Load the fixed physical-inventory-vs-trailer report.
    ///
    /// On failure the previous view, if any, stays in place.
    pub fn load_inventory_report(&self, backend: &dyn Backend) -> Result<()> {
        let ticket = self.inventory.begin();
        let report = backend.fetch_inventory_report().map_err(|e| {
            error!("Inventory report load failed: {}", e);
            ConsoleError::BackendCall(e.to_string())
        })?;

        let summary = ReportSummary::Inventory {
            total_inventory: report.total_inventory,
            total_matched: report.total_matched,
            match_rate: format_match_rate(report.total_matched, report.total_inventory),
        };
        let dataset = Dataset::from_records(report.data)?;
        info!(
            "Inventory report loaded: {} rows, {} matched of {}",
            dataset.len(),
            report.total_matched,
            report.total_inventory
        );

        self.inventory.install(
            ticket,
            LoadedView::new(INVENTORY_TITLE, INVENTORY_EXPORT_BASE, dataset, summary),
        );
        Ok(())
    }

    pub fn inventory(&self) -> RwLockReadGuard<'_, Option<LoadedView>> {
        self.inventory.view.read()
    }

    pub fn inventory_mut(&self) -> RwLockWriteGuard<'_, Option<LoadedView>> {
        self.inventory.view.write()
    }

    // -------------------------------------------------------------------------
    // Comparison selection
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> RwLockReadGuard<'_, SelectionState> {
        self.selection.read()
    }

    /// Choose the entity for one side of the comparison.
    ///
    /// A changed entity invalidates any loaded comparison, which was built
    /// against the old selection.
    pub fn set_entity(&self, side: Side, entity: &str) -> Result<()> {
        let changed = self.selection.write().set_entity(side, entity)?;
        if changed {
            self.comparison.clear();
        }
        Ok(())
    }

    pub fn set_join_field(&self, side: Side, field: &str) -> Result<()> {
        self.selection.write().set_join_field(side, field)
    }

    pub fn toggle_field(&self, side: Side, field: &str) {
        self.selection.write().toggle_field(side, field);
    }

    pub fn select_all_fields(&self, side: Side) {
        self.selection.write().select_all_fields(side);
    }

    pub fn deselect_all_fields(&self, side: Side) {
        self.selection.write().deselect_all_fields(side);
    }

    /// Run field discovery for one side's entity and record the result.
    ///
    /// Discovery never fails; at worst it reports built-in fields only.
    pub fn refresh_fields(&self, backend: &dyn Backend, side: Side) -> Result<DiscoveredFields> {
        let entity = self
            .selection
            .read()
            .side(side)
            .entity
            .clone()
            .ok_or_else(|| {
                ConsoleError::Validation(format!(
                    "Select the {} entity before discovering its fields",
                    side.label()
                ))
            })?;

        let discovered = schema::discover_fields(backend, &entity);
        self.selection
            .write()
            .set_available_fields(side, discovered.fields.clone());
        Ok(discovered)
    }

    // -------------------------------------------------------------------------
    // Comparison report
    // -------------------------------------------------------------------------

    /// Validate the selection, run the remote comparison, and install the
    /// result. On any failure the previous comparison, if any, survives.
    pub fn run_comparison(&self, backend: &dyn Backend) -> Result<()> {
        let request = self.selection.read().build_request()?;

        let ticket = self.comparison.begin();
        let outcome = backend.run_comparison(&request).map_err(|e| {
            error!(
                "Comparison {} vs {} failed: {}",
                request.left_entity, request.right_entity, e
            );
            ConsoleError::BackendCall(e.to_string())
        })?;

        let summary = ReportSummary::Comparison(outcome.summary);
        let dataset = Dataset::from_records(outcome.data)?;
        info!(
            "Comparison {} vs {} loaded: {} rows",
            request.left_entity,
            request.right_entity,
            dataset.len()
        );

        self.comparison.install(
            ticket,
            LoadedView::new(COMPARISON_TITLE, COMPARISON_EXPORT_BASE, dataset, summary),
        );
        Ok(())
    }

    pub fn comparison(&self) -> RwLockReadGuard<'_, Option<LoadedView>> {
        self.comparison.view.read()
    }

    pub fn comparison_mut(&self) -> RwLockWriteGuard<'_, Option<LoadedView>> {
        self.comparison.view.write()
    }
}

// ============================================================================
// Tests
// ============================================================================
