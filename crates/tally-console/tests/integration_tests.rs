//! Integration tests for the reporting console.
//!
//! These tests drive the console the way the CLI does — access gate,
//! field discovery, selection, load, view, export — against an in-memory
//! [`MockBackend`] standing in for the remote services.

use anyhow::anyhow;
use serde_json::{Value, json};
use tally_console::{
    Backend, ComparisonOutcome, ComparisonRequest, ComparisonSummary, FieldSource,
    InventoryReport, ReportSession, ReportSummary, Side, UserProfile, discover_fields, render,
};
use tally_grid::stamped_filename;

// ============================================================================
// Mock Backend
// ============================================================================

/// In-memory stand-in for the identity, entity-store and comparison
/// services.
struct MockBackend {
    email: &'static str,
    schemas: Vec<(&'static str, Value)>,
    samples: Vec<(&'static str, Value)>,
}

impl MockBackend {
    fn new() -> Self {
        Self {
            email: "tom@tmmit.com",
            schemas: vec![(
                "Trailer",
                json!({"properties": {"trailer_number": {}, "branch": {}, "status": {}}}),
            )],
            samples: vec![(
                "ScanLog",
                json!({"data": [{"scanned_number": "T-1", "scanned_at": "2026-08-01"}]}),
            )],
        }
    }

    fn lookup(table: &[(&str, Value)], entity: &str) -> anyhow::Result<Value> {
        table
            .iter()
            .find(|(name, _)| *name == entity)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| anyhow!("404 for {}", entity))
    }
}

impl Backend for MockBackend {
    fn current_user(&self) -> anyhow::Result<UserProfile> {
        Ok(UserProfile {
            email: self.email.to_string(),
            full_name: Some("Tom".to_string()),
        })
    }

    fn fetch_inventory_report(&self) -> anyhow::Result<InventoryReport> {
        Ok(InventoryReport {
            total_inventory: 4,
            total_matched: 3,
            data: vec![
                json!({"trailer_number": "T-100", "branch": "Dallas", "matched": "true", "days_open": "12"}),
                json!({"trailer_number": "T-101", "branch": "Austin", "matched": "true", "days_open": "3"}),
                json!({"trailer_number": "T-102", "branch": "Dallas", "matched": "false", "days_open": null}),
                json!({"trailer_number": "T-103", "branch": "Houston", "matched": "true", "days_open": "7"}),
            ],
        })
    }

    fn fetch_entity_schema(&self, entity: &str) -> anyhow::Result<Value> {
        Self::lookup(&self.schemas, entity)
    }

    fn fetch_sample_records(&self, entity: &str, _limit: Option<usize>) -> anyhow::Result<Value> {
        Self::lookup(&self.samples, entity)
    }

    fn run_comparison(&self, request: &ComparisonRequest) -> anyhow::Result<ComparisonOutcome> {
        // Echo the selection back so tests can see the request shape.
        let row = json!({
            "left": request.left_entity,
            "right": request.right_entity,
            "joined_on": request.join_field,
        });
        Ok(ComparisonOutcome {
            summary: ComparisonSummary {
                total_left_records: 10,
                total_right_records: 8,
                total_matched: 6,
                match_rate: Some("60.0%".to_string()),
            },
            data: vec![row],
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Inventory Workflow
// ============================================================================

#[test]
fn test_inventory_workflow_end_to_end() {
    let backend = MockBackend::new();
    let session = ReportSession::new();
    session.authorize(&backend).unwrap();
    session.load_inventory_report(&backend).unwrap();

    let mut guard = session.inventory_mut();
    let view = guard.as_mut().unwrap();
    assert_eq!(
        view.summary,
        ReportSummary::Inventory {
            total_inventory: 4,
            total_matched: 3,
            match_rate: "75.0%".to_string(),
        }
    );

    // Filter to Dallas, matched only, sorted by days open.
    view.grid.set_column_filter("branch", "dallas");
    view.grid.set_column_filter("matched", "true");
    view.grid.toggle_sort("days_open");

    let derived = view.grid.derive_view(&view.dataset);
    assert_eq!(derived.len(), 1);
    assert_eq!(
        view.dataset.cell(derived.indices()[0], "trailer_number").as_text(),
        "T-100"
    );

    // Export reflects exactly the filtered view.
    let csv = view.grid.export_csv(&view.dataset).unwrap();
    assert_eq!(
        csv,
        "trailer_number,branch,matched,days_open\n\"T-100\",\"Dallas\",\"true\",\"12\""
    );
    assert_eq!(
        stamped_filename(&view.export_base, chrono::NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()),
        "physical-inventory-comparison-2026-08-23.csv"
    );
}

#[test]
fn test_inventory_statistics_over_filtered_view() {
    let backend = MockBackend::new();
    let session = ReportSession::new();
    session.load_inventory_report(&backend).unwrap();

    let mut guard = session.inventory_mut();
    let view = guard.as_mut().unwrap();
    view.grid.set_column_filter("matched", "true");

    let stats = view.grid.statistics(&view.dataset);
    // Three matched rows, all with numeric days_open.
    assert_eq!(stats["days_open"].count(), 3);
    assert!(stats["days_open"].is_numeric());
    assert_eq!(stats["branch"].distinct(), 3);
}

#[test]
fn test_rendered_table_and_summary() {
    let backend = MockBackend::new();
    let session = ReportSession::new();
    session.load_inventory_report(&backend).unwrap();

    let guard = session.inventory();
    let view = guard.as_ref().unwrap();

    let summary = render::summary_lines(view);
    assert_eq!(summary[0], "Physical Inventory Comparison");
    assert!(summary.iter().any(|l| l.contains("75.0%")));

    let derived = view.grid.derive_view(&view.dataset);
    let table = render::table_lines(&view.dataset, &derived, None);
    assert_eq!(table[0], "Showing 4 of 4 records");
    // The null days_open cell renders as the placeholder dash.
    assert!(table.iter().any(|l| l.starts_with("T-102") && l.ends_with("-")));
}

// ============================================================================
// Comparison Workflow
// ============================================================================

fn select_trailer_vs_scanlog(session: &ReportSession, backend: &MockBackend) {
    session.set_entity(Side::Left, "Trailer").unwrap();
    session.set_entity(Side::Right, "ScanLog").unwrap();
    session.refresh_fields(backend, Side::Left).unwrap();
    session.refresh_fields(backend, Side::Right).unwrap();
    session.set_join_field(Side::Left, "trailer_number").unwrap();
    session.set_join_field(Side::Right, "scanned_number").unwrap();
}

#[test]
fn test_comparison_workflow_end_to_end() {
    let backend = MockBackend::new();
    let session = ReportSession::new();
    session.authorize(&backend).unwrap();
    select_trailer_vs_scanlog(&session, &backend);

    session.toggle_field(Side::Left, "status");
    session.toggle_field(Side::Right, "scanned_at");
    session.run_comparison(&backend).unwrap();

    let guard = session.comparison();
    let view = guard.as_ref().unwrap();
    assert_eq!(view.title, "Entity Comparison");
    assert_eq!(view.export_base, "entity-comparison");
    assert_eq!(view.dataset.len(), 1);
    assert_eq!(view.dataset.cell(0, "joined_on").as_text(), "trailer_number");
    match &view.summary {
        ReportSummary::Comparison(summary) => {
            assert_eq!(summary.total_matched, 6);
            assert_eq!(summary.match_rate_display(), "60.0%");
        }
        other => panic!("expected comparison summary, got {:?}", other),
    }
}

#[test]
fn test_discovery_feeds_select_all() {
    let backend = MockBackend::new();
    let session = ReportSession::new();
    session.set_entity(Side::Left, "Trailer").unwrap();

    let discovered = session.refresh_fields(&backend, Side::Left).unwrap();
    assert_eq!(discovered.source, FieldSource::Schema);

    session.select_all_fields(Side::Left);
    let selection = session.selection();
    // Built-ins first, then the schema fields.
    assert_eq!(
        selection.side(Side::Left).selected_fields,
        [
            "id",
            "created_date",
            "updated_date",
            "created_by",
            "trailer_number",
            "branch",
            "status",
        ]
    );
}

#[test]
fn test_incomplete_selection_is_rejected_before_the_backend() {
    let backend = MockBackend::new();
    let session = ReportSession::new();
    session.set_entity(Side::Left, "Trailer").unwrap();
    session.set_entity(Side::Right, "ScanLog").unwrap();

    let error = session.run_comparison(&backend).unwrap_err();
    assert_eq!(error.error_code(), "VALIDATION_ERROR");
    assert!(session.comparison().is_none());
}

// ============================================================================
// Field Discovery Chain
// ============================================================================

#[test]
fn test_discovery_falls_back_to_sample_records() {
    let backend = MockBackend::new();
    // ScanLog has no schema entry, only sample records.
    let discovered = discover_fields(&backend, "ScanLog");
    assert_eq!(discovered.source, FieldSource::SampleRecord);
    assert!(discovered.fields.contains(&"scanned_at".to_string()));
}

#[test]
fn test_discovery_bottoms_out_at_built_ins() {
    let backend = MockBackend::new();
    // Branch has neither a schema nor sample records.
    let discovered = discover_fields(&backend, "Branch");
    assert_eq!(discovered.source, FieldSource::BuiltInOnly);
    assert_eq!(
        discovered.fields,
        ["id", "created_date", "updated_date", "created_by"]
    );
}

// ============================================================================
// Access Gate
// ============================================================================

#[test]
fn test_unauthorized_identity_is_denied() {
    let backend = MockBackend {
        email: "someone.else@tmmit.com",
        ..MockBackend::new()
    };
    let session = ReportSession::new();

    let error = session.authorize(&backend).unwrap_err();
    assert_eq!(error.error_code(), "ACCESS_DENIED");
    assert!(!error.is_recoverable());
    assert!(session.profile().is_none());
}
