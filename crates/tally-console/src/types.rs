use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Identity
// ============================================================================

/// Identity returned by the remote auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

// ============================================================================
// Physical inventory report
// ============================================================================

/// Response of the fixed physical-inventory-vs-trailer comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReport {
    #[serde(rename = "total_physical_inventory", default)]
    pub total_inventory: u64,
    #[serde(default)]
    pub total_matched: u64,
    #[serde(default)]
    pub data: Vec<Value>,
}

impl InventoryReport {
    /// Match rate as a display string, one decimal place.
    ///
    /// Returns "N/A" when the total is zero.
    pub fn match_rate(&self) -> String {
        format_match_rate(self.total_matched, self.total_inventory)
    }
}

pub(crate) fn format_match_rate(matched: u64, total: u64) -> String {
    if total > 0 {
        format!("{:.1}%", matched as f64 / total as f64 * 100.0)
    } else {
        "N/A".to_string()
    }
}

// ============================================================================
// Entity comparison
// ============================================================================

/// One display field, tagged with the entity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub entity: String,
    pub field: String,
}

/// Request payload for the remote comparison engine.
///
/// Field names follow the wire format of the engine, hence the camelCase
/// rename. `join_field` duplicates `left_join_field` for older deployments
/// that only understand a single join key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    pub left_entity: String,
    pub right_entity: String,
    pub join_field: String,
    pub left_join_field: String,
    pub right_join_field: String,
    pub selected_fields: Vec<FieldRef>,
}

/// Aggregate counters returned alongside comparison rows.
///
/// `match_rate` arrives preformatted by the engine (e.g. `"78.4%"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    #[serde(default)]
    pub total_left_records: u64,
    #[serde(default)]
    pub total_right_records: u64,
    #[serde(default)]
    pub total_matched: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_rate: Option<String>,
}

impl ComparisonSummary {
    /// Match rate for display; "N/A" when the engine sent none.
    pub fn match_rate_display(&self) -> &str {
        self.match_rate
            .as_deref()
            .filter(|rate| !rate.is_empty())
            .unwrap_or("N/A")
    }
}

/// Response of the remote comparison engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    #[serde(default)]
    pub summary: ComparisonSummary,
    #[serde(default)]
    pub data: Vec<Value>,
}

// ============================================================================
// Tests
// ============================================================================
