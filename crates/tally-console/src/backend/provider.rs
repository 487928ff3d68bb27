//! Backend trait definition for the remote services.
//!
//! Implement this trait to plug a different transport (or a test double)
//! into the console. The [`HttpBackend`](super::HttpBackend) implementation
//! covers the production API; integration tests use an in-memory mock.

use crate::types::{ComparisonOutcome, ComparisonRequest, InventoryReport, UserProfile};
use anyhow::Result;
use serde_json::Value;

/// Trait for the remote identity, entity-store and comparison services.
///
/// Implementations must be thread-safe (`Send + Sync`) since the session
/// holding them may be shared across threads.
///
/// # Implementing a New Backend
///
/// ```rust,ignore
/// use tally_console::Backend;
///
/// struct FixtureBackend;
///
/// impl Backend for FixtureBackend {
///     fn current_user(&self) -> anyhow::Result<UserProfile> {
///         Ok(UserProfile { email: "tom@tmmit.com".to_string(), full_name: None })
///     }
///     // ...
///     fn name(&self) -> &str {
///         "fixture"
///     }
/// }
/// ```
pub trait Backend: Send + Sync {
    /// Look up the identity of the calling user.
    fn current_user(&self) -> Result<UserProfile>;

    /// Fetch the fixed physical-inventory-vs-trailer comparison report.
    fn fetch_inventory_report(&self) -> Result<InventoryReport>;

    /// Fetch the typed schema definition for an entity.
    ///
    /// The returned value is passed through field extraction unparsed; the
    /// store publishes several schema shapes and not every entity has one.
    fn fetch_entity_schema(&self, entity: &str) -> Result<Value>;

    /// Fetch sample records for an entity, at most `limit` when given.
    ///
    /// The payload may be a bare array or an object wrapping the records
    /// under `data` or `items`.
    fn fetch_sample_records(&self, entity: &str, limit: Option<usize>) -> Result<Value>;

    /// Run a server-side comparison between two entities.
    fn run_comparison(&self, request: &ComparisonRequest) -> Result<ComparisonOutcome>;

    /// Get the name of this backend (for logging).
    fn name(&self) -> &str;
}
