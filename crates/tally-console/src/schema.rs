//! Entity catalog and field discovery.
//!
//! The entity store publishes typed schemas in several shapes, and not every
//! entity has one. Field discovery tries the schema endpoint first and falls
//! back to sampling records, so the console can offer a field list even for
//! entities whose schema endpoint is broken or absent.

use crate::backend::Backend;
use crate::error::{ConsoleError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Entities the console knows how to compare.
pub const ENTITIES: [&str; 8] = [
    "Trailer",
    "InstallationLog",
    "PhysicalInventory",
    "Branch",
    "ProductionDelay",
    "ScanLog",
    "EquipmentValidation",
    "InstallationDelay",
];

/// Fields present on every entity regardless of schema.
pub const BUILT_IN_FIELDS: [&str; 4] = ["id", "created_date", "updated_date", "created_by"];

/// Check whether an entity name is in the catalog.
pub fn is_known_entity(name: &str) -> bool {
    ENTITIES.contains(&name)
}

/// Error with the catalog listing when the entity is unknown.
pub fn ensure_known_entity(name: &str) -> Result<()> {
    if is_known_entity(name) {
        Ok(())
    } else {
        Err(ConsoleError::UnknownEntity(name.to_string()))
    }
}

/// Where a discovered field list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Extracted from the typed schema endpoint.
    Schema,
    /// Inferred from the keys of a sample record.
    SampleRecord,
    /// Nothing beyond the built-in fields was found.
    BuiltInOnly,
}

impl FieldSource {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Schema => "entity schema",
            Self::SampleRecord => "sample record",
            Self::BuiltInOnly => "built-in fields only",
        }
    }
}

/// Result of running the field discovery chain for one entity.
#[derive(Debug, Clone)]
pub struct DiscoveredFields {
    /// Built-in fields first, then discovered fields, deduplicated.
    pub fields: Vec<String>,
    pub source: FieldSource,
}

/// Extract property names from a schema payload.
///
/// The store publishes schemas in several shapes; the first recognized one
/// wins:
///
/// 1. `{ "properties": { ... } }`
/// 2. `{ "schema": { "properties": { ... } } }`
/// 3. `{ "items": { "properties": { ... } } }`
/// 4. `{ "definitions": { "Name": { "properties": { ... } } } }` (first entry)
/// 5. a flat field map `{ "status": { "type": ... }, ... }` where every value
///    is an object and at least one carries a `type`, `enum` or `format` key
///
/// Returns an empty list when nothing matches.
pub fn extract_schema_fields(schema: &Value) -> Vec<String> {
    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        return props.keys().cloned().collect();
    }
    if let Some(props) = schema
        .get("schema")
        .and_then(|s| s.get("properties"))
        .and_then(Value::as_object)
    {
        return props.keys().cloned().collect();
    }
    if let Some(props) = schema
        .get("items")
        .and_then(|s| s.get("properties"))
        .and_then(Value::as_object)
    {
        return props.keys().cloned().collect();
    }
    if let Some(definitions) = schema.get("definitions").and_then(Value::as_object) {
        if let Some(props) = definitions
            .values()
            .next()
            .and_then(|def| def.get("properties"))
            .and_then(Value::as_object)
        {
            return props.keys().cloned().collect();
        }
    }

    if let Some(map) = schema.as_object() {
        let all_objects = !map.is_empty() && map.values().all(Value::is_object);
        let has_type_keys = map.values().any(|v| {
            v.get("type").is_some() || v.get("enum").is_some() || v.get("format").is_some()
        });
        if all_objects && has_type_keys {
            return map.keys().cloned().collect();
        }
    }

    Vec::new()
}

/// Prepend the built-in fields, deduplicating while preserving order.
pub fn with_built_in_fields(fields: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(BUILT_IN_FIELDS.len() + fields.len());
    for field in BUILT_IN_FIELDS
        .iter()
        .map(|f| (*f).to_string())
        .chain(fields)
    {
        if seen.insert(field.clone()) {
            merged.push(field);
        }
    }
    merged
}

/// Run the field discovery chain for an entity.
///
/// Strategy 1 asks the schema endpoint and extracts property names.
/// Strategy 2 fetches one sample record and uses its keys. Strategy 3, an
/// unbounded sample fetch, runs only when strategy 2 itself failed (an
/// empty-but-successful sample response ends the chain). Every failure is
/// logged and absorbed; the chain always produces at least the built-in
/// fields.
pub fn discover_fields(backend: &dyn Backend, entity: &str) -> DiscoveredFields {
    match backend.fetch_entity_schema(entity) {
        Ok(schema) => {
            let fields = extract_schema_fields(&schema);
            if !fields.is_empty() {
                debug!("Schema for {} yielded {} fields", entity, fields.len());
                return announce(entity, with_built_in_fields(fields), FieldSource::Schema);
            }
            warn!("Schema for {} had no recognizable field structure", entity);
        }
        Err(e) => warn!("Schema endpoint failed for {}: {}", entity, e),
    }

    debug!("Falling back to sample data for {}", entity);
    match backend.fetch_sample_records(entity, Some(1)) {
        Ok(payload) => {
            if let Some(fields) = first_record_keys(&payload) {
                return announce(entity, with_built_in_fields(fields), FieldSource::SampleRecord);
            }
        }
        Err(e) => {
            warn!("Sample fetch with limit 1 failed for {}: {}", entity, e);
            match backend.fetch_sample_records(entity, None) {
                Ok(payload) => {
                    if let Some(fields) = first_record_keys(&payload) {
                        return announce(
                            entity,
                            with_built_in_fields(fields),
                            FieldSource::SampleRecord,
                        );
                    }
                }
                Err(e) => warn!("Unbounded sample fetch also failed for {}: {}", entity, e),
            }
        }
    }

    warn!(
        "Only found built-in fields for {}; schema may not be accessible",
        entity
    );
    DiscoveredFields {
        fields: BUILT_IN_FIELDS.iter().map(|f| (*f).to_string()).collect(),
        source: FieldSource::BuiltInOnly,
    }
}

fn announce(entity: &str, fields: Vec<String>, source: FieldSource) -> DiscoveredFields {
    let discovered = fields.len() - BUILT_IN_FIELDS.len().min(fields.len());
    info!(
        "Loaded {} fields from {} ({} entity fields + {} built-in)",
        fields.len(),
        entity,
        discovered,
        fields.len() - discovered
    );
    DiscoveredFields { fields, source }
}

/// Keys of the first record in a sample payload.
///
/// The payload may be a bare array or an object wrapping the records under
/// `data` or `items`.
fn first_record_keys(payload: &Value) -> Option<Vec<String>> {
    let records = if let Some(records) = payload.as_array() {
        records
    } else {
        payload
            .get("data")
            .and_then(Value::as_array)
            .or_else(|| payload.get("items").and_then(Value::as_array))?
    };
    let first = records.first()?.as_object()?;
    Some(first.keys().cloned().collect())
}

// ============================================================================
// Tests
// ============================================================================
