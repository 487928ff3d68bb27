//! Cell values for dynamic tabular records.
//!
//! Rows arrive as untyped JSON objects, so every cell is a tagged scalar:
//! null, a number, text, or a nested structure (array/object) that
//! stringifies to its compact JSON form. All engines in this crate view a
//! cell through two lenses: its canonical text form ([`CellValue::as_text`])
//! and its numeric form ([`CellValue::as_number`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::borrow::Cow;

/// Placeholder string treated as "no value" alongside null and `""`.
pub const PLACEHOLDER: &str = "-";

// =============================================================================
// CellValue
// =============================================================================

/// A single cell in a tabular record.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing value (JSON null or an absent key).
    Null,
    /// Finite numeric value.
    Number(f64),
    /// Text value. JSON booleans ingest as `"true"`/`"false"`.
    Text(String),
    /// Structured value (array or object), kept as raw JSON.
    Nested(JsonValue),
}

impl CellValue {
    /// Whether this cell is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this cell carries no usable value: null, empty text, or the
    /// `"-"` placeholder. Blank cells are skipped by column profiling and
    /// statistics.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty() || s == PLACEHOLDER,
            _ => false,
        }
    }

    /// Numeric view of the cell: the number itself, or text parsed as a
    /// finite number. Nested and null cells have no numeric view.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Self::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Canonical text form of the cell, shared by filtering, sorting,
    /// distinct-counting, and CSV export. Null renders as the empty string;
    /// callers that want a display placeholder handle null themselves.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Text(s) => Cow::Borrowed(s),
            Self::Nested(v) => Cow::Owned(v.to_string()),
        }
    }
}

impl From<JsonValue> for CellValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Text(b.to_string()),
            JsonValue::String(s) => Self::Text(s),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Text(n.to_string()),
            },
            other => Self::Nested(other),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Nested(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(CellValue::from)
    }
}

// =============================================================================
// Number Handling
// =============================================================================

/// Parse a string as a finite number.
///
/// Leading/trailing whitespace is ignored. Empty strings, partial numbers,
/// infinities, and NaN all yield `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a number the way cells render it: integral values without a
/// decimal point (`100`, not `100.0`), everything else in the shortest
/// round-tripping form.
pub fn format_number(n: f64) -> String {
    n.to_string()
}
