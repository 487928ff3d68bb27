//! Comparison selection workflow.
//!
//! Before the remote comparison engine can run, the user picks two entities,
//! one join field per side, and the fields to display. [`SelectionState`]
//! holds that choice and turns a complete one into a [`ComparisonRequest`];
//! an incomplete one fails validation with a user-facing message.

use crate::error::{ConsoleError, Result};
use crate::schema::ensure_known_entity;
use crate::types::{ComparisonRequest, FieldRef};
use serde::{Deserialize, Serialize};

/// Which side of the comparison a selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Selection for one side: the entity, its join field, and display fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideSelection {
    pub entity: Option<String>,
    pub join_field: Option<String>,
    /// Fields offered for selection (built-ins plus discovered fields).
    pub available_fields: Vec<String>,
    /// Fields chosen for display, in selection order.
    pub selected_fields: Vec<String>,
}

impl SideSelection {
    fn reset_for_entity(&mut self, entity: String) {
        self.entity = Some(entity);
        self.join_field = None;
        self.available_fields.clear();
        self.selected_fields.clear();
    }
}

/// The full two-sided selection driving one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    left: SideSelection,
    right: SideSelection,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &SideSelection {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideSelection {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Choose the entity for one side.
    ///
    /// Picking a different entity clears that side's join field and field
    /// selections, since they named fields of the old entity. Re-picking
    /// the current entity is a no-op. Returns whether the entity changed,
    /// so the caller can discard a loaded comparison built on the old one.
    pub fn set_entity(&mut self, side: Side, entity: &str) -> Result<bool> {
        ensure_known_entity(entity)?;
        let selection = self.side_mut(side);
        if selection.entity.as_deref() == Some(entity) {
            return Ok(false);
        }
        selection.reset_for_entity(entity.to_string());
        Ok(true)
    }

    /// Record the fields discovered for one side's entity.
    ///
    /// Selected fields that no longer exist are dropped.
    pub fn set_available_fields(&mut self, side: Side, fields: Vec<String>) {
        let selection = self.side_mut(side);
        selection
            .selected_fields
            .retain(|f| fields.contains(f));
        selection.available_fields = fields;
    }

    /// Choose the join field for one side. Requires an entity first.
    pub fn set_join_field(&mut self, side: Side, field: &str) -> Result<()> {
        let selection = self.side_mut(side);
        if selection.entity.is_none() {
            return Err(ConsoleError::Validation(format!(
                "Select the {} entity before choosing its join field",
                side.label()
            )));
        }
        selection.join_field = Some(field.to_string());
        Ok(())
    }

    /// Toggle one display field on or off for a side.
    pub fn toggle_field(&mut self, side: Side, field: &str) {
        let selection = self.side_mut(side);
        if let Some(position) = selection.selected_fields.iter().position(|f| f == field) {
            selection.selected_fields.remove(position);
        } else {
            selection.selected_fields.push(field.to_string());
        }
    }

    /// Select every available field for a side, in available order.
    pub fn select_all_fields(&mut self, side: Side) {
        let selection = self.side_mut(side);
        selection.selected_fields = selection.available_fields.clone();
    }

    /// Clear the field selection for a side.
    pub fn deselect_all_fields(&mut self, side: Side) {
        self.side_mut(side).selected_fields.clear();
    }

    /// Total display fields selected across both sides.
    pub fn selected_field_count(&self) -> usize {
        self.left.selected_fields.len() + self.right.selected_fields.len()
    }

    /// Check that the selection is complete enough to run.
    pub fn validate(&self) -> Result<()> {
        if self.left.entity.is_none() || self.right.entity.is_none() {
            return Err(ConsoleError::Validation(
                "Select both entities before running a comparison".to_string(),
            ));
        }
        if self.left.join_field.is_none() || self.right.join_field.is_none() {
            return Err(ConsoleError::Validation(
                "Select a join field for both entities".to_string(),
            ));
        }
        if self.selected_field_count() == 0 {
            return Err(ConsoleError::Validation(
                "Select at least one field to display".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the engine request from a complete selection.
    ///
    /// The left join field is duplicated under the legacy `join_field` key;
    /// selected fields are flattened left side first, in selection order.
    pub fn build_request(&self) -> Result<ComparisonRequest> {
        self.validate()?;

        let field_refs = |selection: &SideSelection| {
            let entity = selection.entity.clone().unwrap_or_default();
            selection
                .selected_fields
                .iter()
                .map(|field| FieldRef {
                    entity: entity.clone(),
                    field: field.clone(),
                })
                .collect::<Vec<_>>()
        };

        let mut selected_fields = field_refs(&self.left);
        selected_fields.extend(field_refs(&self.right));

        let left_join_field = self.left.join_field.clone().unwrap_or_default();
        Ok(ComparisonRequest {
            left_entity: self.left.entity.clone().unwrap_or_default(),
            right_entity: self.right.entity.clone().unwrap_or_default(),
            join_field: left_join_field.clone(),
            left_join_field,
            right_join_field: self.right.join_field.clone().unwrap_or_default(),
            selected_fields,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
