//! Read-side projections of blueprints and contracts.
//!
//! Views are denormalized snapshots for rendering: a contract view carries
//! its blueprint's name and the transitions currently open to it, so a
//! caller never needs a second lookup.

use charter_core::{
    Blueprint, BlueprintId, Contract, ContractId, ContractStatus, FieldType, FieldValue,
    FieldValueId, HasStatus, Timestamp,
};
use serde::{Deserialize, Serialize};

/// One field value as rendered inside a [`ContractView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldValueView {
    pub id: FieldValueId,
    pub field_type: FieldType,
    pub label: String,
    pub position_x: i32,
    pub position_y: i32,
    pub value: String,
}

impl From<&FieldValue> for FieldValueView {
    fn from(field: &FieldValue) -> Self {
        let position = field.position();
        Self {
            id: field.field_value_id(),
            field_type: field.field_type(),
            label: field.label().to_string(),
            position_x: position.x,
            position_y: position.y,
            value: field.value().to_string(),
        }
    }
}

/// Denormalized contract snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContractView {
    pub contract_id: ContractId,
    pub name: String,
    pub blueprint_id: BlueprintId,
    pub blueprint_name: String,
    pub status: ContractStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
    pub fields: Vec<FieldValueView>,
    /// Statuses reachable in one step, in lifecycle order.
    pub allowed_transitions: Vec<ContractStatus>,
    pub editable: bool,
}

impl ContractView {
    /// Build a view of `contract`, which must have been instantiated from
    /// `blueprint`.
    pub fn build(contract: &Contract, blueprint: &Blueprint) -> Self {
        debug_assert_eq!(contract.blueprint_id(), blueprint.blueprint_id());
        Self {
            contract_id: contract.contract_id(),
            name: contract.name().to_string(),
            blueprint_id: contract.blueprint_id(),
            blueprint_name: blueprint.name().to_string(),
            status: contract.status(),
            created_at: contract.created_at(),
            updated_at: contract.updated_at(),
            fields: contract.fields().iter().map(FieldValueView::from).collect(),
            allowed_transitions: charter_core::allowed_transitions(contract)
                .into_iter()
                .collect(),
            editable: charter_core::is_editable(contract),
        }
    }
}

impl HasStatus for ContractView {
    fn status(&self) -> ContractStatus {
        self.status
    }
}

/// Blueprint row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlueprintSummary {
    pub blueprint_id: BlueprintId,
    pub name: String,
    pub field_count: usize,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

impl From<&Blueprint> for BlueprintSummary {
    fn from(blueprint: &Blueprint) -> Self {
        Self {
            blueprint_id: blueprint.blueprint_id(),
            name: blueprint.name().to_string(),
            field_count: blueprint.fields().len(),
            created_at: blueprint.created_at(),
        }
    }
}
