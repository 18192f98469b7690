//! Contracts and their field values.
//!
//! A contract is instantiated from a blueprint and owns one `FieldValue`
//! per blueprint slot. The set of field values is fixed at instantiation;
//! only their string contents change, and only while the contract is
//! editable (see [`crate::lifecycle`]).

use crate::lifecycle;
use crate::{
    Blueprint, BlueprintId, CharterConfig, CharterResult, ContractId, ContractStatus,
    EntityIdType, FieldSlotId, FieldType, FieldValueId, Position, Timestamp, ValidationError,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The value currently bound to one blueprint slot within one contract.
///
/// Type, label and position are a snapshot of the slot taken at
/// instantiation, so a contract renders without a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldValue {
    field_value_id: FieldValueId,
    slot_id: FieldSlotId,
    field_type: FieldType,
    label: String,
    position: Position,
    value: String,
}

impl FieldValue {
    pub fn field_value_id(&self) -> FieldValueId {
        self.field_value_id
    }

    pub fn slot_id(&self) -> FieldSlotId {
        self.slot_id
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Mapping from field value id to its replacement string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct FieldUpdates(BTreeMap<FieldValueId, String>);

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated id keeps the last value.
    pub fn set(mut self, id: FieldValueId, value: impl Into<String>) -> Self {
        self.0.insert(id, value.into());
        self
    }

    pub fn insert(&mut self, id: FieldValueId, value: impl Into<String>) {
        self.0.insert(id, value.into());
    }

    pub fn get(&self, id: FieldValueId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldValueId, &str)> {
        self.0.iter().map(|(id, v)| (*id, v.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(FieldValueId, S)> for FieldUpdates {
    fn from_iter<I: IntoIterator<Item = (FieldValueId, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, v)| (id, v.into())).collect())
    }
}

/// A blueprint instance moving through the approval/signature lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contract {
    contract_id: ContractId,
    name: String,
    blueprint_id: BlueprintId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    updated_at: Timestamp,
    pub(crate) status: ContractStatus,
    fields: Vec<FieldValue>,
}

impl Contract {
    /// Instantiate a contract from `blueprint`: status `CREATED`, one
    /// empty value per slot, in blueprint order.
    pub fn instantiate(
        config: &CharterConfig,
        name: &str,
        blueprint: &Blueprint,
    ) -> Result<Self, ValidationError> {
        let name = config.check_name("name", name)?;
        let fields = blueprint
            .fields()
            .iter()
            .map(|slot| FieldValue {
                field_value_id: FieldValueId::now_v7(),
                slot_id: slot.slot_id(),
                field_type: slot.field_type(),
                label: slot.label().to_string(),
                position: slot.position(),
                value: String::new(),
            })
            .collect();

        let now = Utc::now();
        Ok(Self {
            contract_id: ContractId::now_v7(),
            name,
            blueprint_id: blueprint.blueprint_id(),
            created_at: now,
            updated_at: now,
            status: ContractStatus::Created,
            fields,
        })
    }

    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blueprint_id(&self) -> BlueprintId {
        self.blueprint_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    /// Field values in blueprint order.
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    pub fn field(&self, id: FieldValueId) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.field_value_id == id)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Replace the values named in `updates`, leaving the others alone.
    ///
    /// The whole call is rejected, with nothing applied, if the contract is
    /// not editable (`LifecycleError`), if `updates` is empty, names an id
    /// that is not one of this contract's field values, or carries a value
    /// over the configured length (`ValidationError`).
    pub fn update_field_values(
        &mut self,
        config: &CharterConfig,
        updates: &FieldUpdates,
    ) -> CharterResult<()> {
        lifecycle::ensure_editable(self)?;

        if updates.is_empty() {
            return Err(ValidationError::EmptyCollection {
                field: "updates".to_string(),
            }
            .into());
        }

        let mut targets = Vec::with_capacity(updates.len());
        for (id, value) in updates.iter() {
            let index = self
                .fields
                .iter()
                .position(|f| f.field_value_id == id)
                .ok_or(ValidationError::UnknownFieldValue {
                    contract_id: self.contract_id,
                    field_value_id: id,
                })?;
            config.check_value(&format!("field {}", id), value)?;
            targets.push((index, value));
        }

        for (index, value) in targets {
            self.fields[index].value = value.to_string();
        }
        self.touch();
        Ok(())
    }
}
