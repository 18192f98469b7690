//! Field schema: the typed, labelled slots a blueprint is made of.

use crate::{CharterConfig, EntityIdType, FieldSlotId, FieldType, ValidationError};
use serde::{Deserialize, Serialize};

/// Advisory placement of a field on the rendered document.
///
/// Positions are metadata for presentation only; field order is always the
/// blueprint's insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One field definition belonging to a blueprint.
///
/// Slots are values: there are no setters, and a slot attached to a
/// blueprint is never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldSlot {
    slot_id: FieldSlotId,
    field_type: FieldType,
    label: String,
    position: Position,
}

impl FieldSlot {
    /// Define a new field slot using the default limits.
    pub fn define(
        field_type: FieldType,
        label: &str,
        x: i32,
        y: i32,
    ) -> Result<Self, ValidationError> {
        Self::define_with(&CharterConfig::default(), field_type, label, x, y)
    }

    /// Define a new field slot, checking the label against `config`.
    pub fn define_with(
        config: &CharterConfig,
        field_type: FieldType,
        label: &str,
        x: i32,
        y: i32,
    ) -> Result<Self, ValidationError> {
        let label = config.check_label(label)?;
        Ok(Self {
            slot_id: FieldSlotId::now_v7(),
            field_type,
            label,
            position: Position::new(x, y),
        })
    }

    /// Define a field slot from an untyped kind name such as `"text"`.
    ///
    /// Unknown kinds are rejected with `ValidationError::UnknownEnumValue`.
    pub fn parse(kind: &str, label: &str, x: i32, y: i32) -> Result<Self, ValidationError> {
        let field_type = FieldType::from_db_str(kind)?;
        Self::define(field_type, label, x, y)
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
}

/// Request-shaped field definition, as a transport would receive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldDefinition {
    pub field_type: String,
    pub label: String,
    #[serde(default)]
    pub position_x: i32,
    #[serde(default)]
    pub position_y: i32,
}

impl FieldDefinition {
    /// Validate and turn the definition into a slot.
    pub fn into_slot(self, config: &CharterConfig) -> Result<FieldSlot, ValidationError> {
        let field_type = FieldType::from_db_str(&self.field_type)?;
        FieldSlot::define_with(config, field_type, &self.label, self.position_x, self.position_y)
    }
}
