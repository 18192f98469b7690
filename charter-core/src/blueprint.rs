//! Blueprints: named, ordered templates of field slots.

use crate::{BlueprintId, CharterConfig, EntityIdType, FieldSlot, Timestamp, ValidationError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named template from which contracts are instantiated.
///
/// Invariants: the name is non-empty and the blueprint has at least one
/// slot. A blueprint is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Blueprint {
    blueprint_id: BlueprintId,
    name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    created_at: Timestamp,
    fields: Vec<FieldSlot>,
}

impl Blueprint {
    /// Build a blueprint, assigning it a fresh id.
    pub fn new(
        config: &CharterConfig,
        name: &str,
        fields: Vec<FieldSlot>,
    ) -> Result<Self, ValidationError> {
        let name = config.check_name("name", name)?;
        if fields.is_empty() {
            return Err(ValidationError::EmptyCollection {
                field: "fields".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for slot in &fields {
            if !seen.insert(slot.slot_id()) {
                return Err(ValidationError::InvalidValue {
                    field: "fields".to_string(),
                    reason: format!("field slot {} appears more than once", slot.slot_id()),
                });
            }
        }

        Ok(Self {
            blueprint_id: BlueprintId::now_v7(),
            name,
            created_at: Utc::now(),
            fields,
        })
    }

    pub fn blueprint_id(&self) -> BlueprintId {
        self.blueprint_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Field slots in insertion order.
    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }
}
