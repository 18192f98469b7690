//! Error types for CHARTER operations
//!
//! Every error here is a rejection of an invalid request. None of them is a
//! transient fault, so nothing in the workspace retries on them.

use crate::{ContractId, ContractStatus, ContractStatusParseError, EntityType, FieldTypeParseError, FieldValueId};
use thiserror::Error;
use uuid::Uuid;

/// Malformed input: empty required strings, unknown enum names, unknown ids.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Value for {field} is too long: {actual} chars (max {max})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("{field} must contain at least one entry")]
    EmptyCollection { field: String },

    #[error("Unknown {kind}: {value}")]
    UnknownEnumValue { kind: String, value: String },

    #[error("Field value {field_value_id} does not belong to contract {contract_id}")]
    UnknownFieldValue {
        contract_id: ContractId,
        field_value_id: FieldValueId,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<ContractStatusParseError> for ValidationError {
    fn from(err: ContractStatusParseError) -> Self {
        ValidationError::UnknownEnumValue {
            kind: "contract status".to_string(),
            value: err.0,
        }
    }
}

impl From<FieldTypeParseError> for ValidationError {
    fn from(err: FieldTypeParseError) -> Self {
        ValidationError::UnknownEnumValue {
            kind: "field type".to_string(),
            value: err.0,
        }
    }
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {entity_type:?} with id {id}")]
    NotFound { entity_type: EntityType, id: Uuid },

    #[error("Insert failed for {entity_type:?}: {reason}")]
    InsertFailed { entity_type: EntityType, reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// A transition was requested that the lifecycle table does not allow
/// from the contract's current status.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Illegal transition for contract {contract_id}: {current} -> {requested}")]
pub struct IllegalTransitionError {
    pub contract_id: ContractId,
    pub current: ContractStatus,
    pub requested: ContractStatus,
}

/// Field mutation attempted while the contract is not editable.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Contract {contract_id} fields are immutable in status {status}")]
    NotEditable {
        contract_id: ContractId,
        status: ContractStatus,
    },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config TOML: {reason}")]
    Parse { reason: String },
}

/// Master error type for all CHARTER errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CharterError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transition error: {0}")]
    IllegalTransition(#[from] IllegalTransitionError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl CharterError {
    /// Shorthand for a `StorageError::NotFound`.
    pub fn not_found(entity_type: EntityType, id: impl Into<Uuid>) -> Self {
        CharterError::Storage(StorageError::NotFound {
            entity_type,
            id: id.into(),
        })
    }

    /// True when the caller's request was refused and must be changed
    /// before being sent again. Only a poisoned lock falls outside this.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CharterError::Storage(StorageError::LockPoisoned))
    }
}

/// Result type alias for CHARTER operations.
pub type CharterResult<T> = Result<T, CharterError>;

// =============================================================================
// TESTS
// =============================================================================
