//! CHARTER Core - Blueprint, Contract and Lifecycle Types
//!
//! Pure data structures and the rules that govern them. All other crates
//! depend on this one; it performs no I/O and holds no shared state.
//!
//! - [`field`]: field slots (the schema of a blueprint)
//! - [`blueprint`]: named, ordered templates of slots
//! - [`contract`]: blueprint instances and their field values
//! - [`lifecycle`]: the status transition table and the editability rule
//! - [`filter`]: status-set projections for list views

pub mod blueprint;
pub mod config;
pub mod contract;
pub mod enums;
pub mod error;
pub mod field;
pub mod filter;
pub mod identity;
pub mod lifecycle;

pub use blueprint::Blueprint;
pub use config::{CharterConfig, DEFAULT_MAX_LABEL_LEN, DEFAULT_MAX_NAME_LEN, DEFAULT_MAX_VALUE_LEN};
pub use contract::{Contract, FieldUpdates, FieldValue};
pub use enums::{
    ContractStatus, ContractStatusParseError, EntityType, FieldType, FieldTypeParseError,
};
pub use error::{
    CharterError, CharterResult, ConfigError, IllegalTransitionError, LifecycleError,
    StorageError, ValidationError,
};
pub use field::{FieldDefinition, FieldSlot, Position};
pub use filter::{
    filter_by_status_set, FilterPreset, FilterPresetParseError, HasStatus, StatusFilter,
};
pub use identity::{BlueprintId, ContractId, EntityIdType, FieldSlotId, FieldValueId, Timestamp};
pub use lifecycle::{allowed_transitions, apply_transition, ensure_editable, is_editable};
