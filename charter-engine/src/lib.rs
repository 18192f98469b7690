//! CHARTER Engine - Blueprint Registry and Contract Lifecycle
//!
//! Ties the pure rules in `charter-core` to a `charter-storage` backend:
//!
//! - [`ContractEngine`]: registry, instantiation, transitions, field updates
//! - [`views`]: denormalized read models for rendering
//! - [`telemetry`]: tracing subscriber setup for embedding processes
//!
//! ```no_run
//! use charter_core::{ContractStatus, FieldType, FieldUpdates};
//! use charter_engine::ContractEngine;
//!
//! # fn main() -> charter_core::CharterResult<()> {
//! let engine = ContractEngine::in_memory();
//! let blueprint = engine.create_blueprint(
//!     "NDA",
//!     vec![engine.define_field(FieldType::Text, "Party A", 0, 0)?],
//! )?;
//! let contract = engine.instantiate_contract(blueprint.blueprint_id(), "Acme NDA")?;
//! let party_a = contract.fields()[0].field_value_id();
//! engine.update_field_values(
//!     contract.contract_id(),
//!     &FieldUpdates::new().set(party_a, "Acme Corp"),
//! )?;
//! engine.apply_transition(contract.contract_id(), ContractStatus::Approved)?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod telemetry;
pub mod views;

pub use engine::ContractEngine;
pub use telemetry::{init_tracing, LogFormat, TelemetryConfig, TelemetryError, DEFAULT_LOG_FILTER};
pub use views::{BlueprintSummary, ContractView, FieldValueView};
