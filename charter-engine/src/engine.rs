//! Contract Engine
//!
//! The single entry point for blueprint registration, contract
//! instantiation, lifecycle transitions and field value updates. Every
//! mutation of a contract runs inside [`StorageTrait::contract_modify`], so
//! the check and the write happen under the same per-contract lock.

use crate::views::{BlueprintSummary, ContractView};
use charter_core::{
    filter_by_status_set, Blueprint, BlueprintId, CharterConfig, CharterError, CharterResult,
    Contract, ContractId, ContractStatus, EntityType, FieldDefinition, FieldSlot, FieldType,
    FieldUpdates, StatusFilter, ValidationError,
};
use charter_storage::{InMemoryStorage, StorageTrait};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Blueprint registry plus contract lifecycle engine over a storage backend.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Clone)]
pub struct ContractEngine {
    storage: Arc<dyn StorageTrait>,
    config: CharterConfig,
}

impl std::fmt::Debug for ContractEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContractEngine {
    /// Create an engine over `storage`, validating `config` first.
    pub fn new(storage: Arc<dyn StorageTrait>, config: CharterConfig) -> CharterResult<Self> {
        config.validate()?;
        Ok(Self { storage, config })
    }

    /// Create an engine over fresh in-memory storage with default limits.
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(InMemoryStorage::new()),
            config: CharterConfig::default(),
        }
    }

    /// Create an engine over `storage` with limits read from `CHARTER_*`
    /// environment variables.
    pub fn from_env(storage: Arc<dyn StorageTrait>) -> CharterResult<Self> {
        Self::new(storage, CharterConfig::from_env()?)
    }

    /// Like [`ContractEngine::from_env`], resolving keys through `lookup`.
    pub fn from_lookup<F>(storage: Arc<dyn StorageTrait>, lookup: F) -> CharterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(storage, CharterConfig::from_lookup(lookup)?)
    }

    pub fn config(&self) -> &CharterConfig {
        &self.config
    }

    // === Blueprint Registry ===

    /// Define a field slot using this engine's limits.
    pub fn define_field(
        &self,
        field_type: FieldType,
        label: &str,
        x: i32,
        y: i32,
    ) -> CharterResult<FieldSlot> {
        Ok(FieldSlot::define_with(&self.config, field_type, label, x, y)?)
    }

    /// Register a new blueprint with the given slots, in order.
    ///
    /// # Errors
    /// `ValidationError` if the name is empty or too long, or if `fields`
    /// is empty. Nothing is registered on failure.
    pub fn create_blueprint(&self, name: &str, fields: Vec<FieldSlot>) -> CharterResult<Blueprint> {
        let blueprint = Blueprint::new(&self.config, name, fields).map_err(|e| {
            warn!(error = %e, "blueprint rejected");
            e
        })?;
        self.storage.blueprint_insert(&blueprint)?;

        info!(
            blueprint_id = %blueprint.blueprint_id(),
            name = blueprint.name(),
            field_count = blueprint.fields().len(),
            "blueprint created"
        );
        Ok(blueprint)
    }

    /// Register a blueprint from request-shaped field definitions.
    ///
    /// Every definition is validated before anything is registered.
    pub fn create_blueprint_from_definitions(
        &self,
        name: &str,
        definitions: Vec<FieldDefinition>,
    ) -> CharterResult<Blueprint> {
        let fields = definitions
            .into_iter()
            .map(|def| def.into_slot(&self.config))
            .collect::<Result<Vec<_>, ValidationError>>()?;
        self.create_blueprint(name, fields)
    }

    /// Get a blueprint by ID.
    pub fn get_blueprint(&self, id: BlueprintId) -> CharterResult<Blueprint> {
        debug!(blueprint_id = %id, "get blueprint");
        self.storage
            .blueprint_get(id)?
            .ok_or_else(|| CharterError::not_found(EntityType::Blueprint, id))
    }

    /// List all blueprints in creation order.
    pub fn list_blueprints(&self) -> CharterResult<Vec<Blueprint>> {
        self.storage.blueprint_list()
    }

    /// List blueprint summaries in creation order.
    pub fn list_blueprint_summaries(&self) -> CharterResult<Vec<BlueprintSummary>> {
        Ok(self
            .list_blueprints()?
            .iter()
            .map(BlueprintSummary::from)
            .collect())
    }

    // === Contracts ===

    /// Instantiate a contract from a registered blueprint.
    ///
    /// The new contract is `CREATED` and has one empty value per slot.
    ///
    /// # Errors
    /// `NotFound` if the blueprint is unknown, checked before the name.
    /// `ValidationError` if the name is empty or too long.
    pub fn instantiate_contract(
        &self,
        blueprint_id: BlueprintId,
        name: &str,
    ) -> CharterResult<Contract> {
        let blueprint = self.get_blueprint(blueprint_id)?;
        let contract = Contract::instantiate(&self.config, name, &blueprint)?;
        self.storage.contract_insert(&contract)?;

        info!(
            contract_id = %contract.contract_id(),
            blueprint_id = %blueprint_id,
            name = contract.name(),
            "contract instantiated"
        );
        Ok(contract)
    }

    /// Get a snapshot of a contract by ID.
    pub fn get_contract(&self, id: ContractId) -> CharterResult<Contract> {
        debug!(contract_id = %id, "get contract");
        self.storage
            .contract_get(id)?
            .ok_or_else(|| CharterError::not_found(EntityType::Contract, id))
    }

    /// List all contracts in creation order.
    pub fn list_contracts(&self) -> CharterResult<Vec<Contract>> {
        self.storage.contract_list()
    }

    /// List the contracts whose status passes `filter`, in creation order.
    pub fn list_contracts_filtered(&self, filter: &StatusFilter) -> CharterResult<Vec<Contract>> {
        let contracts = self.list_contracts()?;
        let total = contracts.len();
        let kept = filter_by_status_set(contracts, filter);
        debug!(total, kept = kept.len(), ?filter, "contracts filtered");
        Ok(kept)
    }

    /// Statuses `id` could move to right now.
    pub fn allowed_transitions(&self, id: ContractId) -> CharterResult<BTreeSet<ContractStatus>> {
        Ok(charter_core::allowed_transitions(&self.get_contract(id)?))
    }

    /// Whether `id` currently accepts field value updates.
    pub fn is_editable(&self, id: ContractId) -> CharterResult<bool> {
        Ok(charter_core::is_editable(&self.get_contract(id)?))
    }

    // === Lifecycle ===

    /// Move contract `id` to `target`.
    ///
    /// The check against the transition table and the status write happen
    /// under the contract's lock. Of two racing requests for the same
    /// transition exactly one succeeds; the other sees the new status and
    /// is rejected.
    ///
    /// # Errors
    /// `NotFound` for an unknown contract, `IllegalTransitionError` when
    /// `target` is not a successor of the current status. A rejected call
    /// leaves the contract unchanged.
    pub fn apply_transition(&self, id: ContractId, target: ContractStatus) -> CharterResult<Contract> {
        // overwritten before any commit, so the Ok branch logs the real source
        let mut previous = ContractStatus::Created;
        let result = self.storage.contract_modify(id, &mut |contract| {
            previous = contract.status();
            charter_core::apply_transition(contract, target)?;
            Ok(())
        });

        match &result {
            Ok(contract) => info!(
                contract_id = %id,
                from = %previous,
                to = %contract.status(),
                "contract transitioned"
            ),
            Err(CharterError::IllegalTransition(e)) => warn!(
                contract_id = %id,
                current = %e.current,
                requested = %e.requested,
                "transition rejected"
            ),
            Err(e) => warn!(contract_id = %id, requested = %target, error = %e, "transition failed"),
        }
        result
    }

    /// Move contract `id` to the status named by `target`.
    ///
    /// Unknown status names are rejected with `ValidationError` before the
    /// contract is looked up.
    pub fn apply_transition_str(&self, id: ContractId, target: &str) -> CharterResult<Contract> {
        let target = ContractStatus::from_db_str(target).map_err(|e| {
            warn!(contract_id = %id, error = %e, "transition to unknown status");
            ValidationError::from(e)
        })?;
        self.apply_transition(id, target)
    }

    // === Field Values ===

    /// Replace the values named in `updates`, atomically.
    ///
    /// Either every update is applied or none is.
    ///
    /// # Errors
    /// `NotFound` for an unknown contract, `LifecycleError::NotEditable`
    /// once the contract is signed, `ValidationError` for an empty update,
    /// an id that does not belong to the contract, or an oversized value.
    pub fn update_field_values(
        &self,
        id: ContractId,
        updates: &FieldUpdates,
    ) -> CharterResult<Contract> {
        let config = &self.config;
        let result = self
            .storage
            .contract_modify(id, &mut |contract| contract.update_field_values(config, updates));

        match &result {
            Ok(contract) => info!(
                contract_id = %id,
                updated = updates.len(),
                status = %contract.status(),
                "field values updated"
            ),
            Err(e) => warn!(contract_id = %id, error = %e, "field value update rejected"),
        }
        result
    }

    // === Views ===

    /// Denormalized view of contract `id`.
    pub fn contract_view(&self, id: ContractId) -> CharterResult<ContractView> {
        let contract = self.get_contract(id)?;
        let blueprint = self.get_blueprint(contract.blueprint_id())?;
        Ok(ContractView::build(&contract, &blueprint))
    }

    /// Views of the contracts whose status passes `filter`, in creation
    /// order.
    pub fn list_contract_views(&self, filter: &StatusFilter) -> CharterResult<Vec<ContractView>> {
        let mut blueprints: HashMap<BlueprintId, Blueprint> = HashMap::new();
        let mut views = Vec::new();
        for contract in self.list_contracts_filtered(filter)? {
            let blueprint_id = contract.blueprint_id();
            if !blueprints.contains_key(&blueprint_id) {
                blueprints.insert(blueprint_id, self.get_blueprint(blueprint_id)?);
            }
            if let Some(blueprint) = blueprints.get(&blueprint_id) {
                views.push(ContractView::build(&contract, blueprint));
            }
        }
        Ok(views)
    }
}

// ============================================================================
// TESTS
// ============================================================================
