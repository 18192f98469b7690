//! CHARTER Storage - Storage Trait and In-Memory Implementation
//!
//! Defines the storage abstraction the contract engine reads from and
//! writes to. Durable backends implement [`StorageTrait`]; the in-memory
//! backend here is used by tests and by embedders that need no durability.

use charter_core::{
    Blueprint, BlueprintId, CharterError, CharterResult, Contract, ContractId, EntityType,
    StorageError,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Storage trait for CHARTER entities.
///
/// Implementations must give read-your-writes consistency per entity and
/// must run [`StorageTrait::contract_modify`] as one atomic unit per
/// contract.
pub trait StorageTrait: Send + Sync {
    // === Blueprint Operations ===

    /// Insert a new blueprint.
    fn blueprint_insert(&self, blueprint: &Blueprint) -> CharterResult<()>;

    /// Get a blueprint by ID.
    fn blueprint_get(&self, id: BlueprintId) -> CharterResult<Option<Blueprint>>;

    /// List all blueprints in creation order.
    fn blueprint_list(&self) -> CharterResult<Vec<Blueprint>>;

    // === Contract Operations ===

    /// Insert a new contract.
    fn contract_insert(&self, contract: &Contract) -> CharterResult<()>;

    /// Get a snapshot of a contract by ID.
    fn contract_get(&self, id: ContractId) -> CharterResult<Option<Contract>>;

    /// List snapshots of all contracts in creation order.
    fn contract_list(&self) -> CharterResult<Vec<Contract>>;

    /// Run `f` against a working copy of the contract while holding that
    /// contract's lock, and commit the copy only if `f` succeeds.
    ///
    /// Returns the committed contract. Fails with `NotFound` if the id is
    /// unknown, or with whatever `f` returned, in which case the stored
    /// contract is unchanged.
    fn contract_modify(
        &self,
        id: ContractId,
        f: &mut dyn FnMut(&mut Contract) -> CharterResult<()>,
    ) -> CharterResult<Contract>;
}

// ============================================================================
// IN-MEMORY STORAGE
// ============================================================================

/// One stored entity plus its insertion sequence number.
#[derive(Debug)]
struct Stored<T> {
    seq: u64,
    cell: Arc<T>,
}

/// In-memory storage with per-entity serialization.
///
/// The id-keyed maps are sharded and only locked long enough to clone an
/// entity handle. Each contract sits behind its own mutex, so writes to
/// unrelated contracts never wait on each other. Blueprints are immutable
/// and need no lock at all.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    blueprints: DashMap<BlueprintId, Stored<Blueprint>>,
    contracts: DashMap<ContractId, Stored<Mutex<Contract>>>,
    next_seq: AtomicU64,
}

impl InMemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get count of stored blueprints.
    pub fn blueprint_count(&self) -> usize {
        self.blueprints.len()
    }

    /// Get count of stored contracts.
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }

    fn seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    fn contract_cell(&self, id: ContractId) -> CharterResult<Arc<Mutex<Contract>>> {
        self.contracts
            .get(&id)
            .map(|entry| Arc::clone(&entry.cell))
            .ok_or_else(|| CharterError::not_found(EntityType::Contract, id))
    }
}

/// Lock a contract cell, recovering from poisoning.
///
/// The cell only ever receives whole committed values, so a panic while the
/// lock was held cannot leave it half-written.
fn lock(cell: &Mutex<Contract>) -> MutexGuard<'_, Contract> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

fn snapshot(cell: &Mutex<Contract>) -> Contract {
    lock(cell).clone()
}

fn already_exists(entity_type: EntityType) -> CharterError {
    CharterError::Storage(StorageError::InsertFailed {
        entity_type,
        reason: "already exists".to_string(),
    })
}

impl StorageTrait for InMemoryStorage {
    // === Blueprint Operations ===

    fn blueprint_insert(&self, blueprint: &Blueprint) -> CharterResult<()> {
        match self.blueprints.entry(blueprint.blueprint_id()) {
            Entry::Occupied(_) => Err(already_exists(EntityType::Blueprint)),
            Entry::Vacant(slot) => {
                slot.insert(Stored {
                    seq: self.seq(),
                    cell: Arc::new(blueprint.clone()),
                });
                tracing::trace!(blueprint_id = %blueprint.blueprint_id(), "blueprint stored");
                Ok(())
            }
        }
    }

    fn blueprint_get(&self, id: BlueprintId) -> CharterResult<Option<Blueprint>> {
        Ok(self.blueprints.get(&id).map(|entry| (*entry.cell).clone()))
    }

    fn blueprint_list(&self) -> CharterResult<Vec<Blueprint>> {
        let mut entries: Vec<(u64, Arc<Blueprint>)> = self
            .blueprints
            .iter()
            .map(|entry| (entry.seq, Arc::clone(&entry.cell)))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, b)| (*b).clone()).collect())
    }

    // === Contract Operations ===

    fn contract_insert(&self, contract: &Contract) -> CharterResult<()> {
        match self.contracts.entry(contract.contract_id()) {
            Entry::Occupied(_) => Err(already_exists(EntityType::Contract)),
            Entry::Vacant(slot) => {
                slot.insert(Stored {
                    seq: self.seq(),
                    cell: Arc::new(Mutex::new(contract.clone())),
                });
                tracing::trace!(contract_id = %contract.contract_id(), "contract stored");
                Ok(())
            }
        }
    }

    fn contract_get(&self, id: ContractId) -> CharterResult<Option<Contract>> {
        let cell = self.contracts.get(&id).map(|entry| Arc::clone(&entry.cell));
        Ok(cell.map(|cell| snapshot(&cell)))
    }

    fn contract_list(&self) -> CharterResult<Vec<Contract>> {
        let mut entries: Vec<(u64, Arc<Mutex<Contract>>)> = self
            .contracts
            .iter()
            .map(|entry| (entry.seq, Arc::clone(&entry.cell)))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.iter().map(|(_, cell)| snapshot(cell)).collect())
    }

    fn contract_modify(
        &self,
        id: ContractId,
        f: &mut dyn FnMut(&mut Contract) -> CharterResult<()>,
    ) -> CharterResult<Contract> {
        let cell = self.contract_cell(id)?;
        let mut guard = lock(&cell);

        let mut working = guard.clone();
        f(&mut working)?;
        *guard = working.clone();
        Ok(working)
    }
}

// ============================================================================
// TESTS
// ============================================================================
