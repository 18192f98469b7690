//! CHARTER Test Utilities
//!
//! Centralized test infrastructure for the CHARTER workspace:
//! - Proptest generators for ids, enums, slots, blueprints and contracts
//! - Test fixtures for common scenarios
//! - Custom assertions for CHARTER-specific validation

// Re-export in-memory storage from its source crate
pub use charter_storage::{InMemoryStorage, StorageTrait};

// Re-export core types for convenience
pub use charter_core::{
    apply_transition, Blueprint, BlueprintId, CharterConfig, CharterError, CharterResult,
    Contract, ContractId, ContractStatus, EntityIdType, EntityType, FieldSlot, FieldSlotId,
    FieldType, FieldUpdates, FieldValueId, FilterPreset, IllegalTransitionError, LifecycleError,
    StatusFilter, StorageError, ValidationError,
};

use uuid::Uuid;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating CHARTER entity types.

    use super::*;
    use proptest::prelude::*;

    // === Identity Type Generators ===

    /// Generate a random UUID (for generic ID generation).
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a random BlueprintId.
    pub fn arb_blueprint_id() -> impl Strategy<Value = BlueprintId> {
        arb_uuid().prop_map(BlueprintId::new)
    }

    /// Generate a random ContractId.
    pub fn arb_contract_id() -> impl Strategy<Value = ContractId> {
        arb_uuid().prop_map(ContractId::new)
    }

    /// Generate a random FieldValueId.
    pub fn arb_field_value_id() -> impl Strategy<Value = FieldValueId> {
        arb_uuid().prop_map(FieldValueId::new)
    }

    // === Enum Generators ===

    /// Generate a ContractStatus variant.
    pub fn arb_contract_status() -> impl Strategy<Value = ContractStatus> {
        prop::sample::select(ContractStatus::ALL.to_vec())
    }

    /// Generate a FieldType variant.
    pub fn arb_field_type() -> impl Strategy<Value = FieldType> {
        prop::sample::select(FieldType::ALL.to_vec())
    }

    /// Generate a FilterPreset variant.
    pub fn arb_filter_preset() -> impl Strategy<Value = FilterPreset> {
        prop::sample::select(FilterPreset::ALL.to_vec())
    }

    /// Generate a StatusFilter: either `All` or an arbitrary (possibly
    /// empty) status set.
    pub fn arb_status_filter() -> impl Strategy<Value = StatusFilter> {
        prop_oneof![
            Just(StatusFilter::All),
            prop::sample::subsequence(ContractStatus::ALL.to_vec(), 0..=4)
                .prop_map(StatusFilter::only),
        ]
    }

    // === Text Generators ===

    /// Generate a name or label that passes the default limits.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,40}"
    }

    /// Generate a field value within the default limits.
    pub fn arb_field_value() -> impl Strategy<Value = String> {
        ".{0,64}"
    }

    // === Entity Generators ===

    /// Generate a field slot with a valid label.
    pub fn arb_field_slot() -> impl Strategy<Value = FieldSlot> {
        (arb_field_type(), arb_name(), -1000i32..1000, -1000i32..1000).prop_filter_map(
            "label must pass validation",
            |(field_type, label, x, y)| FieldSlot::define(field_type, &label, x, y).ok(),
        )
    }

    /// Generate a blueprint with 1..=8 slots.
    pub fn arb_blueprint() -> impl Strategy<Value = Blueprint> {
        (arb_name(), prop::collection::vec(arb_field_slot(), 1..=8)).prop_filter_map(
            "blueprint must pass validation",
            |(name, fields)| Blueprint::new(&CharterConfig::default(), &name, fields).ok(),
        )
    }

    /// Generate a contract at an arbitrary status, reached through legal
    /// transitions only.
    pub fn arb_contract() -> impl Strategy<Value = Contract> {
        (arb_blueprint(), arb_contract_status())
            .prop_map(|(blueprint, status)| fixtures::contract_at(&blueprint, status))
    }

    /// Generate a valid CharterConfig.
    pub fn arb_valid_config() -> impl Strategy<Value = CharterConfig> {
        (1usize..=500, 1usize..=500, 1usize..=50_000).prop_map(
            |(max_name_len, max_label_len, max_value_len)| CharterConfig {
                max_name_len,
                max_label_len,
                max_value_len,
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// The two-party NDA template used throughout the tests.
    pub fn nda_blueprint() -> Blueprint {
        let slots = vec![
            slot(FieldType::Text, "Party A", 0, 0),
            slot(FieldType::Text, "Party B", 0, 40),
        ];
        blueprint("NDA", slots)
    }

    /// A blueprint with one slot of every field type.
    pub fn every_type_blueprint() -> Blueprint {
        let slots = FieldType::ALL
            .iter()
            .enumerate()
            .map(|(i, field_type)| slot(*field_type, &format!("{} field", field_type), 0, i as i32 * 40))
            .collect();
        blueprint("Every type", slots)
    }

    /// A fresh CREATED contract instantiated from `blueprint`.
    pub fn contract(blueprint: &Blueprint, name: &str) -> Contract {
        match Contract::instantiate(&CharterConfig::default(), name, blueprint) {
            Ok(contract) => contract,
            Err(e) => panic!("fixture contract {:?} is invalid: {}", name, e),
        }
    }

    /// A contract from `blueprint` walked forward to `status`.
    pub fn contract_at(blueprint: &Blueprint, status: ContractStatus) -> Contract {
        let mut contract = contract(blueprint, &format!("{} contract", status));
        for target in ContractStatus::ALL.iter().skip(1).filter(|s| **s <= status) {
            if let Err(e) = apply_transition(&mut contract, *target) {
                panic!("fixture transition failed: {}", e);
            }
        }
        contract
    }

    /// In-memory storage pre-loaded with `blueprint`.
    pub fn storage_with(blueprint: &Blueprint) -> InMemoryStorage {
        let storage = InMemoryStorage::new();
        if let Err(e) = storage.blueprint_insert(blueprint) {
            panic!("fixture blueprint insert failed: {}", e);
        }
        storage
    }

    /// Updates that set every field value of `contract` to `value`.
    pub fn fill_all(contract: &Contract, value: &str) -> FieldUpdates {
        contract
            .fields()
            .iter()
            .map(|f| (f.field_value_id(), value))
            .collect()
    }

    fn slot(field_type: FieldType, label: &str, x: i32, y: i32) -> FieldSlot {
        match FieldSlot::define(field_type, label, x, y) {
            Ok(slot) => slot,
            Err(e) => panic!("fixture slot {:?} is invalid: {}", label, e),
        }
    }

    fn blueprint(name: &str, slots: Vec<FieldSlot>) -> Blueprint {
        match Blueprint::new(&CharterConfig::default(), name, slots) {
            Ok(blueprint) => blueprint,
            Err(e) => panic!("fixture blueprint {:?} is invalid: {}", name, e),
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for CHARTER-specific validation.

    use super::*;

    /// Assert that a CharterResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &CharterResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a CharterResult is Err.
    #[track_caller]
    pub fn assert_err<T: std::fmt::Debug>(result: &CharterResult<T>) {
        assert!(result.is_err(), "Expected Err, got Ok: {:?}", result);
    }

    /// Assert that a CharterResult is a NotFound storage error.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &CharterResult<T>, entity_type: EntityType) {
        match result {
            Err(CharterError::Storage(StorageError::NotFound { entity_type: et, .. })) => {
                assert_eq!(*et, entity_type, "Wrong entity type in NotFound error");
            }
            other => panic!("Expected NotFound error for {:?}, got: {:?}", entity_type, other),
        }
    }

    /// Assert that a CharterResult is a Validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &CharterResult<T>) {
        match result {
            Err(CharterError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert that a CharterResult is a Lifecycle (not editable) error.
    #[track_caller]
    pub fn assert_lifecycle_error<T: std::fmt::Debug>(result: &CharterResult<T>) {
        match result {
            Err(CharterError::Lifecycle(LifecycleError::NotEditable { .. })) => {}
            other => panic!("Expected Lifecycle error, got: {:?}", other),
        }
    }

    /// Assert that a CharterResult is an illegal transition from `current`
    /// to `requested`.
    #[track_caller]
    pub fn assert_illegal_transition<T: std::fmt::Debug>(
        result: &CharterResult<T>,
        current: ContractStatus,
        requested: ContractStatus,
    ) {
        match result {
            Err(CharterError::IllegalTransition(e)) => {
                assert_eq!(e.current, current, "Wrong current status in rejection");
                assert_eq!(e.requested, requested, "Wrong requested status in rejection");
            }
            other => panic!(
                "Expected IllegalTransition {} -> {}, got: {:?}",
                current, requested, other
            ),
        }
    }

    /// Assert that a Contract has the expected status.
    #[track_caller]
    pub fn assert_status(contract: &Contract, expected: ContractStatus) {
        assert_eq!(
            contract.status(),
            expected,
            "Contract status mismatch: expected {}, got {}",
            expected,
            contract.status()
        );
    }

    /// Assert that every field value of `contract` equals the given list,
    /// in order.
    #[track_caller]
    pub fn assert_values(contract: &Contract, expected: &[&str]) {
        let actual: Vec<&str> = contract.fields().iter().map(|f| f.value()).collect();
        assert_eq!(actual, expected, "Field values mismatch");
    }

    /// Assert that a CharterConfig is valid.
    #[track_caller]
    pub fn assert_config_valid(config: &CharterConfig) {
        match config.validate() {
            Ok(()) => {}
            Err(e) => panic!("Config validation failed: {:?}", e),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nda_blueprint_fixture() {
        let blueprint = fixtures::nda_blueprint();
        assert_eq!(blueprint.name(), "NDA");
        let labels: Vec<&str> = blueprint.fields().iter().map(|f| f.label()).collect();
        assert_eq!(labels, ["Party A", "Party B"]);
    }

    #[test]
    fn test_every_type_blueprint_covers_all_types() {
        let blueprint = fixtures::every_type_blueprint();
        let types: Vec<FieldType> = blueprint.fields().iter().map(|f| f.field_type()).collect();
        assert_eq!(types, FieldType::ALL);
    }

    #[test]
    fn test_contract_at_fixture() {
        let blueprint = fixtures::nda_blueprint();
        for status in ContractStatus::ALL {
            assertions::assert_status(&fixtures::contract_at(&blueprint, status), status);
        }
    }

    #[test]
    fn test_fill_all_fixture() {
        let blueprint = fixtures::nda_blueprint();
        let mut contract = fixtures::contract(&blueprint, "Acme NDA");
        let updates = fixtures::fill_all(&contract, "x");
        contract
            .update_field_values(&CharterConfig::default(), &updates)
            .unwrap();
        assertions::assert_values(&contract, &["x", "x"]);
    }

    #[test]
    fn test_storage_with_fixture() {
        let blueprint = fixtures::nda_blueprint();
        let storage = fixtures::storage_with(&blueprint);
        assert_eq!(storage.blueprint_count(), 1);
        assert_eq!(
            storage.blueprint_get(blueprint.blueprint_id()).unwrap(),
            Some(blueprint)
        );
    }

    #[test]
    fn test_assertion_not_found() {
        let result: CharterResult<()> = Err(CharterError::not_found(
            EntityType::Contract,
            ContractId::now_v7(),
        ));
        assertions::assert_not_found(&result, EntityType::Contract);
    }

    #[test]
    fn test_assertion_illegal_transition() {
        let result: CharterResult<()> = Err(IllegalTransitionError {
            contract_id: ContractId::now_v7(),
            current: ContractStatus::Signed,
            requested: ContractStatus::Created,
        }
        .into());
        assertions::assert_illegal_transition(&result, ContractStatus::Signed, ContractStatus::Created);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_blueprint_is_nonempty(blueprint in generators::arb_blueprint()) {
            prop_assert!(!blueprint.name().is_empty());
            prop_assert!(!blueprint.fields().is_empty());
        }

        #[test]
        fn prop_generated_contract_matches_its_status_rules(contract in generators::arb_contract()) {
            prop_assert_eq!(
                charter_core::is_editable(&contract),
                contract.status() != ContractStatus::Signed
            );
            prop_assert!(contract.fields().iter().all(|f| f.value().is_empty()));
        }

        #[test]
        fn prop_generated_config_is_valid(config in generators::arb_valid_config()) {
            assertions::assert_config_valid(&config);
        }
    }
}
