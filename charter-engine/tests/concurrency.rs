//! Concurrency Tests for the Contract Engine
//!
//! Operations on one contract must behave as if run one at a time; operations
//! on different contracts must not interfere. Threads are lined up on a
//! `Barrier` so the racing calls really overlap.

use charter_engine::ContractEngine;
use charter_test_utils::{
    assertions, fixtures, CharterConfig, CharterError, ContractId, ContractStatus, FieldUpdates,
    LifecycleError,
};
use std::sync::{Arc, Barrier};
use std::thread;

const RACERS: usize = 8;

fn engine() -> (ContractEngine, charter_test_utils::BlueprintId) {
    let blueprint = fixtures::nda_blueprint();
    let id = blueprint.blueprint_id();
    let engine =
        ContractEngine::new(Arc::new(fixtures::storage_with(&blueprint)), CharterConfig::default())
            .unwrap();
    (engine, id)
}

/// Run `f` on `RACERS` threads released together; collect the results.
fn race<T, F>(f: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(usize) -> T + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(RACERS));
    let f = Arc::new(f);
    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let f = Arc::clone(&f);
            thread::spawn(move || {
                barrier.wait();
                f(i)
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn racing_transitions_have_exactly_one_winner() {
    let (engine, blueprint_id) = engine();
    let id = engine
        .instantiate_contract(blueprint_id, "Contested")
        .unwrap()
        .contract_id();

    let racer = engine.clone();
    let results = race(move |_| racer.apply_transition(id, ContractStatus::Approved));

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        // losers observe the winner's write
        assertions::assert_illegal_transition(
            result,
            ContractStatus::Approved,
            ContractStatus::Approved,
        );
    }
    assertions::assert_status(&engine.get_contract(id).unwrap(), ContractStatus::Approved);
}

#[test]
fn concurrent_updates_to_one_contract_never_tear() {
    let (engine, blueprint_id) = engine();
    let contract = engine.instantiate_contract(blueprint_id, "Shared").unwrap();
    let id = contract.contract_id();
    let party_a = contract.fields()[0].field_value_id();
    let party_b = contract.fields()[1].field_value_id();

    let racer = engine.clone();
    let results = race(move |i| {
        let mine = format!("writer {}", i);
        for _ in 0..25 {
            let updates = FieldUpdates::new()
                .set(party_a, mine.clone())
                .set(party_b, mine.clone());
            racer.update_field_values(id, &updates)?;
        }
        Ok::<_, CharterError>(())
    });

    for result in results {
        assert!(result.is_ok(), "update failed: {:?}", result);
    }
    // both values always come from the same call
    let stored = engine.get_contract(id).unwrap();
    let a = stored.field(party_a).unwrap().value();
    assert!(a.starts_with("writer "));
    assert_eq!(a, stored.field(party_b).unwrap().value());
    assertions::assert_status(&stored, ContractStatus::Created);
}

#[test]
fn updates_racing_signature_are_either_applied_before_or_rejected() {
    let (engine, blueprint_id) = engine();
    let contract = engine.instantiate_contract(blueprint_id, "Closing").unwrap();
    let id = contract.contract_id();
    let party_b = contract.fields()[1].field_value_id();
    engine.apply_transition(id, ContractStatus::Approved).unwrap();
    engine.apply_transition(id, ContractStatus::Sent).unwrap();

    let racer = engine.clone();
    let results = race(move |i| {
        if i == 0 {
            racer.apply_transition(id, ContractStatus::Signed).map(|_| None)
        } else {
            racer
                .update_field_values(id, &FieldUpdates::new().set(party_b, format!("edit {}", i)))
                .map(|c| Some(c.updated_at()))
        }
    });

    assert!(results[0].is_ok(), "signing failed: {:?}", results[0]);
    for result in &results[1..] {
        match result {
            Ok(_) => {}
            Err(CharterError::Lifecycle(LifecycleError::NotEditable { status, .. })) => {
                assert_eq!(*status, ContractStatus::Signed);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    // whatever value survived was written while still editable
    let signed = engine.get_contract(id).unwrap();
    assertions::assert_status(&signed, ContractStatus::Signed);
    let accepted = results[1..].iter().filter(|r| r.is_ok()).count();
    if accepted == 0 {
        assert_eq!(signed.field(party_b).unwrap().value(), "");
    } else {
        assert!(signed.field(party_b).unwrap().value().starts_with("edit "));
    }
}

#[test]
fn different_contracts_progress_independently() {
    let (engine, blueprint_id) = engine();
    let ids: Vec<ContractId> = (0..RACERS)
        .map(|i| {
            engine
                .instantiate_contract(blueprint_id, &format!("Contract {}", i))
                .unwrap()
                .contract_id()
        })
        .collect();

    let racer = engine.clone();
    let shared = ids.clone();
    let results = race(move |i| {
        let id = shared[i];
        racer.update_field_values(
            id,
            &FieldUpdates::new().set(racer.get_contract(id)?.fields()[0].field_value_id(), format!("party {}", i)),
        )?;
        for target in [
            ContractStatus::Approved,
            ContractStatus::Sent,
            ContractStatus::Signed,
        ] {
            racer.apply_transition(id, target)?;
        }
        Ok::<_, CharterError>(())
    });

    for result in results {
        assert!(result.is_ok(), "lifecycle failed: {:?}", result);
    }
    for (i, id) in ids.iter().enumerate() {
        let contract = engine.get_contract(*id).unwrap();
        assertions::assert_status(&contract, ContractStatus::Signed);
        assert_eq!(contract.fields()[0].value(), format!("party {}", i));
    }
}
