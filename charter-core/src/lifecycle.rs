//! Contract lifecycle state machine.
//!
//! # State Transition Diagram
//!
//! ```text
//! instantiate() → CREATED ── approve ──→ APPROVED ── send ──→ SENT ── sign ──→ SIGNED (terminal)
//!                 └──────────────── editable ─────────────────┘             read-only
//! ```
//!
//! Two independent rules live here:
//! - the transition table, which says where a contract may go next;
//! - the editability rule, which says whether its field values may change.
//!
//! They agree today (only `SIGNED` is both terminal and read-only), but
//! neither is derived from the other.

use crate::{Contract, ContractStatus, IllegalTransitionError, LifecycleError};
use std::collections::BTreeSet;

/// Legal destinations for each status. Strictly linear: no skipping, no
/// regression.
const TRANSITIONS: [(ContractStatus, &[ContractStatus]); 4] = [
    (ContractStatus::Created, &[ContractStatus::Approved]),
    (ContractStatus::Approved, &[ContractStatus::Sent]),
    (ContractStatus::Sent, &[ContractStatus::Signed]),
    (ContractStatus::Signed, &[]),
];

/// Statuses in which field values may be mutated.
const EDITABLE: [ContractStatus; 3] = [
    ContractStatus::Created,
    ContractStatus::Approved,
    ContractStatus::Sent,
];

impl ContractStatus {
    /// Destinations reachable from this status in one step.
    pub fn next_statuses(self) -> &'static [ContractStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    /// Check whether `target` is a legal next status.
    pub fn can_transition_to(self, target: ContractStatus) -> bool {
        self.next_statuses().contains(&target)
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }

    /// Check whether contracts in this status accept field edits.
    pub fn is_editable(self) -> bool {
        EDITABLE.contains(&self)
    }
}

/// The set of statuses `contract` may move to next. Empty for `SIGNED`.
pub fn allowed_transitions(contract: &Contract) -> BTreeSet<ContractStatus> {
    contract.status().next_statuses().iter().copied().collect()
}

/// Whether `contract`'s field values may currently be edited.
pub fn is_editable(contract: &Contract) -> bool {
    contract.status().is_editable()
}

/// Fail with `LifecycleError` unless `contract` is editable.
pub fn ensure_editable(contract: &Contract) -> Result<(), LifecycleError> {
    if is_editable(contract) {
        Ok(())
    } else {
        Err(LifecycleError::NotEditable {
            contract_id: contract.contract_id(),
            status: contract.status(),
        })
    }
}

/// Move `contract` to `target` if the table allows it.
///
/// On rejection the contract is untouched. On success only the status and
/// the `updated_at` timestamp change.
pub fn apply_transition(
    contract: &mut Contract,
    target: ContractStatus,
) -> Result<(), IllegalTransitionError> {
    let current = contract.status();
    if !current.can_transition_to(target) {
        return Err(IllegalTransitionError {
            contract_id: contract.contract_id(),
            current,
            requested: target,
        });
    }
    contract.status = target;
    contract.touch();
    Ok(())
}
