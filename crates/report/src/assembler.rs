//! Joins the validator snapshot with the proposer tally and the identity map.

use crate::address::{canonicalize_address, Address};
use crate::fetcher::ValidatorIdentities;
use crate::scanner::ProposerTally;
use crate::source::SnapshotValidator;
use std::collections::HashSet;
use std::fmt;

/// Operator placeholder for validators missing from the bonded set
pub const UNKNOWN_OPERATOR: &str = "?";

/// Consensus validator at the starting height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSnapshot {
    pub address: Address,
    pub voting_power: i64,
}

impl From<&SnapshotValidator> for ValidatorSnapshot {
    fn from(validator: &SnapshotValidator) -> Self {
        Self {
            address: canonicalize_address(&validator.address),
            voting_power: validator.voting_power,
        }
    }
}

/// One line of the validator table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub address: Address,
    pub voting_power: i64,
    pub operator_address: String,
    pub proposed_count: u64,
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.address, self.voting_power, self.operator_address, self.proposed_count
        )
    }
}

/// One row per snapshot validator, in snapshot order.
pub fn assemble(
    snapshot: &[ValidatorSnapshot],
    tally: &ProposerTally,
    identities: &ValidatorIdentities,
) -> Vec<ReportRow> {
    snapshot
        .iter()
        .map(|validator| ReportRow {
            address: validator.address.clone(),
            voting_power: validator.voting_power,
            operator_address: identities
                .operator(&validator.address)
                .unwrap_or(UNKNOWN_OPERATOR)
                .to_string(),
            proposed_count: tally.count(&validator.address),
        })
        .collect()
}

/// Proposers in the tally that are not part of the snapshot, e.g. validators
/// that left the set during the scanned window. Sorted for stable output.
pub fn omitted_proposers(snapshot: &[ValidatorSnapshot], tally: &ProposerTally) -> Vec<Address> {
    let present: HashSet<&Address> = snapshot.iter().map(|validator| &validator.address).collect();
    let mut omitted: Vec<Address> = tally
        .iter()
        .filter(|(address, _)| !present.contains(address))
        .map(|(address, _)| address.clone())
        .collect();
    omitted.sort();
    omitted
}
