//! # Domain Invariants
//!
//! Business rules checked by the service before any state is touched.

use super::errors::GovernanceError;
use super::value_objects::{Address, Call, Timepoint, Weight, U256};

/// Invariant: proposer power meets the threshold.
pub fn invariant_threshold_met(
    proposer: Address,
    power: Weight,
    threshold: Weight,
) -> Result<(), GovernanceError> {
    if power < threshold {
        return Err(GovernanceError::InsufficientVotingPower {
            proposer,
            power,
            threshold,
        });
    }
    Ok(())
}

/// Invariant: targets, values and calldatas line up and are non-empty.
///
/// Returns the zipped call bundle.
pub fn invariant_call_bundle(
    targets: &[Address],
    values: &[U256],
    calldatas: &[Vec<u8>],
) -> Result<Vec<Call>, GovernanceError> {
    if targets.len() != values.len() || targets.len() != calldatas.len() {
        return Err(GovernanceError::InvalidProposalLength {
            targets: targets.len(),
            values: values.len(),
            calldatas: calldatas.len(),
        });
    }
    if targets.is_empty() {
        return Err(GovernanceError::EmptyProposal);
    }
    Ok(targets
        .iter()
        .zip(values)
        .zip(calldatas)
        .map(|((target, value), calldata)| Call::new(*target, *value, calldata.clone()))
        .collect())
}

/// Invariant: the voting deadline never moves backwards.
#[must_use]
pub fn invariant_deadline_monotonic(old_vote_end: Timepoint, new_vote_end: Timepoint) -> bool {
    new_vote_end >= old_vote_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let proposer = Address::new([1; 20]);
        assert!(invariant_threshold_met(proposer, 16, 16).is_ok());
        assert!(matches!(
            invariant_threshold_met(proposer, 10, 16),
            Err(GovernanceError::InsufficientVotingPower {
                power: 10,
                threshold: 16,
                ..
            })
        ));
    }

    #[test]
    fn test_call_bundle_lengths() {
        let t = [Address::new([1; 20])];
        let err = invariant_call_bundle(&t, &[], &[vec![]]).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InvalidProposalLength {
                targets: 1,
                values: 0,
                calldatas: 1,
            }
        );
        assert_eq!(
            invariant_call_bundle(&[], &[], &[]).unwrap_err(),
            GovernanceError::EmptyProposal
        );

        let calls = invariant_call_bundle(&t, &[U256::from(3u64)], &[vec![9]]).unwrap();
        assert_eq!(calls, vec![Call::new(t[0], U256::from(3u64), vec![9])]);
    }

    #[test]
    fn test_deadline_monotonic() {
        assert!(invariant_deadline_monotonic(10, 10));
        assert!(invariant_deadline_monotonic(10, 11));
        assert!(!invariant_deadline_monotonic(10, 9));
    }
}
