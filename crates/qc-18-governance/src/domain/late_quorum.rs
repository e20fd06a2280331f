//! # Late-Quorum Guard
//!
//! When a vote makes quorum newly reached close to the deadline, the window
//! is pushed out to `now + extension`. At most once per proposal; the
//! deadline never moves backwards.

use super::entities::Proposal;
use super::value_objects::Timepoint;

/// Outcome of running the guard after a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// Quorum was already reached earlier, or is still not reached.
    Unchanged,
    /// Quorum newly reached with enough time left.
    QuorumReached,
    /// Quorum newly reached inside the window; deadline moved.
    Extended {
        /// Previous exclusive end.
        old_vote_end: Timepoint,
        /// New exclusive end.
        new_vote_end: Timepoint,
    },
}

/// Stateless guard; the per-proposal bookkeeping lives on the proposal.
#[derive(Clone, Copy, Debug, Default)]
pub struct LateQuorumGuard;

impl LateQuorumGuard {
    /// Creates the guard.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Applies the rule after a vote at `now`.
    ///
    /// `reached_before` / `reached_after` are the quorum results before and
    /// after the vote was counted.
    pub fn on_vote(
        &self,
        proposal: &mut Proposal,
        reached_before: bool,
        reached_after: bool,
        now: Timepoint,
        extension: u64,
    ) -> ExtensionOutcome {
        if reached_before || !reached_after || proposal.quorum_reached_at.is_some() {
            return ExtensionOutcome::Unchanged;
        }
        proposal.quorum_reached_at = Some(now);

        let remaining = proposal.vote_end.saturating_sub(now);
        if remaining >= extension {
            return ExtensionOutcome::QuorumReached;
        }

        let old_vote_end = proposal.vote_end;
        let new_vote_end = now.saturating_add(extension).max(old_vote_end);
        proposal.vote_end = new_vote_end;
        proposal.extended = true;
        ExtensionOutcome::Extended {
            old_vote_end,
            new_vote_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, ProposalId, ProposalParams};

    fn proposal() -> Proposal {
        // vote_start = 11, vote_end = 10_011
        Proposal::new(ProposalParams {
            id: ProposalId([1; 32]),
            proposer: Address::ZERO,
            calls: vec![],
            description_hash: [0; 32],
            now: 0,
            voting_delay: 10,
            voting_period: 10_000,
        })
    }

    #[test]
    fn test_extends_when_quorum_reached_late() {
        let mut p = proposal();
        let now = p.vote_end - 50;
        let outcome = LateQuorumGuard::new().on_vote(&mut p, false, true, now, 7_200);
        assert_eq!(
            outcome,
            ExtensionOutcome::Extended {
                old_vote_end: 10_011,
                new_vote_end: now + 7_200,
            }
        );
        assert_eq!(p.vote_end, now + 7_200);
        assert!(p.extended);
    }

    #[test]
    fn test_no_extension_with_time_left() {
        let mut p = proposal();
        let outcome = LateQuorumGuard::new().on_vote(&mut p, false, true, 100, 7_200);
        assert_eq!(outcome, ExtensionOutcome::QuorumReached);
        assert_eq!(p.vote_end, 10_011);
        assert_eq!(p.quorum_reached_at, Some(100));
    }

    #[test]
    fn test_applies_at_most_once() {
        let mut p = proposal();
        let guard = LateQuorumGuard::new();
        let first = p.vote_end - 50;
        guard.on_vote(&mut p, false, true, first, 7_200);
        let end_after_first = p.vote_end;

        // Later vote near the new deadline, quorum already reached
        let second = end_after_first - 10;
        assert_eq!(
            guard.on_vote(&mut p, true, true, second, 7_200),
            ExtensionOutcome::Unchanged
        );
        // Even a caller that misreports the before-state cannot extend again
        assert_eq!(
            guard.on_vote(&mut p, false, true, second, 7_200),
            ExtensionOutcome::Unchanged
        );
        assert_eq!(p.vote_end, end_after_first);
    }

    #[test]
    fn test_not_reached_is_unchanged() {
        let mut p = proposal();
        let outcome = LateQuorumGuard::new().on_vote(&mut p, false, false, 10_000, 7_200);
        assert_eq!(outcome, ExtensionOutcome::Unchanged);
        assert!(p.quorum_reached_at.is_none());
    }
}
