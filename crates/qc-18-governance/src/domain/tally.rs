//! # Vote Tally
//!
//! Per-proposal counters with cast-once enforcement. Counters only grow, by
//! exactly the weight handed in (the voter's power at the snapshot).

use super::errors::GovernanceError;
use super::value_objects::{Address, ProposalId, VoteType, Weight};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Simple counting mode descriptor.
pub const COUNTING_MODE: &str = "support=bravo&quorum=for,abstain";

/// Counters for one proposal.
///
/// The voter set itself lives in `VoteTally`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalVote {
    /// Weight against.
    pub against_votes: Weight,
    /// Weight for.
    pub for_votes: Weight,
    /// Abstaining weight.
    pub abstain_votes: Weight,
    /// Voters recorded on this proposal, including zero-weight ones.
    voters: usize,
}

impl ProposalVote {
    /// Weight that counts toward quorum (for + abstain).
    #[must_use]
    pub fn quorum_votes(&self) -> u128 {
        u128::from(self.for_votes) + u128::from(self.abstain_votes)
    }

    /// Strict majority of for over against.
    #[must_use]
    pub fn vote_succeeded(&self) -> bool {
        self.for_votes > self.against_votes
    }

    /// Number of recorded voters, including zero-weight ones.
    #[must_use]
    pub fn voter_count(&self) -> usize {
        self.voters
    }
}

/// Tally for every proposal.
#[derive(Debug, Default)]
pub struct VoteTally {
    votes: HashMap<ProposalId, ProposalVote>,
    voters: HashMap<ProposalId, HashSet<Address>>,
}

impl VoteTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `id` (zeroed if nobody voted yet).
    #[must_use]
    pub fn get(&self, id: &ProposalId) -> ProposalVote {
        self.votes.get(id).copied().unwrap_or_default()
    }

    /// Returns true if `voter` already voted on `id`.
    #[must_use]
    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.voters
            .get(id)
            .is_some_and(|voters| voters.contains(voter))
    }

    /// Records a vote. Zero weight records participation only.
    pub fn record(
        &mut self,
        id: ProposalId,
        voter: Address,
        support: VoteType,
        weight: Weight,
    ) -> Result<ProposalVote, GovernanceError> {
        if !self.voters.entry(id).or_default().insert(voter) {
            return Err(GovernanceError::AlreadyVoted { id, voter });
        }
        let votes = self.votes.entry(id).or_default();
        let counter = match support {
            VoteType::Against => &mut votes.against_votes,
            VoteType::For => &mut votes.for_votes,
            VoteType::Abstain => &mut votes.abstain_votes,
        };
        *counter = counter.saturating_add(weight);
        votes.voters += 1;
        Ok(*votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: ProposalId = ProposalId([7; 32]);

    fn voter(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn test_record_adds_exact_weight() {
        let mut tally = VoteTally::new();
        tally.record(ID, voter(1), VoteType::For, 20).unwrap();
        tally.record(ID, voter(2), VoteType::Against, 5).unwrap();
        tally.record(ID, voter(3), VoteType::Abstain, 7).unwrap();

        let votes = tally.get(&ID);
        assert_eq!(votes.for_votes, 20);
        assert_eq!(votes.against_votes, 5);
        assert_eq!(votes.abstain_votes, 7);
        assert_eq!(votes.quorum_votes(), 27);
        assert!(votes.vote_succeeded());
    }

    #[test]
    fn test_second_vote_rejected_and_not_counted() {
        let mut tally = VoteTally::new();
        tally.record(ID, voter(1), VoteType::For, 20).unwrap();
        let err = tally.record(ID, voter(1), VoteType::Against, 20).unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyVoted { .. }));

        let votes = tally.get(&ID);
        assert_eq!(votes.for_votes, 20);
        assert_eq!(votes.against_votes, 0);
        assert_eq!(votes.voter_count(), 1);
    }

    #[test]
    fn test_zero_weight_vote_recorded() {
        let mut tally = VoteTally::new();
        tally.record(ID, voter(4), VoteType::For, 0).unwrap();
        assert!(tally.has_voted(&ID, &voter(4)));
        assert_eq!(tally.get(&ID).for_votes, 0);
        assert_eq!(tally.get(&ID).voter_count(), 1);
    }

    #[test]
    fn test_counters_are_independent_of_voter_set() {
        let mut tally = VoteTally::new();
        for n in 0..50 {
            tally.record(ID, voter(n), VoteType::For, 1).unwrap();
        }
        let snapshot = tally.get(&ID);
        tally.record(ID, voter(50), VoteType::Against, 3).unwrap();

        // Earlier copy is unaffected by later votes
        assert_eq!(snapshot.for_votes, 50);
        assert_eq!(snapshot.voter_count(), 50);
        assert_eq!(tally.get(&ID).voter_count(), 51);
        assert_eq!(tally.get(&ID).against_votes, 3);
        assert!(tally.has_voted(&ID, &voter(50)));
    }

    #[test]
    fn test_tie_is_not_success() {
        let mut tally = VoteTally::new();
        tally.record(ID, voter(1), VoteType::For, 10).unwrap();
        tally.record(ID, voter(2), VoteType::Against, 10).unwrap();
        assert!(!tally.get(&ID).vote_succeeded());
    }

    #[test]
    fn test_votes_are_per_proposal() {
        let mut tally = VoteTally::new();
        let other = ProposalId([8; 32]);
        tally.record(ID, voter(1), VoteType::For, 1).unwrap();
        assert!(tally.record(other, voter(1), VoteType::For, 1).is_ok());
        assert!(!tally.has_voted(&ProposalId([9; 32]), &voter(1)));
    }
}
