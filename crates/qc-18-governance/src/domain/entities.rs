//! # Domain Entities
//!
//! The proposal record, its derived lifecycle state, and the append-only
//! proposal store.

use super::errors::GovernanceError;
use super::value_objects::{Address, Call, OperationHandle, ProposalId, Timepoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state, always derived and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Before the voting window opens.
    Pending,
    /// Voting window open.
    Active,
    /// Explicitly canceled. Terminal.
    Canceled,
    /// Window closed without quorum or majority.
    Defeated,
    /// Window closed with quorum and strict majority.
    Succeeded,
    /// Registered with the execution-delay queue.
    Queued,
    /// Executed by the queue. Terminal.
    Executed,
    /// Queue window elapsed without execution. Terminal.
    Expired,
}

impl ProposalState {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Defeated | Self::Executed | Self::Expired
        )
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Canceled => "Canceled",
            Self::Defeated => "Defeated",
            Self::Succeeded => "Succeeded",
            Self::Queued => "Queued",
            Self::Executed => "Executed",
            Self::Expired => "Expired",
        };
        f.write_str(name)
    }
}

/// Durable proposal record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Content-derived identifier.
    pub id: ProposalId,
    /// Account that submitted the proposal.
    pub proposer: Address,
    /// Fixed point for every power and supply lookup.
    pub snapshot: Timepoint,
    /// First timepoint of the voting window.
    pub vote_start: Timepoint,
    /// First timepoint after the voting window.
    pub vote_end: Timepoint,
    /// Calls run on execution.
    pub calls: Vec<Call>,
    /// Keccak-256 of the description.
    pub description_hash: [u8; 32],
    /// Set by an explicit cancel.
    pub canceled: bool,
    /// Queue registration, set when queued.
    pub execution_handle: Option<OperationHandle>,
    /// Earliest execution time reported at queue time.
    pub eta: Option<Timepoint>,
    /// Timepoint of the vote that first reached quorum.
    pub quorum_reached_at: Option<Timepoint>,
    /// Whether the late-quorum extension moved `vote_end`.
    pub extended: bool,
    /// Creation timepoint.
    pub created_at: Timepoint,
}

/// Parameters for creating a proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalParams {
    /// Content-derived identifier.
    pub id: ProposalId,
    /// Submitter.
    pub proposer: Address,
    /// Calls to run.
    pub calls: Vec<Call>,
    /// Keccak-256 of the description.
    pub description_hash: [u8; 32],
    /// Creation timepoint.
    pub now: Timepoint,
    /// Voting delay in force at creation.
    pub voting_delay: u64,
    /// Voting period in force at creation.
    pub voting_period: u64,
}

impl Proposal {
    /// Creates a proposal whose snapshot is `now + voting_delay`.
    ///
    /// Voting opens one timepoint after the snapshot so every lookup is
    /// strictly historical once votes can be cast.
    pub fn new(params: ProposalParams) -> Self {
        let snapshot = params.now.saturating_add(params.voting_delay);
        let vote_start = snapshot.saturating_add(1);
        Self {
            id: params.id,
            proposer: params.proposer,
            snapshot,
            vote_start,
            vote_end: vote_start.saturating_add(params.voting_period),
            calls: params.calls,
            description_hash: params.description_hash,
            canceled: false,
            execution_handle: None,
            eta: None,
            quorum_reached_at: None,
            extended: false,
            created_at: params.now,
        }
    }

    /// Last timepoint at which votes are accepted.
    #[must_use]
    pub fn deadline(&self) -> Timepoint {
        self.vote_end.saturating_sub(1)
    }
}

/// Append-only proposal store.
#[derive(Debug, Default)]
pub struct ProposalStore {
    proposals: BTreeMap<ProposalId, Proposal>,
    /// Creation order, for listing.
    order: Vec<ProposalId>,
}

impl ProposalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new proposal. Existing records are never replaced.
    pub fn insert(&mut self, proposal: Proposal) -> Result<(), GovernanceError> {
        if self.proposals.contains_key(&proposal.id) {
            return Err(GovernanceError::ProposalAlreadyExists(proposal.id));
        }
        self.order.push(proposal.id);
        self.proposals.insert(proposal.id, proposal);
        Ok(())
    }

    /// Returns true if `id` is known.
    #[must_use]
    pub fn contains(&self, id: &ProposalId) -> bool {
        self.proposals.contains_key(id)
    }

    /// Looks up a proposal.
    pub fn get(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::UnknownProposal(*id))
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: &ProposalId) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(id)
            .ok_or(GovernanceError::UnknownProposal(*id))
    }

    /// Proposal ids in creation order.
    #[must_use]
    pub fn ids(&self) -> &[ProposalId] {
        &self.order
    }

    /// Number of proposals ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no proposal was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(id: u8, now: Timepoint) -> ProposalParams {
        ProposalParams {
            id: ProposalId([id; 32]),
            proposer: Address::new([0xAA; 20]),
            calls: vec![],
            description_hash: [0; 32],
            now,
            voting_delay: 10,
            voting_period: 100,
        }
    }

    #[test]
    fn test_new_proposal_window() {
        let proposal = Proposal::new(params(1, 1_000));
        assert_eq!(proposal.snapshot, 1_010);
        assert_eq!(proposal.vote_start, 1_011);
        assert_eq!(proposal.vote_end, 1_111);
        assert_eq!(proposal.deadline(), 1_110);
        assert!(!proposal.canceled);
        assert!(proposal.execution_handle.is_none());
    }

    #[test]
    fn test_store_rejects_duplicate() {
        let mut store = ProposalStore::new();
        store.insert(Proposal::new(params(1, 0))).unwrap();
        let err = store.insert(Proposal::new(params(1, 50))).unwrap_err();
        assert_eq!(err, GovernanceError::ProposalAlreadyExists(ProposalId([1; 32])));
        // Original record untouched
        assert_eq!(store.get(&ProposalId([1; 32])).unwrap().created_at, 0);
    }

    #[test]
    fn test_store_unknown_proposal() {
        let store = ProposalStore::new();
        assert!(matches!(
            store.get(&ProposalId([9; 32])),
            Err(GovernanceError::UnknownProposal(_))
        ));
    }

    #[test]
    fn test_store_keeps_creation_order() {
        let mut store = ProposalStore::new();
        store.insert(Proposal::new(params(3, 0))).unwrap();
        store.insert(Proposal::new(params(1, 0))).unwrap();
        assert_eq!(store.ids(), &[ProposalId([3; 32]), ProposalId([1; 32])]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProposalState::Executed.is_terminal());
        assert!(ProposalState::Canceled.is_terminal());
        assert!(!ProposalState::Queued.is_terminal());
        assert!(!ProposalState::Succeeded.is_terminal());
    }
}
