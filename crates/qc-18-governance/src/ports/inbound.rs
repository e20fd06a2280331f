//! # Inbound Ports
//!
//! API trait defining what the governance subsystem can do.

use crate::domain::{
    Address, EcdsaSignature, GovernanceConfig, GovernanceError, Proposal, ProposalId,
    ProposalState, ProposalVote, Timepoint, VoteType, Weight, U256,
};

/// Governance API - inbound port.
///
/// Mutating calls take the caller identity explicitly; authentication of
/// that identity is the transport's job. Every call either commits fully or
/// returns an error with no effect.
pub trait GovernanceApi: Send + Sync {
    /// Submits a proposal. Returns its content-derived id.
    fn propose(
        &self,
        caller: Address,
        targets: Vec<Address>,
        values: Vec<U256>,
        calldatas: Vec<Vec<u8>>,
        description: &str,
    ) -> Result<ProposalId, GovernanceError>;

    /// Casts a vote. Returns the counted weight.
    fn cast_vote(
        &self,
        caller: Address,
        id: ProposalId,
        support: VoteType,
    ) -> Result<Weight, GovernanceError>;

    /// Casts a vote with a free-text reason.
    fn cast_vote_with_reason(
        &self,
        caller: Address,
        id: ProposalId,
        support: VoteType,
        reason: &str,
    ) -> Result<Weight, GovernanceError>;

    /// Casts a vote on behalf of the signer of `signature`.
    fn cast_vote_by_sig(
        &self,
        id: ProposalId,
        support: VoteType,
        signature: &EcdsaSignature,
    ) -> Result<Weight, GovernanceError>;

    /// Registers a succeeded proposal with the execution queue. Returns the eta.
    fn queue(&self, caller: Address, id: ProposalId) -> Result<Timepoint, GovernanceError>;

    /// Executes a queued, ready proposal.
    fn execute(&self, caller: Address, id: ProposalId) -> Result<(), GovernanceError>;

    /// Cancels a proposal.
    fn cancel(&self, caller: Address, id: ProposalId) -> Result<(), GovernanceError>;

    /// Owner: sets the voting delay.
    fn set_voting_delay(&self, caller: Address, value: u64) -> Result<(), GovernanceError>;

    /// Owner: sets the voting period.
    fn set_voting_period(&self, caller: Address, value: u64) -> Result<(), GovernanceError>;

    /// Owner: sets the proposal threshold.
    fn set_proposal_threshold(&self, caller: Address, value: Weight)
        -> Result<(), GovernanceError>;

    /// Owner: sets the quorum numerator.
    fn set_quorum_numerator(&self, caller: Address, value: u64) -> Result<(), GovernanceError>;

    /// Owner: sets the late-quorum extension.
    fn set_late_quorum_extension(&self, caller: Address, value: u64)
        -> Result<(), GovernanceError>;

    /// Owner: pauses mutating proposal and vote operations.
    fn pause(&self, caller: Address) -> Result<(), GovernanceError>;

    /// Owner: lifts the pause.
    fn unpause(&self, caller: Address) -> Result<(), GovernanceError>;

    /// Owner: hands the owner role to `new_owner`.
    fn transfer_ownership(&self, caller: Address, new_owner: Address)
        -> Result<(), GovernanceError>;

    /// Current parameters.
    fn config(&self) -> GovernanceConfig;

    /// Derived state of a proposal.
    fn state(&self, id: ProposalId) -> Result<ProposalState, GovernanceError>;

    /// Stored proposal record.
    fn proposal(&self, id: ProposalId) -> Result<Proposal, GovernanceError>;

    /// Vote counters of a proposal.
    fn proposal_votes(&self, id: ProposalId) -> Result<ProposalVote, GovernanceError>;

    /// Whether `account` voted on `id`.
    fn has_voted(&self, id: ProposalId, account: Address) -> bool;

    /// Required quorum at `timepoint`.
    fn quorum(&self, timepoint: Timepoint) -> Result<u128, GovernanceError>;
}
