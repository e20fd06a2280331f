//! # Domain Errors
//!
//! Every request either commits fully or fails with one of these errors and
//! leaves all stores untouched.

use super::config::ConfigField;
use super::entities::ProposalState;
use super::value_objects::{Address, ProposalId, Weight};
use thiserror::Error;

/// Governance error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    /// Config value outside its declared bound.
    #[error("{field} out of range: {value} not in [{min}, {max}]")]
    ConfigOutOfRange {
        /// Parameter being set
        field: ConfigField,
        /// Rejected value
        value: u64,
        /// Lower bound (inclusive)
        min: u64,
        /// Upper bound (inclusive)
        max: u64,
    },

    /// Setter called with the value already in force.
    #[error("{field} unchanged: already {value}")]
    ConfigUnchanged {
        /// Parameter being set
        field: ConfigField,
        /// Current value
        value: u64,
    },

    /// Bounds themselves are inconsistent.
    #[error("invalid bounds for {field}: min={min}, max={max}")]
    InvalidBounds {
        /// Parameter whose bound is broken
        field: ConfigField,
        /// Lower bound
        min: u64,
        /// Upper bound
        max: u64,
    },

    /// Proposer below the proposal threshold.
    #[error("insufficient voting power: {proposer} has {power}, threshold {threshold}")]
    InsufficientVotingPower {
        /// Proposer identity
        proposer: Address,
        /// Power held at proposal time
        power: Weight,
        /// Required threshold
        threshold: Weight,
    },

    /// No proposal with this id.
    #[error("unknown proposal: {0:?}")]
    UnknownProposal(ProposalId),

    /// Operation not permitted in the proposal's current state.
    #[error("invalid proposal state for {operation}: {id} is {current}")]
    InvalidProposalState {
        /// Proposal id
        id: ProposalId,
        /// Derived state at the time of the request
        current: ProposalState,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Voter already recorded on this proposal.
    #[error("{voter} already voted on {id}")]
    AlreadyVoted {
        /// Proposal id
        id: ProposalId,
        /// Voter identity
        voter: Address,
    },

    /// Proposal already handed to the execution-delay queue.
    #[error("proposal already queued: {0}")]
    AlreadyQueued(ProposalId),

    /// Mutating operation while paused.
    #[error("operation rejected: governor is paused")]
    PausedOperation,

    /// Caller lacks the required role.
    #[error("unauthorized caller: {caller}")]
    Unauthorized {
        /// Rejected caller
        caller: Address,
    },

    /// Ballot signature could not be recovered.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Mutating call attempted while another one is in flight.
    #[error("reentrant call rejected")]
    ReentrantCall,

    /// Pause requested while paused, or unpause while running.
    #[error("invalid pause state: paused={paused}")]
    InvalidPauseState {
        /// Current pause flag
        paused: bool,
    },

    /// Identical proposal already submitted.
    #[error("proposal already exists: {0}")]
    ProposalAlreadyExists(ProposalId),

    /// Targets, values and calldatas differ in length.
    #[error("invalid proposal length: targets={targets}, values={values}, calldatas={calldatas}")]
    InvalidProposalLength {
        /// Number of targets
        targets: usize,
        /// Number of values
        values: usize,
        /// Number of calldatas
        calldatas: usize,
    },

    /// Proposal without calls.
    #[error("empty proposal")]
    EmptyProposal,

    /// Support byte outside Against/For/Abstain.
    #[error("invalid vote type: {0}")]
    InvalidVoteType(u8),

    /// Queued operation not yet executable.
    #[error("operation not ready: {0}")]
    OperationNotReady(ProposalId),

    /// Voting-power oracle failure.
    #[error("voting power oracle: {0}")]
    Oracle(String),

    /// Execution-delay queue failure.
    #[error("execution queue: {0}")]
    ExecutionQueue(String),
}

impl GovernanceError {
    /// True for configuration errors.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigOutOfRange { .. } | Self::ConfigUnchanged { .. } | Self::InvalidBounds { .. }
        )
    }

    /// True for authorization and gate errors.
    #[must_use]
    pub fn is_authorization_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::PausedOperation
                | Self::ReentrantCall
                | Self::InsufficientVotingPower { .. }
                | Self::InvalidSignature(_)
        )
    }

    /// True for proposal lifecycle errors.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownProposal(_)
                | Self::InvalidProposalState { .. }
                | Self::AlreadyVoted { .. }
                | Self::AlreadyQueued(_)
                | Self::ProposalAlreadyExists(_)
                | Self::OperationNotReady(_)
                | Self::InvalidPauseState { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_out_of_range_message() {
        let err = GovernanceError::ConfigOutOfRange {
            field: ConfigField::QuorumNumerator,
            value: 101,
            min: 1,
            max: 100,
        };
        assert!(err.to_string().contains("101 not in [1, 100]"));
        assert!(err.is_config_error());
        assert!(!err.is_state_error());
    }

    #[test]
    fn test_error_classification_is_disjoint() {
        let unauthorized = GovernanceError::Unauthorized {
            caller: Address::ZERO,
        };
        assert!(unauthorized.is_authorization_error());
        assert!(!unauthorized.is_config_error());

        let voted = GovernanceError::AlreadyVoted {
            id: ProposalId::default(),
            voter: Address::ZERO,
        };
        assert!(voted.is_state_error());
        assert!(!voted.is_authorization_error());
    }

    #[test]
    fn test_insufficient_power_message() {
        let err = GovernanceError::InsufficientVotingPower {
            proposer: Address::new([1; 20]),
            power: 10,
            threshold: 16,
        };
        assert!(err.to_string().contains("has 10, threshold 16"));
    }
}
