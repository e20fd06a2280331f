//! # Governance Events
//!
//! Payloads published to the `EventSink` port after each committed change.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `ProposalCreated` | `propose` |
//! | `VoteCast` | `cast_vote*` |
//! | `ProposalExtended` | late-quorum guard |
//! | `ProposalQueued` / `ProposalExecuted` / `ProposalCanceled` | execution gateway |
//! | `ConfigUpdated` | owner setters |
//! | `Paused` / `Unpaused` / `OwnershipTransferred` | safety gate |

use crate::domain::{Address, Call, ConfigField, ProposalId, Timepoint, VoteType, Weight};
use serde::{Deserialize, Serialize};

/// Event emitted by the governor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GovernanceEvent {
    /// New proposal stored.
    ProposalCreated {
        /// Proposal id.
        id: ProposalId,
        /// Submitter.
        proposer: Address,
        /// Calls to run on execution.
        calls: Vec<Call>,
        /// Snapshot timepoint.
        snapshot: Timepoint,
        /// Exclusive end of the voting window.
        vote_end: Timepoint,
        /// Full description text.
        description: String,
    },
    /// Vote counted.
    VoteCast {
        /// Voter.
        voter: Address,
        /// Proposal id.
        id: ProposalId,
        /// Direction.
        support: VoteType,
        /// Snapshot weight counted.
        weight: Weight,
        /// Free-text reason, empty when none was given.
        reason: String,
    },
    /// Late-quorum extension moved the deadline.
    ProposalExtended {
        /// Proposal id.
        id: ProposalId,
        /// New exclusive end of the voting window.
        vote_end: Timepoint,
    },
    /// Owner changed a parameter.
    ConfigUpdated {
        /// Parameter.
        field: ConfigField,
        /// Previous value.
        old: u64,
        /// New value.
        new: u64,
    },
    /// Proposal registered with the execution queue.
    ProposalQueued {
        /// Proposal id.
        id: ProposalId,
        /// Earliest execution time.
        eta: Timepoint,
    },
    /// Proposal executed.
    ProposalExecuted {
        /// Proposal id.
        id: ProposalId,
    },
    /// Proposal canceled.
    ProposalCanceled {
        /// Proposal id.
        id: ProposalId,
    },
    /// Governor paused.
    Paused {
        /// Account that paused.
        by: Address,
    },
    /// Governor unpaused.
    Unpaused {
        /// Account that unpaused.
        by: Address,
    },
    /// Owner role moved.
    OwnershipTransferred {
        /// Previous owner.
        previous: Address,
        /// New owner.
        new: Address,
    },
}

impl GovernanceEvent {
    /// Topic name of this event.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::ProposalCreated { .. } => topics::PROPOSAL_CREATED,
            Self::VoteCast { .. } => topics::VOTE_CAST,
            Self::ProposalExtended { .. } => topics::PROPOSAL_EXTENDED,
            Self::ConfigUpdated { .. } => topics::CONFIG_UPDATED,
            Self::ProposalQueued { .. } => topics::PROPOSAL_QUEUED,
            Self::ProposalExecuted { .. } => topics::PROPOSAL_EXECUTED,
            Self::ProposalCanceled { .. } => topics::PROPOSAL_CANCELED,
            Self::Paused { .. } => topics::PAUSED,
            Self::Unpaused { .. } => topics::UNPAUSED,
            Self::OwnershipTransferred { .. } => topics::OWNERSHIP_TRANSFERRED,
        }
    }

    /// Proposal this event refers to, if any.
    #[must_use]
    pub fn proposal_id(&self) -> Option<ProposalId> {
        match self {
            Self::ProposalCreated { id, .. }
            | Self::VoteCast { id, .. }
            | Self::ProposalExtended { id, .. }
            | Self::ProposalQueued { id, .. }
            | Self::ProposalExecuted { id }
            | Self::ProposalCanceled { id } => Some(*id),
            _ => None,
        }
    }
}

/// Event topic names.
pub mod topics {
    /// Proposal created.
    pub const PROPOSAL_CREATED: &str = "governance.proposal_created";
    /// Vote cast.
    pub const VOTE_CAST: &str = "governance.vote_cast";
    /// Deadline extended.
    pub const PROPOSAL_EXTENDED: &str = "governance.proposal_extended";
    /// Parameter changed.
    pub const CONFIG_UPDATED: &str = "governance.config_updated";
    /// Proposal queued.
    pub const PROPOSAL_QUEUED: &str = "governance.proposal_queued";
    /// Proposal executed.
    pub const PROPOSAL_EXECUTED: &str = "governance.proposal_executed";
    /// Proposal canceled.
    pub const PROPOSAL_CANCELED: &str = "governance.proposal_canceled";
    /// Governor paused.
    pub const PAUSED: &str = "governance.paused";
    /// Governor unpaused.
    pub const UNPAUSED: &str = "governance.unpaused";
    /// Owner changed.
    pub const OWNERSHIP_TRANSFERRED: &str = "governance.ownership_transferred";
}
