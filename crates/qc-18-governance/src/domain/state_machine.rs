//! # Proposal State Machine
//!
//! The lifecycle state is a pure function of the stored record, the current
//! timepoint, the tally outcome and the queue's view of the handle.
//!
//! ```text
//! Pending ──> Active ──> Succeeded ──> Queued ──> Executed
//!    │          │    └─> Defeated         └────> Expired
//!    └──────────┴──> Canceled
//! ```
//!
//! Collaborator lookups are passed as closures and only invoked when the
//! earlier checks do not already decide the state.

use super::entities::{Proposal, ProposalState};
use super::errors::GovernanceError;
use super::value_objects::{OperationHandle, Timepoint};

/// Queue's view of a registered operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueStatus {
    /// Scheduled, not yet executed.
    Scheduled,
    /// Executed.
    Done,
    /// Window elapsed without execution.
    Expired,
}

/// Derives the state of `proposal` at `now`.
///
/// - `outcome` returns true when quorum is reached with a strict majority;
///   called only once voting has closed and nothing was queued.
/// - `queue_status` is called only when an execution handle exists.
pub fn derive_state<O, Q>(
    proposal: &Proposal,
    now: Timepoint,
    outcome: O,
    queue_status: Q,
) -> Result<ProposalState, GovernanceError>
where
    O: FnOnce() -> Result<bool, GovernanceError>,
    Q: FnOnce(&OperationHandle) -> Result<QueueStatus, GovernanceError>,
{
    if proposal.canceled {
        return Ok(ProposalState::Canceled);
    }
    if now < proposal.vote_start {
        return Ok(ProposalState::Pending);
    }
    if now < proposal.vote_end {
        return Ok(ProposalState::Active);
    }
    if let Some(handle) = &proposal.execution_handle {
        return Ok(match queue_status(handle)? {
            QueueStatus::Scheduled => ProposalState::Queued,
            QueueStatus::Done => ProposalState::Executed,
            QueueStatus::Expired => ProposalState::Expired,
        });
    }
    if outcome()? {
        Ok(ProposalState::Succeeded)
    } else {
        Ok(ProposalState::Defeated)
    }
}

/// Fails with `InvalidProposalState` unless `current` is in `allowed`.
pub fn require_state(
    proposal: &Proposal,
    current: ProposalState,
    allowed: &[ProposalState],
    operation: &'static str,
) -> Result<(), GovernanceError> {
    if allowed.contains(&current) {
        Ok(())
    } else {
        Err(GovernanceError::InvalidProposalState {
            id: proposal.id,
            current,
            operation,
        })
    }
}
