//! # Outbound Ports
//!
//! Collaborators the governor depends on. Reference implementations live in
//! `crate::adapters`.

use crate::domain::{
    Address, Call, EcdsaSignature, GovernanceError, OperationHandle, ProposalId, Timepoint, Weight,
};
use crate::events::GovernanceEvent;

/// Historical voting-power ledger.
///
/// Lookups at a timepoint must be stable: once `timepoint` has passed, the
/// answer never changes.
pub trait VotingPowerOracle: Send + Sync {
    /// Power held by `account` at `timepoint`.
    fn power_at(&self, account: &Address, timepoint: Timepoint) -> Result<Weight, GovernanceError>;

    /// Total supply at `timepoint`.
    fn supply_at(&self, timepoint: Timepoint) -> Result<Weight, GovernanceError>;

    /// Power held by `account` right now.
    fn current_power(&self, account: &Address) -> Result<Weight, GovernanceError>;
}

/// Execution-delay queue (timelock).
pub trait ExecutionQueue: Send + Sync {
    /// Minimum delay between scheduling and execution.
    fn minimum_delay(&self) -> u64;

    /// Registers `calls` for execution no earlier than `eta`.
    fn schedule(
        &self,
        proposal_id: &ProposalId,
        calls: &[Call],
        eta: Timepoint,
    ) -> Result<OperationHandle, GovernanceError>;

    /// Runs a ready operation.
    fn run(&self, handle: &OperationHandle) -> Result<(), GovernanceError>;

    /// Drops a pending operation.
    fn cancel(&self, handle: &OperationHandle) -> Result<(), GovernanceError>;

    /// True once the delay has elapsed and the operation is still pending.
    fn is_ready(&self, handle: &OperationHandle) -> Result<bool, GovernanceError>;

    /// True once the operation ran.
    fn is_done(&self, handle: &OperationHandle) -> Result<bool, GovernanceError>;

    /// True once the execution window passed without a run.
    fn is_expired(&self, handle: &OperationHandle) -> Result<bool, GovernanceError>;
}

/// Recovers the signer of a 32-byte digest.
pub trait SignatureRecovery: Send + Sync {
    /// Signer address, or `InvalidSignature`.
    fn recover(
        &self,
        digest: &[u8; 32],
        signature: &EcdsaSignature,
    ) -> Result<Address, GovernanceError>;
}

/// Time source abstraction for testability.
pub trait TimeSource: Send + Sync {
    /// Current timepoint.
    fn now(&self) -> Timepoint;
}

/// Wall-clock time source in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timepoint {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Receives committed governance events.
pub trait EventSink: Send + Sync {
    /// Publishes one event.
    fn publish(&self, event: &GovernanceEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn publish(&self, _event: &GovernanceEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source() {
        // After Jan 1, 2020
        assert!(SystemTimeSource.now() > 1_577_836_800);
    }
}
