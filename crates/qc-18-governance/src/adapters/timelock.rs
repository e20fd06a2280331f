//! # In-Memory Timelock
//!
//! Reference execution-delay queue. An operation becomes ready at its eta
//! and stays executable for `grace_period`; after that it is expired.
//!
//! Calls are dispatched to an optional [`CallExecutor`] with no lock held,
//! so a call target may read back into the timelock or the governor. The
//! operation is only marked done once every call succeeded.

use crate::domain::{keccak256, Call, GovernanceError, OperationHandle, ProposalId, Timepoint};
use crate::ports::{ExecutionQueue, TimeSource};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default execution window after the eta (14 days).
pub const DEFAULT_GRACE_PERIOD: u64 = 14 * 86_400;

/// Runs the calls of an executed operation.
///
/// Runs on the thread that called `execute`. Governor calls made from here
/// must stay on that thread: mutating ones are rejected with
/// `ReentrantCall`, but the same call issued from a joined worker thread
/// waits on the gate forever.
pub trait CallExecutor: Send + Sync {
    /// Executes one call. An error aborts the operation.
    fn execute(&self, call: &Call) -> Result<(), GovernanceError>;
}

/// Lifecycle of a scheduled operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStatus {
    /// Waiting for its eta, or inside the execution window.
    Pending,
    /// Ran successfully.
    Done,
    /// Dropped before running.
    Canceled,
}

/// Scheduled operation.
#[derive(Clone, Debug)]
pub struct Operation {
    /// Proposal the operation belongs to.
    pub proposal_id: ProposalId,
    /// Calls to run.
    pub calls: Vec<Call>,
    /// Earliest execution time.
    pub eta: Timepoint,
    /// Current status.
    pub status: OperationStatus,
}

/// Execution-delay queue kept in memory.
pub struct InMemoryTimelock {
    min_delay: u64,
    grace_period: u64,
    clock: Arc<dyn TimeSource>,
    operations: RwLock<HashMap<OperationHandle, Operation>>,
    executor: RwLock<Option<Arc<dyn CallExecutor>>>,
    executed: RwLock<Vec<Call>>,
}

impl InMemoryTimelock {
    /// Creates a timelock with the default grace period.
    pub fn new(min_delay: u64, clock: Arc<dyn TimeSource>) -> Self {
        Self::with_grace_period(min_delay, DEFAULT_GRACE_PERIOD, clock)
    }

    /// Creates a timelock with an explicit grace period.
    pub fn with_grace_period(min_delay: u64, grace_period: u64, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            min_delay,
            grace_period,
            clock,
            operations: RwLock::new(HashMap::new()),
            executor: RwLock::new(None),
            executed: RwLock::new(Vec::new()),
        }
    }

    /// Installs the executor that runs calls.
    pub fn set_executor(&self, executor: Arc<dyn CallExecutor>) {
        *self.executor.write() = Some(executor);
    }

    /// Grace period after the eta.
    #[must_use]
    pub fn grace_period(&self) -> u64 {
        self.grace_period
    }

    /// Snapshot of an operation.
    #[must_use]
    pub fn operation(&self, handle: &OperationHandle) -> Option<Operation> {
        self.operations.read().get(handle).cloned()
    }

    /// Calls run so far, in order.
    #[must_use]
    pub fn executed_calls(&self) -> Vec<Call> {
        self.executed.read().clone()
    }

    fn handle_for(proposal_id: &ProposalId, eta: Timepoint) -> OperationHandle {
        let mut preimage = Vec::with_capacity(40);
        preimage.extend_from_slice(proposal_id.as_bytes());
        preimage.extend_from_slice(&eta.to_be_bytes());
        OperationHandle(keccak256(&preimage))
    }

    fn with_operation<T>(
        &self,
        handle: &OperationHandle,
        f: impl FnOnce(&Operation) -> T,
    ) -> Result<T, GovernanceError> {
        self.operations
            .read()
            .get(handle)
            .map(f)
            .ok_or_else(|| GovernanceError::ExecutionQueue(format!("unknown operation {handle:?}")))
    }

    fn window(&self, op: &Operation) -> (bool, bool) {
        let now = self.clock.now();
        let end = op.eta.saturating_add(self.grace_period);
        let pending = op.status == OperationStatus::Pending;
        (pending && now >= op.eta && now < end, pending && now >= end)
    }
}

impl ExecutionQueue for InMemoryTimelock {
    fn minimum_delay(&self) -> u64 {
        self.min_delay
    }

    fn schedule(
        &self,
        proposal_id: &ProposalId,
        calls: &[Call],
        eta: Timepoint,
    ) -> Result<OperationHandle, GovernanceError> {
        let earliest = self.clock.now().saturating_add(self.min_delay);
        if eta < earliest {
            return Err(GovernanceError::ExecutionQueue(format!(
                "eta {eta} before minimum delay ({earliest})"
            )));
        }

        let handle = Self::handle_for(proposal_id, eta);
        let mut operations = self.operations.write();
        if operations.contains_key(&handle) {
            return Err(GovernanceError::ExecutionQueue(format!(
                "operation {handle:?} already scheduled"
            )));
        }
        operations.insert(
            handle,
            Operation {
                proposal_id: *proposal_id,
                calls: calls.to_vec(),
                eta,
                status: OperationStatus::Pending,
            },
        );
        debug!(proposal_id = %proposal_id, eta, "Operation scheduled");
        Ok(handle)
    }

    fn run(&self, handle: &OperationHandle) -> Result<(), GovernanceError> {
        let calls = {
            let operations = self.operations.read();
            let op = operations.get(handle).ok_or_else(|| {
                GovernanceError::ExecutionQueue(format!("unknown operation {handle:?}"))
            })?;
            if !self.window(op).0 {
                return Err(GovernanceError::ExecutionQueue(format!(
                    "operation {handle:?} not ready"
                )));
            }
            op.calls.clone()
        };

        let executor = self.executor.read().clone();
        for call in &calls {
            if let Some(executor) = &executor {
                if let Err(e) = executor.execute(call) {
                    warn!(target_address = %call.target, error = %e, "Call reverted");
                    return Err(e);
                }
            }
        }

        let mut operations = self.operations.write();
        match operations.get_mut(handle) {
            Some(op) if op.status == OperationStatus::Pending => op.status = OperationStatus::Done,
            _ => {
                return Err(GovernanceError::ExecutionQueue(format!(
                    "operation {handle:?} changed during execution"
                )))
            }
        }
        drop(operations);
        self.executed.write().extend(calls);
        info!(handle = ?handle, "Operation executed");
        Ok(())
    }

    fn cancel(&self, handle: &OperationHandle) -> Result<(), GovernanceError> {
        let mut operations = self.operations.write();
        match operations.get_mut(handle) {
            Some(op) if op.status == OperationStatus::Pending => {
                op.status = OperationStatus::Canceled;
                debug!(handle = ?handle, "Operation canceled");
                Ok(())
            }
            Some(op) => Err(GovernanceError::ExecutionQueue(format!(
                "operation {handle:?} is {:?}",
                op.status
            ))),
            None => Err(GovernanceError::ExecutionQueue(format!(
                "unknown operation {handle:?}"
            ))),
        }
    }

    fn is_ready(&self, handle: &OperationHandle) -> Result<bool, GovernanceError> {
        self.with_operation(handle, |op| self.window(op).0)
    }

    fn is_done(&self, handle: &OperationHandle) -> Result<bool, GovernanceError> {
        self.with_operation(handle, |op| op.status == OperationStatus::Done)
    }

    fn is_expired(&self, handle: &OperationHandle) -> Result<bool, GovernanceError> {
        self.with_operation(handle, |op| self.window(op).1)
    }
}
