//! # Safety Gate
//!
//! Pause switch, owner gate and the re-entry guard.
//!
//! The re-entry guard wraps a `ReentrantMutex`: a second thread blocks until
//! the in-flight call finishes, while a nested call on the same thread (for
//! example from a call target run during `execute`) sees the in-flight flag
//! and is rejected.
//!
//! Nesting is detected per thread only. A call target that hands a mutating
//! governor call to another thread and waits for it deadlocks instead of
//! failing with `ReentrantCall`; `CallExecutor` implementations must invoke
//! the governor, if at all, from the calling thread.

use super::errors::GovernanceError;
use super::value_objects::Address;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::Cell;

/// Serialization point for mutating requests.
#[derive(Debug, Default)]
pub struct SafetyGate {
    in_flight: ReentrantMutex<Cell<bool>>,
}

/// Held for the duration of one mutating request.
#[must_use = "the request is only guarded while the token is alive"]
pub struct GateToken<'a> {
    guard: ReentrantMutexGuard<'a, Cell<bool>>,
}

impl Drop for GateToken<'_> {
    fn drop(&mut self) {
        self.guard.set(false);
    }
}

impl SafetyGate {
    /// Creates an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the gate, blocking while another thread holds it.
    pub fn enter(&self) -> Result<GateToken<'_>, GovernanceError> {
        let guard = self.in_flight.lock();
        if guard.get() {
            return Err(GovernanceError::ReentrantCall);
        }
        guard.set(true);
        Ok(GateToken { guard })
    }
}

/// Fails with `Unauthorized` unless `caller` is `owner`.
pub fn ensure_owner(owner: &Address, caller: &Address) -> Result<(), GovernanceError> {
    if owner == caller {
        Ok(())
    } else {
        Err(GovernanceError::Unauthorized { caller: *caller })
    }
}

/// Fails with `PausedOperation` while paused.
pub fn ensure_not_paused(paused: bool) -> Result<(), GovernanceError> {
    if paused {
        Err(GovernanceError::PausedOperation)
    } else {
        Ok(())
    }
}
