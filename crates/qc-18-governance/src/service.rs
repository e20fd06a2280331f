//! # Governor Service
//!
//! Coordinating facade that owns one instance of every governance component
//! and calls them in a fixed order per request.
//!
//! ## Request Pipeline
//!
//! ```text
//! propose:  gate -> pause -> call bundle -> oracle threshold -> proposal store
//! vote:     gate -> pause -> state(Active) -> oracle weight -> tally -> late quorum
//! queue:    gate -> pause -> state(Succeeded) -> queue.schedule -> store handle
//! execute:  gate -> pause -> state(Queued) -> queue.is_ready -> queue.run
//! ```
//!
//! ## Atomicity
//!
//! Every precondition is checked and every collaborator call is made before
//! engine state is written; the commit is a single write-locked section. No
//! engine lock is held while a collaborator runs, so a call target invoked
//! by `execute` can read the governor, while any mutating call it attempts
//! is rejected with `ReentrantCall`.
//!
//! Owner operations (setters, pause, ownership) are not re-entry guarded, so
//! an executed proposal may reach them through an owner-held executor.

use crate::adapters::Secp256k1Recovery;
use crate::domain::{
    derive_state, ensure_not_paused, ensure_owner, hash_description, hash_proposal,
    invariant_call_bundle, invariant_deadline_monotonic, invariant_threshold_met, is_successful,
    quorum_reached, quorum_required, require_state, Address, BallotDomain, ConfigBounds,
    ConfigChange, ConfigField, ConfigStore, EcdsaSignature, ExtensionOutcome, GovernanceConfig,
    GovernanceError, LateQuorumGuard, OperationHandle, Proposal, ProposalId, ProposalParams,
    ProposalState, ProposalStore, ProposalVote, QueueStatus, SafetyGate, Timepoint, VoteTally,
    VoteType, Weight, U256,
};
use crate::events::GovernanceEvent;
use crate::ports::{
    EventSink, ExecutionQueue, GovernanceApi, NoopEventSink, SignatureRecovery, TimeSource,
    VotingPowerOracle,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Governor deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Initial owner (setters, pause, owner cancel).
    pub owner: Address,
    /// Parameter bounds.
    pub bounds: ConfigBounds,
    /// Initial parameters.
    pub initial: GovernanceConfig,
    /// Ballot signing domain.
    pub domain: BallotDomain,
}

impl ServiceConfig {
    /// Default bounds, parameters and domain for `owner`.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            bounds: ConfigBounds::default(),
            initial: GovernanceConfig::default(),
            domain: BallotDomain::default(),
        }
    }
}

/// Aggregate governance statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GovernanceStats {
    /// Proposals created.
    pub proposals_created: u64,
    /// Votes counted (including zero-weight votes).
    pub votes_cast: u64,
    /// Sum of counted weights.
    pub total_weight_cast: u128,
    /// Votes cast through a signed ballot.
    pub votes_by_signature: u64,
    /// Deadlines moved by the late-quorum guard.
    pub proposals_extended: u64,
    /// Proposals handed to the execution queue.
    pub proposals_queued: u64,
    /// Proposals executed.
    pub proposals_executed: u64,
    /// Proposals canceled.
    pub proposals_canceled: u64,
    /// Committed parameter changes.
    pub config_updates: u64,
    /// Requests that failed.
    pub rejected_requests: u64,
}

struct GovernorState {
    config: ConfigStore,
    proposals: ProposalStore,
    tally: VoteTally,
    owner: Address,
    paused: bool,
    stats: GovernanceStats,
}

/// Consistent copy of everything needed to derive a proposal's state.
struct ProposalView {
    proposal: Proposal,
    votes: ProposalVote,
    quorum_numerator: u64,
    quorum_denominator: u64,
}

/// The governance engine.
///
/// Generic over the voting-power oracle and the execution queue so callers
/// keep typed handles to both (e.g. to mint tokens or install an executor).
pub struct GovernorService<O: VotingPowerOracle, Q: ExecutionQueue> {
    oracle: Arc<O>,
    queue: Arc<Q>,
    signatures: Arc<dyn SignatureRecovery>,
    clock: Arc<dyn TimeSource>,
    events: Arc<dyn EventSink>,
    domain: BallotDomain,
    state: RwLock<GovernorState>,
    gate: SafetyGate,
    late_quorum: LateQuorumGuard,
}

impl<O: VotingPowerOracle, Q: ExecutionQueue> GovernorService<O, Q> {
    /// Creates a governor. Fails if the bounds or initial parameters are invalid.
    pub fn new(
        config: ServiceConfig,
        oracle: Arc<O>,
        queue: Arc<Q>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, GovernanceError> {
        let store = ConfigStore::new(config.bounds, config.initial, clock.now())?;
        info!(owner = %config.owner, "Governor initialized");
        Ok(Self {
            oracle,
            queue,
            signatures: Arc::new(Secp256k1Recovery::new()),
            clock,
            events: Arc::new(NoopEventSink),
            domain: config.domain,
            state: RwLock::new(GovernorState {
                config: store,
                proposals: ProposalStore::new(),
                tally: VoteTally::new(),
                owner: config.owner,
                paused: false,
                stats: GovernanceStats::default(),
            }),
            gate: SafetyGate::new(),
            late_quorum: LateQuorumGuard::new(),
        })
    }

    /// Replaces the signature-recovery collaborator.
    #[must_use]
    pub fn with_signature_recovery(mut self, signatures: Arc<dyn SignatureRecovery>) -> Self {
        self.signatures = signatures;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    // =========================================================================
    // READ VIEWS
    // =========================================================================

    /// Parameter bounds.
    pub fn bounds(&self) -> ConfigBounds {
        self.state.read().config.bounds().clone()
    }

    /// Snapshot timepoint of a proposal.
    pub fn proposal_snapshot(&self, id: ProposalId) -> Result<Timepoint, GovernanceError> {
        Ok(self.state.read().proposals.get(&id)?.snapshot)
    }

    /// Last timepoint at which votes are accepted.
    pub fn proposal_deadline(&self, id: ProposalId) -> Result<Timepoint, GovernanceError> {
        Ok(self.state.read().proposals.get(&id)?.deadline())
    }

    /// Execution eta, once queued.
    pub fn proposal_eta(&self, id: ProposalId) -> Result<Option<Timepoint>, GovernanceError> {
        Ok(self.state.read().proposals.get(&id)?.eta)
    }

    /// Proposal ids in creation order.
    pub fn proposal_ids(&self) -> Vec<ProposalId> {
        self.state.read().proposals.ids().to_vec()
    }

    /// Power of `account` at `timepoint` (oracle pass-through).
    pub fn get_votes(&self, account: Address, timepoint: Timepoint) -> Result<Weight, GovernanceError> {
        self.oracle.power_at(&account, timepoint)
    }

    /// Current power of `account` (oracle pass-through).
    pub fn current_votes(&self, account: Address) -> Result<Weight, GovernanceError> {
        self.oracle.current_power(&account)
    }

    /// Aggregate statistics.
    pub fn stats(&self) -> GovernanceStats {
        self.state.read().stats.clone()
    }

    /// True if every parameter lies within its bound.
    pub fn is_config_valid(&self) -> bool {
        self.state.read().config.is_valid()
    }

    /// True while paused.
    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.state.read().owner
    }

    /// Quorum numerator in force at `timepoint`.
    pub fn quorum_numerator_at(&self, timepoint: Timepoint) -> u64 {
        self.state.read().config.quorum_numerator_at(timepoint)
    }

    /// Proposal id for the given contents.
    pub fn hash_proposal(
        &self,
        targets: &[Address],
        values: &[U256],
        calldatas: &[Vec<u8>],
        description_hash: &[u8; 32],
    ) -> ProposalId {
        hash_proposal(targets, values, calldatas, description_hash)
    }

    /// Digest a voter signs for `cast_vote_by_sig`.
    pub fn ballot_digest(&self, id: ProposalId, support: VoteType) -> [u8; 32] {
        self.domain.ballot_digest(&id, support)
    }

    /// Ballot signing domain.
    pub fn domain(&self) -> &BallotDomain {
        &self.domain
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn view(&self, id: &ProposalId) -> Result<ProposalView, GovernanceError> {
        let state = self.state.read();
        let proposal = state.proposals.get(id)?.clone();
        Ok(ProposalView {
            votes: state.tally.get(id),
            quorum_numerator: state.config.quorum_numerator_at(proposal.snapshot),
            quorum_denominator: state.config.quorum_denominator(),
            proposal,
        })
    }

    fn required_quorum(&self, view: &ProposalView) -> Result<u128, GovernanceError> {
        let supply = self.oracle.supply_at(view.proposal.snapshot)?;
        Ok(quorum_required(
            supply,
            view.quorum_numerator,
            view.quorum_denominator,
        ))
    }

    fn queue_status(&self, handle: &OperationHandle) -> Result<QueueStatus, GovernanceError> {
        if self.queue.is_done(handle)? {
            Ok(QueueStatus::Done)
        } else if self.queue.is_expired(handle)? {
            Ok(QueueStatus::Expired)
        } else {
            Ok(QueueStatus::Scheduled)
        }
    }

    fn derive(&self, view: &ProposalView, now: Timepoint) -> Result<ProposalState, GovernanceError> {
        derive_state(
            &view.proposal,
            now,
            || Ok(is_successful(&view.votes, self.required_quorum(view)?)),
            |handle| self.queue_status(handle),
        )
    }

    fn emit(&self, event: GovernanceEvent) {
        info!(topic = event.topic(), event = ?event, "Governance event");
        self.events.publish(&event);
    }

    fn track<T>(
        &self,
        operation: &'static str,
        result: Result<T, GovernanceError>,
    ) -> Result<T, GovernanceError> {
        if let Err(e) = &result {
            warn!(operation, error = %e, "Request rejected");
            self.state.write().stats.rejected_requests += 1;
        }
        result
    }

    fn ensure_running(&self) -> Result<(), GovernanceError> {
        ensure_not_paused(self.state.read().paused)
    }

    /// Shared vote path. The caller holds the gate.
    fn count_vote(
        &self,
        voter: Address,
        id: ProposalId,
        support: VoteType,
        reason: &str,
        by_signature: bool,
    ) -> Result<Weight, GovernanceError> {
        self.ensure_running()?;
        let view = self.view(&id)?;
        let now = self.clock.now();
        let current = self.derive(&view, now)?;
        require_state(&view.proposal, current, &[ProposalState::Active], "vote")?;
        if self.state.read().tally.has_voted(&id, &voter) {
            return Err(GovernanceError::AlreadyVoted { id, voter });
        }

        let weight = self.oracle.power_at(&voter, view.proposal.snapshot)?;
        let required = self.required_quorum(&view)?;
        let reached_before = quorum_reached(&view.votes, required);

        let outcome = {
            let mut guard = self.state.write();
            let state = &mut *guard;
            let extension = state.config.current().late_quorum_extension;
            let reached_after = quorum_reached(&state.tally.record(id, voter, support, weight)?, required);
            let proposal = state.proposals.get_mut(&id)?;
            let old_vote_end = proposal.vote_end;
            let outcome =
                self.late_quorum
                    .on_vote(proposal, reached_before, reached_after, now, extension);
            debug_assert!(invariant_deadline_monotonic(old_vote_end, proposal.vote_end));

            state.stats.votes_cast += 1;
            if by_signature {
                state.stats.votes_by_signature += 1;
            }
            state.stats.total_weight_cast += u128::from(weight);
            if matches!(outcome, ExtensionOutcome::Extended { .. }) {
                state.stats.proposals_extended += 1;
            }
            outcome
        };

        self.emit(GovernanceEvent::VoteCast {
            voter,
            id,
            support,
            weight,
            reason: reason.to_string(),
        });
        match outcome {
            ExtensionOutcome::Extended { new_vote_end, .. } => {
                info!(proposal_id = %id, vote_end = new_vote_end, "Late quorum: deadline extended");
                self.emit(GovernanceEvent::ProposalExtended {
                    id,
                    vote_end: new_vote_end,
                });
            }
            ExtensionOutcome::QuorumReached => {
                debug!(proposal_id = %id, "Quorum reached");
            }
            ExtensionOutcome::Unchanged => {}
        }
        Ok(weight)
    }

    fn set_parameter(
        &self,
        caller: Address,
        field: ConfigField,
        value: u64,
    ) -> Result<(), GovernanceError> {
        let result = (|| -> Result<ConfigChange, GovernanceError> {
            let now = self.clock.now();
            let mut state = self.state.write();
            ensure_owner(&state.owner, &caller)?;
            let change = state.config.set(field, value, now)?;
            state.stats.config_updates += 1;
            Ok(change)
        })();
        let change = self.track("set_parameter", result)?;
        self.emit(GovernanceEvent::ConfigUpdated {
            field: change.field,
            old: change.old,
            new: change.new,
        });
        Ok(())
    }

    fn set_paused(&self, caller: Address, paused: bool) -> Result<(), GovernanceError> {
        let result = (|| -> Result<(), GovernanceError> {
            let mut state = self.state.write();
            ensure_owner(&state.owner, &caller)?;
            if state.paused == paused {
                return Err(GovernanceError::InvalidPauseState {
                    paused: state.paused,
                });
            }
            state.paused = paused;
            Ok(())
        })();
        self.track(if paused { "pause" } else { "unpause" }, result)?;
        self.emit(if paused {
            GovernanceEvent::Paused { by: caller }
        } else {
            GovernanceEvent::Unpaused { by: caller }
        });
        Ok(())
    }
}

impl<O: VotingPowerOracle, Q: ExecutionQueue> GovernanceApi for GovernorService<O, Q> {
    #[instrument(skip(self, targets, values, calldatas, description), fields(proposer = %caller))]
    fn propose(
        &self,
        caller: Address,
        targets: Vec<Address>,
        values: Vec<U256>,
        calldatas: Vec<Vec<u8>>,
        description: &str,
    ) -> Result<ProposalId, GovernanceError> {
        let result = (|| -> Result<Proposal, GovernanceError> {
            let _token = self.gate.enter()?;
            self.ensure_running()?;
            let calls = invariant_call_bundle(&targets, &values, &calldatas)?;
            let description_hash = hash_description(description);
            let id = hash_proposal(&targets, &values, &calldatas, &description_hash);

            let config = {
                let state = self.state.read();
                if state.proposals.contains(&id) {
                    return Err(GovernanceError::ProposalAlreadyExists(id));
                }
                state.config.current().clone()
            };

            let power = self.oracle.current_power(&caller)?;
            invariant_threshold_met(caller, power, config.proposal_threshold)?;

            let proposal = Proposal::new(ProposalParams {
                id,
                proposer: caller,
                calls,
                description_hash,
                now: self.clock.now(),
                voting_delay: config.voting_delay,
                voting_period: config.voting_period,
            });
            let created = proposal.clone();
            {
                let mut state = self.state.write();
                state.proposals.insert(proposal)?;
                state.stats.proposals_created += 1;
            }
            Ok(created)
        })();
        let proposal = self.track("propose", result)?;

        info!(
            proposal_id = %proposal.id,
            snapshot = proposal.snapshot,
            vote_end = proposal.vote_end,
            calls = proposal.calls.len(),
            "Proposal created"
        );
        let id = proposal.id;
        self.emit(GovernanceEvent::ProposalCreated {
            id,
            proposer: proposal.proposer,
            calls: proposal.calls,
            snapshot: proposal.snapshot,
            vote_end: proposal.vote_end,
            description: description.to_string(),
        });
        Ok(id)
    }

    #[instrument(skip(self), fields(voter = %caller, proposal_id = %id))]
    fn cast_vote(
        &self,
        caller: Address,
        id: ProposalId,
        support: VoteType,
    ) -> Result<Weight, GovernanceError> {
        self.cast_vote_with_reason(caller, id, support, "")
    }

    #[instrument(skip(self, reason), fields(voter = %caller, proposal_id = %id))]
    fn cast_vote_with_reason(
        &self,
        caller: Address,
        id: ProposalId,
        support: VoteType,
        reason: &str,
    ) -> Result<Weight, GovernanceError> {
        let result = self
            .gate
            .enter()
            .and_then(|_token| self.count_vote(caller, id, support, reason, false));
        self.track("cast_vote", result)
    }

    #[instrument(skip(self, signature), fields(proposal_id = %id))]
    fn cast_vote_by_sig(
        &self,
        id: ProposalId,
        support: VoteType,
        signature: &EcdsaSignature,
    ) -> Result<Weight, GovernanceError> {
        let result = (|| -> Result<Weight, GovernanceError> {
            let _token = self.gate.enter()?;
            self.ensure_running()?;
            let digest = self.domain.ballot_digest(&id, support);
            let voter = self.signatures.recover(&digest, signature)?;
            debug!(voter = %voter, "Ballot signer recovered");
            self.count_vote(voter, id, support, "", true)
        })();
        self.track("cast_vote_by_sig", result)
    }

    #[instrument(skip(self), fields(proposal_id = %id))]
    fn queue(&self, caller: Address, id: ProposalId) -> Result<Timepoint, GovernanceError> {
        let result = (|| -> Result<Timepoint, GovernanceError> {
            let _token = self.gate.enter()?;
            self.ensure_running()?;
            let view = self.view(&id)?;
            if view.proposal.execution_handle.is_some() {
                return Err(GovernanceError::AlreadyQueued(id));
            }
            let now = self.clock.now();
            let current = self.derive(&view, now)?;
            require_state(&view.proposal, current, &[ProposalState::Succeeded], "queue")?;

            let eta = now.saturating_add(self.queue.minimum_delay());
            let handle = self.queue.schedule(&id, &view.proposal.calls, eta)?;

            let mut state = self.state.write();
            let proposal = state.proposals.get_mut(&id)?;
            proposal.execution_handle = Some(handle);
            proposal.eta = Some(eta);
            state.stats.proposals_queued += 1;
            Ok(eta)
        })();
        let eta = self.track("queue", result)?;
        self.emit(GovernanceEvent::ProposalQueued { id, eta });
        Ok(eta)
    }

    #[instrument(skip(self), fields(proposal_id = %id))]
    fn execute(&self, caller: Address, id: ProposalId) -> Result<(), GovernanceError> {
        let result = (|| -> Result<(), GovernanceError> {
            let _token = self.gate.enter()?;
            self.ensure_running()?;
            let view = self.view(&id)?;
            let current = self.derive(&view, self.clock.now())?;
            require_state(&view.proposal, current, &[ProposalState::Queued], "execute")?;

            let handle = view
                .proposal
                .execution_handle
                .ok_or(GovernanceError::InvalidProposalState {
                    id,
                    current,
                    operation: "execute",
                })?;
            if !self.queue.is_ready(&handle)? {
                return Err(GovernanceError::OperationNotReady(id));
            }

            self.queue.run(&handle)?;
            self.state.write().stats.proposals_executed += 1;
            Ok(())
        })();
        self.track("execute", result)?;
        self.emit(GovernanceEvent::ProposalExecuted { id });
        Ok(())
    }

    #[instrument(skip(self), fields(proposal_id = %id))]
    fn cancel(&self, caller: Address, id: ProposalId) -> Result<(), GovernanceError> {
        let result = (|| -> Result<(), GovernanceError> {
            let _token = self.gate.enter()?;
            self.ensure_running()?;
            let view = self.view(&id)?;
            let owner = self.state.read().owner;

            let is_owner = caller == owner;
            if !is_owner && caller != view.proposal.proposer {
                return Err(GovernanceError::Unauthorized { caller });
            }

            // Owner: any live state. Proposer: until voting closes.
            let current = self.derive(&view, self.clock.now())?;
            let cancelable = if is_owner {
                !current.is_terminal()
            } else {
                matches!(current, ProposalState::Pending | ProposalState::Active)
            };
            if !cancelable {
                return Err(GovernanceError::InvalidProposalState {
                    id,
                    current,
                    operation: "cancel",
                });
            }

            if current == ProposalState::Queued {
                if let Some(handle) = &view.proposal.execution_handle {
                    self.queue.cancel(handle)?;
                }
            }

            let mut state = self.state.write();
            state.proposals.get_mut(&id)?.canceled = true;
            state.stats.proposals_canceled += 1;
            Ok(())
        })();
        self.track("cancel", result)?;
        self.emit(GovernanceEvent::ProposalCanceled { id });
        Ok(())
    }

    fn set_voting_delay(&self, caller: Address, value: u64) -> Result<(), GovernanceError> {
        self.set_parameter(caller, ConfigField::VotingDelay, value)
    }

    fn set_voting_period(&self, caller: Address, value: u64) -> Result<(), GovernanceError> {
        self.set_parameter(caller, ConfigField::VotingPeriod, value)
    }

    fn set_proposal_threshold(
        &self,
        caller: Address,
        value: Weight,
    ) -> Result<(), GovernanceError> {
        self.set_parameter(caller, ConfigField::ProposalThreshold, value)
    }

    fn set_quorum_numerator(&self, caller: Address, value: u64) -> Result<(), GovernanceError> {
        self.set_parameter(caller, ConfigField::QuorumNumerator, value)
    }

    fn set_late_quorum_extension(
        &self,
        caller: Address,
        value: u64,
    ) -> Result<(), GovernanceError> {
        self.set_parameter(caller, ConfigField::LateQuorumExtension, value)
    }

    #[instrument(skip(self))]
    fn pause(&self, caller: Address) -> Result<(), GovernanceError> {
        self.set_paused(caller, true)
    }

    #[instrument(skip(self))]
    fn unpause(&self, caller: Address) -> Result<(), GovernanceError> {
        self.set_paused(caller, false)
    }

    #[instrument(skip(self))]
    fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), GovernanceError> {
        let result = (|| -> Result<Address, GovernanceError> {
            let mut state = self.state.write();
            ensure_owner(&state.owner, &caller)?;
            let previous = state.owner;
            state.owner = new_owner;
            Ok(previous)
        })();
        let previous = self.track("transfer_ownership", result)?;
        self.emit(GovernanceEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        Ok(())
    }

    fn config(&self) -> GovernanceConfig {
        self.state.read().config.current().clone()
    }

    fn state(&self, id: ProposalId) -> Result<ProposalState, GovernanceError> {
        let view = self.view(&id)?;
        self.derive(&view, self.clock.now())
    }

    fn proposal(&self, id: ProposalId) -> Result<Proposal, GovernanceError> {
        Ok(self.state.read().proposals.get(&id)?.clone())
    }

    fn proposal_votes(&self, id: ProposalId) -> Result<ProposalVote, GovernanceError> {
        let state = self.state.read();
        state.proposals.get(&id)?;
        Ok(state.tally.get(&id))
    }

    fn has_voted(&self, id: ProposalId, account: Address) -> bool {
        self.state.read().tally.has_voted(&id, &account)
    }

    fn quorum(&self, timepoint: Timepoint) -> Result<u128, GovernanceError> {
        let (numerator, denominator) = {
            let state = self.state.read();
            (
                state.config.quorum_numerator_at(timepoint),
                state.config.quorum_denominator(),
            )
        };
        let supply = self.oracle.supply_at(timepoint)?;
        Ok(quorum_required(supply, numerator, denominator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventLog, InMemoryTimelock, ManualTimeSource, NftVotesLedger};

    const OWNER: Address = Address::new([0xEE; 20]);
    const ALICE: Address = Address::new([0xA1; 20]);

    struct Harness {
        clock: Arc<ManualTimeSource>,
        ledger: Arc<NftVotesLedger>,
        log: Arc<InMemoryEventLog>,
        governor: GovernorService<NftVotesLedger, InMemoryTimelock>,
    }

    fn harness() -> Harness {
        let clock = Arc::new(ManualTimeSource::new(1_000));
        let ledger = Arc::new(NftVotesLedger::new());
        ledger.mint_batch(ALICE, 0, 20, 1).unwrap();
        let timelock = Arc::new(InMemoryTimelock::new(3_600, clock.clone()));
        let log = Arc::new(InMemoryEventLog::new());
        let config = ServiceConfig {
            initial: GovernanceConfig {
                voting_delay: 60,
                voting_period: 3_600,
                proposal_threshold: 16,
                quorum_numerator: 4,
                late_quorum_extension: 7_200,
            },
            ..ServiceConfig::new(OWNER)
        };
        let governor = GovernorService::new(config, ledger.clone(), timelock, clock.clone())
            .unwrap()
            .with_event_sink(log.clone());
        Harness {
            clock,
            ledger,
            log,
            governor,
        }
    }

    fn propose(h: &Harness) -> ProposalId {
        h.governor
            .propose(
                ALICE,
                vec![Address::new([0x10; 20])],
                vec![U256::zero()],
                vec![vec![0xab]],
                "test proposal",
            )
            .unwrap()
    }

    #[test]
    fn test_propose_fixes_snapshot_and_window() {
        let h = harness();
        let id = propose(&h);
        let proposal = h.governor.proposal(id).unwrap();
        assert_eq!(proposal.snapshot, 1_060);
        assert_eq!(proposal.vote_start, 1_061);
        assert_eq!(proposal.vote_end, 4_661);
        assert_eq!(h.governor.proposal_deadline(id).unwrap(), 4_660);
        assert_eq!(h.governor.state(id).unwrap(), ProposalState::Pending);
        assert_eq!(h.governor.stats().proposals_created, 1);
        assert_eq!(h.log.len(), 1);
    }

    #[test]
    fn test_duplicate_proposal_rejected() {
        let h = harness();
        propose(&h);
        let err = h
            .governor
            .propose(
                ALICE,
                vec![Address::new([0x10; 20])],
                vec![U256::zero()],
                vec![vec![0xab]],
                "test proposal",
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::ProposalAlreadyExists(_)));
        assert_eq!(h.governor.stats().rejected_requests, 1);
    }

    #[test]
    fn test_vote_weight_comes_from_snapshot() {
        let h = harness();
        let id = propose(&h);
        // Tokens moved after the snapshot do not change the counted weight
        h.ledger.transfer(0, OWNER, 2_000).unwrap();
        h.clock.set(2_000);
        let weight = h.governor.cast_vote(ALICE, id, VoteType::For).unwrap();
        assert_eq!(weight, 20);
        assert_eq!(h.governor.proposal_votes(id).unwrap().for_votes, 20);
        assert!(h.governor.has_voted(id, ALICE));
    }

    #[test]
    fn test_quorum_view_uses_numerator_history() {
        let h = harness();
        assert_eq!(h.governor.quorum(1_000).unwrap(), 0); // 20 * 4 / 100
        h.clock.set(1_500);
        h.governor.set_quorum_numerator(OWNER, 50).unwrap();
        assert_eq!(h.governor.quorum(1_400).unwrap(), 0);
        assert_eq!(h.governor.quorum(1_500).unwrap(), 10);
        assert_eq!(h.governor.quorum_numerator_at(1_499), 4);
    }

    #[test]
    fn test_owner_views() {
        let h = harness();
        assert_eq!(h.governor.owner(), OWNER);
        assert!(!h.governor.is_paused());
        assert!(h.governor.is_config_valid());
        assert_eq!(h.governor.bounds(), ConfigBounds::default());
        assert_eq!(h.governor.get_votes(ALICE, 1).unwrap(), 20);
        assert_eq!(h.governor.current_votes(ALICE).unwrap(), 20);
    }
}
