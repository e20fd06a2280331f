//! # NFT Voting-Power Ledger
//!
//! In-memory ledger of token ownership with per-account and supply
//! checkpoints. One token is one unit of voting power, held by its owner.
//!
//! Checkpoints are append-only: a mutation may not be recorded at a
//! timepoint earlier than the latest one, so historical lookups are stable.

use crate::domain::{Address, GovernanceError, Timepoint, Weight};
use crate::ports::VotingPowerOracle;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Token identifier.
pub type TokenId = u64;

#[derive(Debug, Default)]
struct Checkpoints {
    /// `(timepoint, value)`, ascending by timepoint.
    points: Vec<(Timepoint, Weight)>,
}

impl Checkpoints {
    fn latest(&self) -> Weight {
        self.points.last().map_or(0, |(_, value)| *value)
    }

    fn at(&self, timepoint: Timepoint) -> Weight {
        let idx = self.points.partition_point(|(at, _)| *at <= timepoint);
        if idx == 0 {
            0
        } else {
            self.points[idx - 1].1
        }
    }

    fn push(&mut self, timepoint: Timepoint, value: Weight) {
        match self.points.last_mut() {
            Some(last) if last.0 == timepoint => last.1 = value,
            _ => self.points.push((timepoint, value)),
        }
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    owners: HashMap<TokenId, Address>,
    balances: HashMap<Address, Checkpoints>,
    supply: Checkpoints,
    last_timepoint: Timepoint,
}

impl LedgerState {
    fn check_order(&self, at: Timepoint) -> Result<(), GovernanceError> {
        if at < self.last_timepoint {
            return Err(GovernanceError::Oracle(format!(
                "checkpoint at {at} precedes latest checkpoint {}",
                self.last_timepoint
            )));
        }
        Ok(())
    }

    fn adjust(&mut self, account: Address, at: Timepoint, delta: i64) {
        let entry = self.balances.entry(account).or_default();
        let current = entry.latest();
        let next = if delta >= 0 {
            current.saturating_add(delta.unsigned_abs())
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };
        entry.push(at, next);
    }
}

/// Checkpointed NFT ownership ledger.
#[derive(Debug, Default)]
pub struct NftVotesLedger {
    state: RwLock<LedgerState>,
}

impl NftVotesLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `token` to `to` at `at`.
    pub fn mint(&self, to: Address, token: TokenId, at: Timepoint) -> Result<(), GovernanceError> {
        let mut state = self.state.write();
        state.check_order(at)?;
        if state.owners.contains_key(&token) {
            return Err(GovernanceError::Oracle(format!("token {token} already minted")));
        }
        state.owners.insert(token, to);
        state.adjust(to, at, 1);
        let supply = state.supply.latest().saturating_add(1);
        state.supply.push(at, supply);
        state.last_timepoint = at;
        debug!(token, to = %to, at, "Token minted");
        Ok(())
    }

    /// Mints `count` consecutive tokens starting at `first` to `to`.
    pub fn mint_batch(
        &self,
        to: Address,
        first: TokenId,
        count: u64,
        at: Timepoint,
    ) -> Result<(), GovernanceError> {
        for token in first..first.saturating_add(count) {
            self.mint(to, token, at)?;
        }
        Ok(())
    }

    /// Moves `token` to `to` at `at`.
    pub fn transfer(&self, token: TokenId, to: Address, at: Timepoint) -> Result<(), GovernanceError> {
        let mut state = self.state.write();
        state.check_order(at)?;
        let from = *state
            .owners
            .get(&token)
            .ok_or_else(|| GovernanceError::Oracle(format!("unknown token {token}")))?;
        state.owners.insert(token, to);
        state.adjust(from, at, -1);
        state.adjust(to, at, 1);
        state.last_timepoint = at;
        debug!(token, from = %from, to = %to, at, "Token transferred");
        Ok(())
    }

    /// Burns `token` at `at`.
    pub fn burn(&self, token: TokenId, at: Timepoint) -> Result<(), GovernanceError> {
        let mut state = self.state.write();
        state.check_order(at)?;
        let owner = state
            .owners
            .remove(&token)
            .ok_or_else(|| GovernanceError::Oracle(format!("unknown token {token}")))?;
        state.adjust(owner, at, -1);
        let supply = state.supply.latest().saturating_sub(1);
        state.supply.push(at, supply);
        state.last_timepoint = at;
        Ok(())
    }

    /// Current owner of `token`.
    #[must_use]
    pub fn owner_of(&self, token: TokenId) -> Option<Address> {
        self.state.read().owners.get(&token).copied()
    }
}

impl VotingPowerOracle for NftVotesLedger {
    fn power_at(&self, account: &Address, timepoint: Timepoint) -> Result<Weight, GovernanceError> {
        Ok(self
            .state
            .read()
            .balances
            .get(account)
            .map_or(0, |checkpoints| checkpoints.at(timepoint)))
    }

    fn supply_at(&self, timepoint: Timepoint) -> Result<Weight, GovernanceError> {
        Ok(self.state.read().supply.at(timepoint))
    }

    fn current_power(&self, account: &Address) -> Result<Weight, GovernanceError> {
        Ok(self
            .state
            .read()
            .balances
            .get(account)
            .map_or(0, Checkpoints::latest))
    }
}
