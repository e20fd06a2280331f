//! Shared fixtures for the governance integration tests.

#![allow(dead_code)]

use k256::ecdsa::{RecoveryId, SigningKey};
use qc_18_governance::adapters::address_from_verifying_key;
use qc_18_governance::{
    Address, EcdsaSignature, GovernanceApi, GovernanceConfig, GovernorService, InMemoryEventLog,
    InMemoryTimelock, ManualTimeSource, NftVotesLedger, ProposalId, ServiceConfig, U256,
};
use std::sync::Arc;

pub type Governor = GovernorService<NftVotesLedger, InMemoryTimelock>;

pub const OWNER: Address = Address::new([0xEE; 20]);
pub const PROPOSER: Address = Address::new([0xA1; 20]);
pub const SMALL_HOLDER: Address = Address::new([0xB2; 20]);
pub const WHALE: Address = Address::new([0xC3; 20]);
pub const HOLDER: Address = Address::new([0xD4; 20]);
pub const STRANGER: Address = Address::new([0x99; 20]);
pub const TARGET: Address = Address::new([0x7A; 20]);

pub const START: u64 = 10_000;
pub const VOTING_DELAY: u64 = 60;
pub const VOTING_PERIOD: u64 = 50_000;
pub const EXTENSION: u64 = 7_200;
pub const TIMELOCK_DELAY: u64 = 3_600;

/// Fully wired governor with an 8000-token supply:
/// PROPOSER 20, SMALL_HOLDER 10, WHALE 320, HOLDER 7650.
pub struct World {
    pub clock: Arc<ManualTimeSource>,
    pub ledger: Arc<NftVotesLedger>,
    pub timelock: Arc<InMemoryTimelock>,
    pub log: Arc<InMemoryEventLog>,
    pub governor: Arc<Governor>,
}

pub fn params() -> GovernanceConfig {
    GovernanceConfig {
        voting_delay: VOTING_DELAY,
        voting_period: VOTING_PERIOD,
        proposal_threshold: 16,
        quorum_numerator: 4,
        late_quorum_extension: EXTENSION,
    }
}

impl World {
    pub fn new() -> Self {
        let clock = Arc::new(ManualTimeSource::new(START));
        let ledger = Arc::new(NftVotesLedger::new());
        ledger.mint_batch(PROPOSER, 0, 20, 1).unwrap();
        ledger.mint_batch(SMALL_HOLDER, 100, 10, 1).unwrap();
        ledger.mint_batch(WHALE, 1_000, 320, 1).unwrap();
        ledger.mint_batch(HOLDER, 10_000, 7_650, 1).unwrap();

        let timelock = Arc::new(InMemoryTimelock::new(TIMELOCK_DELAY, clock.clone()));
        let log = Arc::new(InMemoryEventLog::new());
        let config = ServiceConfig {
            initial: params(),
            ..ServiceConfig::new(OWNER)
        };
        let governor = GovernorService::new(config, ledger.clone(), timelock.clone(), clock.clone())
            .unwrap()
            .with_event_sink(log.clone());

        Self {
            clock,
            ledger,
            timelock,
            log,
            governor: Arc::new(governor),
        }
    }

    pub fn propose(&self, description: &str) -> ProposalId {
        self.governor
            .propose(
                PROPOSER,
                vec![TARGET],
                vec![U256::zero()],
                vec![b"setFee(uint256)".to_vec()],
                description,
            )
            .unwrap()
    }

    pub fn at_vote_start(&self, id: ProposalId) {
        self.clock
            .set(self.governor.proposal(id).unwrap().vote_start);
    }

    pub fn after_vote_end(&self, id: ProposalId) {
        self.clock.set(self.governor.proposal(id).unwrap().vote_end);
    }
}

/// Deterministic signing key.
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

pub fn key_address(key: &SigningKey) -> Address {
    address_from_verifying_key(key.verifying_key())
}

/// Signs a digest as a low-s `(r, s, v)` ballot signature.
pub fn sign_digest(key: &SigningKey, digest: &[u8; 32]) -> EcdsaSignature {
    let (sig, recid) = key.sign_prehash_recoverable(digest).unwrap();
    let (sig, recid) = match sig.normalize_s() {
        Some(low) => (low, RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced())),
        None => (sig, recid),
    };
    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    EcdsaSignature {
        r,
        s,
        v: recid.to_byte() + 27,
    }
}

/// Installs a tracing subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
