//! # QC-18 On-Chain Governance
//!
//! Token-weighted proposal voting with snapshot power, late-quorum
//! protection and timelocked execution.
//!
//! **Subsystem ID:** 18  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Holders of a counted asset (one NFT = one vote) submit proposals, vote
//! over a bounded window and, when quorum and majority are met, have the
//! proposal's calls run through an execution-delay queue:
//! - Voting power is read at a fixed snapshot per proposal
//! - Each voter votes at most once per proposal
//! - Quorum is measured against the snapshot supply
//! - A quorum reached in the final moments extends the window once
//!
//! ## Proposal Lifecycle
//!
//! | State | Condition |
//! |-------|-----------|
//! | Pending | before `vote_start` |
//! | Active | `vote_start <= t < vote_end` |
//! | Succeeded | closed, quorum reached, for > against |
//! | Defeated | closed otherwise |
//! | Queued | registered with the execution queue |
//! | Executed | queue ran the operation |
//! | Expired | queue window passed without a run |
//! | Canceled | explicitly canceled |
//!
//! ## Safety
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Snapshot weights | Power read at `snapshot`, never at vote time |
//! | Cast once | Second vote from the same identity rejected |
//! | Late quorum | One-time extension to `t + extension` |
//! | Re-entry guard | Nested mutating calls rejected during execution |
//! | Pause switch | Owner can halt proposals, votes and execution |
//! | Bounded config | Every parameter checked against its bound |
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-governance/
//! ├── domain/      # Config, proposals, tally, quorum, state machine, safety
//! ├── ports/       # GovernanceApi, oracle, queue, signatures, clock, events
//! ├── adapters/    # NFT ledger, timelock, k256 recovery, event log, TOML settings
//! ├── events.rs    # GovernanceEvent payloads and topics
//! └── service.rs   # GovernorService facade
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    CallExecutor, InMemoryEventLog, InMemoryTimelock, ManualTimeSource, NftVotesLedger,
    Secp256k1Recovery, SettingsError, TomlSettings,
};
pub use domain::{
    hash_description, hash_proposal, Address, BallotDomain, Bound, Call, ConfigBounds,
    ConfigField, EcdsaSignature, GovernanceConfig, GovernanceError, OperationHandle, Proposal,
    ProposalId, ProposalState, ProposalVote, Timepoint, VoteType, Weight, COUNTING_MODE, U256,
};
pub use events::{topics, GovernanceEvent};
pub use ports::{
    EventSink, ExecutionQueue, GovernanceApi, NoopEventSink, SignatureRecovery, SystemTimeSource,
    TimeSource, VotingPowerOracle,
};
pub use service::{GovernanceStats, GovernorService, ServiceConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem identifier.
pub const SUBSYSTEM_ID: u8 = 18;
