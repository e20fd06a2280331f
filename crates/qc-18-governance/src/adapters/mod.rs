//! # Adapters
//!
//! Reference implementations of the outbound ports and the settings loader.

pub mod clock;
pub mod ecdsa;
pub mod event_log;
pub mod power_ledger;
pub mod settings;
pub mod timelock;

pub use clock::ManualTimeSource;
pub use ecdsa::{address_from_verifying_key, Secp256k1Recovery};
pub use event_log::InMemoryEventLog;
pub use power_ledger::{NftVotesLedger, TokenId};
pub use settings::{SettingsError, TomlSettings};
pub use timelock::{
    CallExecutor, InMemoryTimelock, Operation, OperationStatus, DEFAULT_GRACE_PERIOD,
};
