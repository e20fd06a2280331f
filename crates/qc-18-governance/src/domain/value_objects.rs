//! # Value Objects
//!
//! Immutable domain primitives for governance: identities, proposal ids,
//! call bundles and vote directions.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

use super::errors::GovernanceError;

// Re-export U256 from primitive-types for call values
pub use primitive_types::U256;

/// Point on the engine clock (seconds or block number).
///
/// The voting-power oracle and the time source must use the same unit.
pub type Timepoint = u64;

/// Voting weight. One NFT = one unit.
pub type Weight = u64;

/// Keccak-256 hash function.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Parses a hex address, with or without `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).ok()?;
        Self::from_slice(&bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = hex::encode(self.0);
        write!(f, "0x{}...{}", &encoded[..8], &encoded[36..])
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// PROPOSAL ID (32 bytes)
// =============================================================================

/// Deterministic proposal identifier (Keccak-256 of the proposal contents).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ProposalId(pub [u8; 32]);

impl ProposalId {
    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", &hex::encode(self.0)[..16])
    }
}

/// Opaque reference to an operation registered in the execution-delay queue.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OperationHandle(pub [u8; 32]);

impl fmt::Debug for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op:0x{}", &hex::encode(self.0)[..16])
    }
}

// =============================================================================
// CALLS
// =============================================================================

/// A single call executed when a proposal runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Call target.
    pub target: Address,
    /// Value forwarded with the call.
    pub value: U256,
    /// Encoded call data.
    pub calldata: Vec<u8>,
}

impl Call {
    /// Creates a new call.
    pub fn new(target: Address, value: U256, calldata: Vec<u8>) -> Self {
        Self {
            target,
            value,
            calldata,
        }
    }
}

// =============================================================================
// VOTE TYPE
// =============================================================================

/// Vote direction, with the bravo-style discriminants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoteType {
    /// Vote against the proposal.
    Against = 0,
    /// Vote for the proposal.
    For = 1,
    /// Counts toward quorum only.
    Abstain = 2,
}

impl VoteType {
    /// Wire byte of this vote type.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for VoteType {
    type Error = GovernanceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            other => Err(GovernanceError::InvalidVoteType(other)),
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Against => write!(f, "against"),
            Self::For => write!(f, "for"),
            Self::Abstain => write!(f, "abstain"),
        }
    }
}

// =============================================================================
// SIGNATURE
// =============================================================================

/// Recoverable ECDSA signature in legacy `(r, s, v)` form.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaSignature {
    /// R component.
    pub r: [u8; 32],
    /// S component.
    pub s: [u8; 32],
    /// Recovery id (0, 1, 27 or 28).
    pub v: u8,
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaSignature")
            .field("r", &hex::encode(self.r))
            .field("s", &hex::encode(self.s))
            .field("v", &self.v)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_hex() {
        let addr = Address::from_hex("0x00000000000000000000000000000000000000aa").unwrap();
        assert_eq!(addr.0[19], 0xaa);
        assert!(Address::from_hex("0x1234").is_none());
        assert!(Address::from_hex("zz").is_none());
    }

    #[test]
    fn test_address_display_is_abbreviated() {
        let addr = Address::new([0xAB; 20]);
        assert_eq!(addr.to_string(), "0xabababab...abab");
    }

    #[test]
    fn test_vote_type_decoding() {
        assert_eq!(VoteType::try_from(0).unwrap(), VoteType::Against);
        assert_eq!(VoteType::try_from(1).unwrap(), VoteType::For);
        assert_eq!(VoteType::try_from(2).unwrap(), VoteType::Abstain);
        assert!(matches!(
            VoteType::try_from(3),
            Err(GovernanceError::InvalidVoteType(3))
        ));
    }

    #[test]
    fn test_keccak256_empty() {
        // Well-known Keccak-256 of the empty string
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
