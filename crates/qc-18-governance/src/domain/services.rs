//! # Domain Services
//!
//! Deterministic hashing: proposal ids, description hashes and the typed
//! ballot digest that off-chain voters sign.
//!
//! Proposal ids use the ABI layout of
//! `(address[] targets, uint256[] values, bytes[] calldatas, bytes32 descriptionHash)`
//! so identical inputs always map to the same id.

use super::value_objects::{keccak256, Address, ProposalId, VoteType, U256};
use serde::{Deserialize, Serialize};

/// Type string of the signed ballot struct.
pub const BALLOT_TYPE: &str = "Ballot(uint256 proposalId,uint8 support)";

/// Type string of the signing domain.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

// =============================================================================
// ABI WORDS
// =============================================================================

fn word_from_u256(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn word_from_usize(value: usize) -> [u8; 32] {
    word_from_u256(U256::from(value))
}

fn word_from_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn encode_bytes(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&word_from_usize(data.len()));
    out.extend_from_slice(data);
    let padding = (32 - data.len() % 32) % 32;
    out.extend(std::iter::repeat(0u8).take(padding));
}

fn encode_bytes_array(items: &[Vec<u8>]) -> Vec<u8> {
    let mut bodies = Vec::new();
    let mut offsets = Vec::with_capacity(items.len() * 32);
    let head_len = items.len() * 32;
    for item in items {
        offsets.extend_from_slice(&word_from_usize(head_len + bodies.len()));
        encode_bytes(item, &mut bodies);
    }

    let mut out = Vec::with_capacity(32 + offsets.len() + bodies.len());
    out.extend_from_slice(&word_from_usize(items.len()));
    out.extend_from_slice(&offsets);
    out.extend_from_slice(&bodies);
    out
}

// =============================================================================
// PROPOSAL HASHING
// =============================================================================

/// Keccak-256 of a proposal description.
#[must_use]
pub fn hash_description(description: &str) -> [u8; 32] {
    keccak256(description.as_bytes())
}

/// Deterministic proposal id.
#[must_use]
pub fn hash_proposal(
    targets: &[Address],
    values: &[U256],
    calldatas: &[Vec<u8>],
    description_hash: &[u8; 32],
) -> ProposalId {
    let mut targets_enc = Vec::with_capacity(32 * (targets.len() + 1));
    targets_enc.extend_from_slice(&word_from_usize(targets.len()));
    for target in targets {
        targets_enc.extend_from_slice(&word_from_address(target));
    }

    let mut values_enc = Vec::with_capacity(32 * (values.len() + 1));
    values_enc.extend_from_slice(&word_from_usize(values.len()));
    for value in values {
        values_enc.extend_from_slice(&word_from_u256(*value));
    }

    let calldatas_enc = encode_bytes_array(calldatas);

    let head_len = 4 * 32;
    let targets_offset = head_len;
    let values_offset = targets_offset + targets_enc.len();
    let calldatas_offset = values_offset + values_enc.len();

    let mut encoded =
        Vec::with_capacity(head_len + targets_enc.len() + values_enc.len() + calldatas_enc.len());
    encoded.extend_from_slice(&word_from_usize(targets_offset));
    encoded.extend_from_slice(&word_from_usize(values_offset));
    encoded.extend_from_slice(&word_from_usize(calldatas_offset));
    encoded.extend_from_slice(description_hash);
    encoded.extend_from_slice(&targets_enc);
    encoded.extend_from_slice(&values_enc);
    encoded.extend_from_slice(&calldatas_enc);

    ProposalId(keccak256(&encoded))
}

// =============================================================================
// BALLOT DIGEST
// =============================================================================

/// Signing domain that binds ballots to one governor deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotDomain {
    /// Governor name.
    pub name: String,
    /// Domain version.
    pub version: String,
    /// Chain identifier.
    pub chain_id: u64,
    /// Address ballots are bound to.
    pub verifying_contract: Address,
}

impl Default for BallotDomain {
    fn default() -> Self {
        Self {
            name: "QuantumGovernor".to_string(),
            version: "1".to_string(),
            chain_id: 1,
            verifying_contract: Address::ZERO,
        }
    }
}

impl BallotDomain {
    /// Domain separator hash.
    #[must_use]
    pub fn separator(&self) -> [u8; 32] {
        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(&keccak256(DOMAIN_TYPE.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.name.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.version.as_bytes()));
        encoded.extend_from_slice(&word_from_u256(U256::from(self.chain_id)));
        encoded.extend_from_slice(&word_from_address(&self.verifying_contract));
        keccak256(&encoded)
    }

    /// Digest a voter signs to attest `(proposal_id, support)`.
    #[must_use]
    pub fn ballot_digest(&self, proposal_id: &ProposalId, support: VoteType) -> [u8; 32] {
        let mut struct_enc = Vec::with_capacity(3 * 32);
        struct_enc.extend_from_slice(&keccak256(BALLOT_TYPE.as_bytes()));
        struct_enc.extend_from_slice(proposal_id.as_bytes());
        struct_enc.extend_from_slice(&word_from_u256(U256::from(support.as_u8())));
        let struct_hash = keccak256(&struct_enc);

        let mut message = Vec::with_capacity(2 + 64);
        message.extend_from_slice(&[0x19, 0x01]);
        message.extend_from_slice(&self.separator());
        message.extend_from_slice(&struct_hash);
        keccak256(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Address>, Vec<U256>, Vec<Vec<u8>>) {
        (
            vec![Address::new([0x11; 20]), Address::new([0x22; 20])],
            vec![U256::zero(), U256::from(5u64)],
            vec![vec![0xde, 0xad, 0xbe, 0xef], vec![]],
        )
    }

    #[test]
    fn test_hash_proposal_deterministic() {
        let (targets, values, calldatas) = sample();
        let desc = hash_description("raise quorum");
        let a = hash_proposal(&targets, &values, &calldatas, &desc);
        let b = hash_proposal(&targets, &values, &calldatas, &desc);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_proposal_sensitive_to_every_input() {
        let (targets, values, calldatas) = sample();
        let desc = hash_description("raise quorum");
        let base = hash_proposal(&targets, &values, &calldatas, &desc);

        let other_desc = hash_description("raise quorum!");
        assert_ne!(base, hash_proposal(&targets, &values, &calldatas, &other_desc));

        let mut values2 = values.clone();
        values2[1] = U256::from(6u64);
        assert_ne!(base, hash_proposal(&targets, &values2, &calldatas, &desc));

        let mut calldatas2 = calldatas.clone();
        calldatas2[1] = vec![0];
        assert_ne!(base, hash_proposal(&targets, &values, &calldatas2, &desc));

        let mut targets2 = targets.clone();
        targets2.swap(0, 1);
        assert_ne!(base, hash_proposal(&targets2, &values, &calldatas, &desc));
    }

    #[test]
    fn test_bytes_array_padding() {
        let enc = encode_bytes_array(&[vec![1, 2, 3]]);
        // len word + one offset word + length word + one padded data word
        assert_eq!(enc.len(), 4 * 32);
        assert_eq!(enc[63], 32); // offset of the first element
        assert_eq!(enc[95], 3); // element length
        assert_eq!(&enc[96..99], &[1, 2, 3]);
    }

    #[test]
    fn test_ballot_digest_binds_support_and_domain() {
        let domain = BallotDomain::default();
        let id = ProposalId([3; 32]);
        let for_digest = domain.ballot_digest(&id, VoteType::For);
        assert_ne!(for_digest, domain.ballot_digest(&id, VoteType::Against));

        let other_chain = BallotDomain {
            chain_id: 5,
            ..BallotDomain::default()
        };
        assert_ne!(for_digest, other_chain.ballot_digest(&id, VoteType::For));
    }
}
