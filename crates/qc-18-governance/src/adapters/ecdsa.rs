//! # secp256k1 Signature Recovery
//!
//! Recovers the ballot signer from a legacy `(r, s, v)` signature over the
//! ballot digest. High-s signatures are rejected so that every ballot has a
//! single valid encoding.

use crate::domain::{keccak256, Address, EcdsaSignature, GovernanceError};
use crate::ports::SignatureRecovery;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

/// k256-backed signature recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Recovery;

impl Secp256k1Recovery {
    /// Creates the adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SignatureRecovery for Secp256k1Recovery {
    fn recover(
        &self,
        digest: &[u8; 32],
        signature: &EcdsaSignature,
    ) -> Result<Address, GovernanceError> {
        let recovery_id = parse_recovery_id(signature.v)?;

        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&signature.r);
        sig_bytes[32..].copy_from_slice(&signature.s);
        let sig = Signature::from_slice(&sig_bytes)
            .map_err(|_| GovernanceError::InvalidSignature("malformed r or s".into()))?;

        // normalize_s returns Some only for high-s input
        if sig.normalize_s().is_some() {
            return Err(GovernanceError::InvalidSignature("high s value".into()));
        }

        let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
            .map_err(|_| GovernanceError::InvalidSignature("recovery failed".into()))?;
        Ok(address_from_verifying_key(&key))
    }
}

/// Account address of a public key: last 20 bytes of the Keccak-256 of the
/// uncompressed point without its prefix byte.
#[must_use]
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

/// Valid v values: 0, 1, 27, 28.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, GovernanceError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => {
            return Err(GovernanceError::InvalidSignature(format!(
                "invalid recovery id {v}"
            )))
        }
    };
    RecoveryId::try_from(id)
        .map_err(|_| GovernanceError::InvalidSignature(format!("invalid recovery id {v}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::U256;
    use k256::ecdsa::SigningKey;

    fn key() -> SigningKey {
        SigningKey::from_slice(&[0x42; 32]).unwrap()
    }

    fn sign(digest: &[u8; 32], key: &SigningKey) -> EcdsaSignature {
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

    #[test]
    fn test_recovers_signer() {
        let key = key();
        let digest = keccak256(b"ballot");
        let sig = sign(&digest, &key);
        let signer = address_from_verifying_key(key.verifying_key());
        assert_eq!(Secp256k1Recovery.recover(&digest, &sig).unwrap(), signer);

        // v in 0/1 form recovers the same signer
        let raw = EcdsaSignature { v: sig.v - 27, ..sig };
        assert_eq!(Secp256k1Recovery.recover(&digest, &raw).unwrap(), signer);
    }

    #[test]
    fn test_other_digest_recovers_other_address() {
        let key = key();
        let sig = sign(&keccak256(b"ballot"), &key);
        let signer = address_from_verifying_key(key.verifying_key());
        let recovered = Secp256k1Recovery.recover(&keccak256(b"other"), &sig);
        assert!(recovered.map_or(true, |addr| addr != signer));
    }

    #[test]
    fn test_rejects_bad_v_and_zero_scalars() {
        let digest = keccak256(b"ballot");
        let sig = sign(&digest, &key());
        assert!(matches!(
            Secp256k1Recovery.recover(&digest, &EcdsaSignature { v: 2, ..sig }),
            Err(GovernanceError::InvalidSignature(_))
        ));
        let zero = EcdsaSignature {
            r: [0; 32],
            s: [0; 32],
            v: 27,
        };
        assert!(matches!(
            Secp256k1Recovery.recover(&digest, &zero),
            Err(GovernanceError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_rejects_high_s() {
        let digest = keccak256(b"ballot");
        let sig = sign(&digest, &key());
        // n - s is the high-s twin of a valid signature
        let order = U256::from_str_radix(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            16,
        )
        .unwrap();
        let mut high_s = [0u8; 32];
        (order - U256::from_big_endian(&sig.s)).to_big_endian(&mut high_s);
        let high = EcdsaSignature { s: high_s, ..sig };
        assert!(matches!(
            Secp256k1Recovery.recover(&digest, &high),
            Err(GovernanceError::InvalidSignature(_))
        ));
    }
}
