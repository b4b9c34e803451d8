//! Keyed commitment for the commit-reveal scheme.

use super::SecretKey;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Commitment = HMAC-SHA256(key, decimal string of value)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "super::hex32")] [u8; 32]);

impl Commitment {
    /// Commit to a value under the given key
    pub fn new(key: &SecretKey, value: u32) -> Self {
        Self::from_message(key, value.to_string().as_bytes())
    }

    fn from_message(key: &SecretKey, message: &[u8]) -> Self {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(message);
        Self(mac.finalize().into_bytes().into())
    }

    /// Parse a published digest
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given key and value produce this commitment
    pub fn verify(&self, key: &SecretKey, value: u32) -> bool {
        *self == Self::new(key, value)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Deterministic keyed digest of `value`.
pub fn commit(key: &SecretKey, value: u32) -> Commitment {
    Commitment::new(key, value)
}

/// Recompute the digest and compare for exact equality.
pub fn verify(key: &SecretKey, value: u32, commitment: &Commitment) -> bool {
    commitment.verify(key, value)
}

/// Verify a transcript entry given hex-encoded key and digest.
///
/// Malformed hex never verifies.
pub fn verify_hex(key_hex: &str, value: u32, commitment_hex: &str) -> bool {
    match (SecretKey::from_hex(key_hex), Commitment::from_hex(commitment_hex)) {
        (Ok(key), Ok(commitment)) => commitment.verify(&key, value),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::generate_key;

    #[test]
    fn test_commitment_verification() {
        let key = generate_key();
        let commitment = commit(&key, 3);

        assert!(verify(&key, 3, &commitment));
    }

    #[test]
    fn test_commitment_is_deterministic() {
        let key = SecretKey::from_bytes([7u8; 32]);

        assert_eq!(commit(&key, 5), commit(&key, 5));
    }

    #[test]
    fn test_different_values_different_commitments() {
        let key = generate_key();

        assert_ne!(commit(&key, 0), commit(&key, 1));
    }

    #[test]
    fn test_different_keys_different_commitments() {
        let key1 = generate_key();
        let key2 = generate_key();

        assert_ne!(commit(&key1, 4), commit(&key2, 4));
    }

    #[test]
    fn test_wrong_value_fails_verification() {
        // Statistical check over many fresh keys
        for value in 0..200u32 {
            let key = generate_key();
            let commitment = commit(&key, value);
            assert!(!verify(&key, value + 1, &commitment));
            assert!(!verify(&key, value.wrapping_sub(1), &commitment));
        }
    }

    #[test]
    fn test_wrong_key_fails_verification() {
        let commitment = commit(&generate_key(), 2);

        assert!(!verify(&generate_key(), 2, &commitment));
    }

    #[test]
    fn test_known_vector() {
        // HMAC-SHA256 with key = 32 zero bytes over the decimal strings "0" and "5"
        let key = SecretKey::from_bytes([0u8; 32]);

        assert_eq!(
            commit(&key, 0).to_string(),
            "9979e4c3ee19965f9ecc6dca6b3954b10c18c1bfa105c512cc3ae58be85db71c"
        );
        assert_eq!(
            commit(&key, 5).to_string(),
            "efc578289b0a2a4ab804b70646a6d0aaf246f043854e3ce7d41fb49709def609"
        );
    }

    #[test]
    fn test_verify_hex() {
        let key = generate_key();
        let commitment = commit(&key, 1);

        assert!(verify_hex(&key.to_hex(), 1, &commitment.to_string()));
        assert!(!verify_hex(&key.to_hex(), 0, &commitment.to_string()));
        assert!(!verify_hex("zz", 1, &commitment.to_string()));
    }

    #[test]
    fn test_commitment_serializes_as_hex() {
        let key = SecretKey::from_bytes([1u8; 32]);
        let commitment = commit(&key, 4);
        let json = serde_json::to_string(&commitment).unwrap();

        assert_eq!(json, format!("\"{}\"", commitment));
        let back: Commitment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, commitment);
    }
}
