//! Cryptographic primitives for the fair dice protocol.
//!
//! This module provides:
//! - SecretKey, a fresh 256-bit key per exchange
//! - Commitment, a keyed digest HMAC-SHA256(key, value) published before reveal

mod commitment;
mod secret_key;

pub use commitment::{commit, verify, verify_hex, Commitment};
pub use secret_key::{generate_key, SecretKey, KEY_LEN};

/// Serde helper: 32-byte arrays as lowercase hex strings.
pub(crate) mod hex32 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        let mut arr = [0u8; 32];
        hex::decode_to_slice(&hex_str, &mut arr).map_err(serde::de::Error::custom)?;
        Ok(arr)
    }
}
