//! Content addressing for oracle payloads.
//!
//! Wraps Blake3 hashing with a strong type so a payload hash can never be
//! confused with a source key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte Blake3 hash of a payload's raw bytes.
///
/// This is the content address of a record. Two payloads with the same
/// bytes have the same PayloadHash regardless of which source delivered
/// them or at which sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadHash(pub [u8; 32]);

impl PayloadHash {
    /// Compute the content address of the given payload bytes.
    pub fn digest(payload: &[u8]) -> Self {
        Self(*blake3::hash(payload).as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero hash (sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for PayloadHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for PayloadHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for PayloadHash {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let a = PayloadHash::digest(b"cross-chain event");
        let b = PayloadHash::digest(b"cross-chain event");
        assert_eq!(a, b);

        let c = PayloadHash::digest(b"different event");
        assert_ne!(a, c);
    }

    #[test]
    fn test_hex_roundtrip() {
        let hash = PayloadHash::digest(b"payload");
        let hex = hash.to_hex();
        let recovered = PayloadHash::from_hex(&hex).unwrap();
        assert_eq!(hash, recovered);
    }

    #[test]
    fn test_from_hex_rejects_short_input() {
        assert!(PayloadHash::from_hex("abcd").is_err());
    }

    #[test]
    fn test_empty_payload_has_an_address() {
        let hash = PayloadHash::digest(&[]);
        assert_ne!(hash, PayloadHash::ZERO);
    }

    #[test]
    fn test_debug_is_truncated() {
        let hash = PayloadHash::from_bytes([0xab; 32]);
        let debug = format!("{:?}", hash);
        assert!(debug.starts_with("PayloadHash("));
        assert!(debug.len() < 40);
    }
}
