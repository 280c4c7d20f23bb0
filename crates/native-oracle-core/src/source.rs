//! Sources: external event producers and their per-source cursors.
//!
//! A source is identified by `(SourceType, SourceId)` and canonicalized into
//! a single opaque [`SourceKey`] used as the map key everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::OrderingError;
use crate::ordering::OrderingRule;

/// The small category id of a source (bridge, key-set feed, price feed, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceType(pub u32);

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SourceType {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// The large opaque id distinguishing sources within a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SourceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A 32-byte canonical source identifier.
///
/// Derived from Blake3(domain || source_type || source_id). Immutable once
/// two events share a key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey(pub [u8; 32]);

impl SourceKey {
    /// Derive the canonical key for a `(source_type, source_id)` pair.
    pub fn derive(source_type: SourceType, source_id: SourceId) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"native-oracle-source-v0:");
        hasher.update(&source_type.0.to_le_bytes());
        hasher.update(b":");
        hasher.update(&source_id.0.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
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

    /// The zero source key (sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for SourceKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for SourceKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for SourceKey {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// Per-source admission state: the monotonic cursor.
///
/// A cursor starts uninitialized at 0. Every admission rule requires new
/// sequences to lie strictly above the cursor, so `latest_sequence == 0`
/// doubles as the uninitialized marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCursor {
    /// The canonical key of the source this cursor tracks.
    pub source_key: SourceKey,

    /// Highest admitted sequence. 0 means no admission yet.
    pub latest_sequence: u64,

    /// Number of entries admitted through this cursor.
    pub records_admitted: u64,

    /// When this cursor was created (Unix ms).
    pub created_at: i64,

    /// When this cursor was last advanced (Unix ms).
    pub updated_at: i64,
}

impl SourceCursor {
    /// Create a fresh, uninitialized cursor.
    pub fn new(source_key: SourceKey, now: i64) -> Self {
        Self {
            source_key,
            latest_sequence: 0,
            records_admitted: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether any sequence has been admitted for this source.
    pub fn is_initialized(&self) -> bool {
        self.latest_sequence > 0
    }

    /// Advance the cursor to `sequence` under the given rule.
    ///
    /// On an ordering violation the cursor is left untouched.
    pub fn advance(
        &mut self,
        rule: OrderingRule,
        sequence: u64,
        now: i64,
    ) -> Result<(), OrderingError> {
        rule.validate(self.latest_sequence, sequence)?;
        self.latest_sequence = sequence;
        self.records_admitted += 1;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_key_derivation_is_deterministic() {
        let a = SourceKey::derive(SourceType(0), SourceId(1));
        let b = SourceKey::derive(SourceType(0), SourceId(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_source_key_separates_type_and_id() {
        let base = SourceKey::derive(SourceType(0), SourceId(1));
        assert_ne!(base, SourceKey::derive(SourceType(1), SourceId(1)));
        assert_ne!(base, SourceKey::derive(SourceType(0), SourceId(2)));
        // Swapping which half carries the value must not collide.
        assert_ne!(
            SourceKey::derive(SourceType(1), SourceId(0)),
            SourceKey::derive(SourceType(0), SourceId(1)),
        );
    }

    #[test]
    fn test_source_key_hex_roundtrip() {
        let key = SourceKey::derive(SourceType(7), SourceId(42));
        let recovered = SourceKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, recovered);
    }

    #[test]
    fn test_cursor_starts_uninitialized() {
        let key = SourceKey::derive(SourceType(0), SourceId(1));
        let cursor = SourceCursor::new(key, 1000);
        assert!(!cursor.is_initialized());
        assert_eq!(cursor.latest_sequence, 0);
        assert_eq!(cursor.records_admitted, 0);
    }

    #[test]
    fn test_cursor_advance_strictly_increasing() {
        let key = SourceKey::derive(SourceType(0), SourceId(1));
        let mut cursor = SourceCursor::new(key, 1000);

        cursor
            .advance(OrderingRule::StrictlyIncreasing, 3, 1001)
            .unwrap();
        assert_eq!(cursor.latest_sequence, 3);
        assert!(cursor.is_initialized());

        // Gaps are fine under this rule.
        cursor
            .advance(OrderingRule::StrictlyIncreasing, 10, 1002)
            .unwrap();
        assert_eq!(cursor.latest_sequence, 10);
        assert_eq!(cursor.records_admitted, 2);
    }

    #[test]
    fn test_cursor_rejects_stale_sequence_without_mutation() {
        let key = SourceKey::derive(SourceType(0), SourceId(1));
        let mut cursor = SourceCursor::new(key, 1000);
        cursor
            .advance(OrderingRule::StrictlyIncreasing, 5, 1001)
            .unwrap();

        let before = cursor.clone();
        let err = cursor
            .advance(OrderingRule::StrictlyIncreasing, 5, 1002)
            .unwrap_err();
        assert!(matches!(err, OrderingError::StaleSequence { .. }));
        assert_eq!(cursor, before);
    }

    proptest::proptest! {
        #[test]
        fn prop_cursor_tracks_highest_admitted_sequence(
            steps in proptest::collection::vec(1u64..1_000, 1..32),
        ) {
            let key = SourceKey::derive(SourceType(0), SourceId(1));
            let mut cursor = SourceCursor::new(key, 0);
            let mut sequence = 0u64;
            for (i, step) in steps.iter().enumerate() {
                sequence += step;
                cursor
                    .advance(OrderingRule::StrictlyIncreasing, sequence, i as i64)
                    .unwrap();
                // Never decreases, always equal to the latest admission.
                proptest::prop_assert_eq!(cursor.latest_sequence, sequence);
            }
            proptest::prop_assert_eq!(cursor.records_admitted, steps.len() as u64);
        }
    }

    #[test]
    fn test_cursor_gap_free_rule() {
        let key = SourceKey::derive(SourceType(0), SourceId(1));
        let mut cursor = SourceCursor::new(key, 1000);

        cursor.advance(OrderingRule::GapFree, 1, 1001).unwrap();
        cursor.advance(OrderingRule::GapFree, 2, 1002).unwrap();

        let err = cursor.advance(OrderingRule::GapFree, 4, 1003).unwrap_err();
        assert!(matches!(err, OrderingError::SequenceGap { expected: 3, .. }));
        assert_eq!(cursor.latest_sequence, 2);
    }
}
