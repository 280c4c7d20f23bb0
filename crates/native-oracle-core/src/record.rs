//! Record: a content-addressed admitted entry.
//!
//! A record is identified by the Blake3 hash of its payload. Content is
//! immutable: re-admitting the same payload under a higher sequence only
//! refreshes the record's slot metadata.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::hash::PayloadHash;
use crate::source::SourceKey;

/// How much of a payload the ledger persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// Persist only the content hash plus slot metadata. Readers can verify
    /// a candidate preimage against the commitment but cannot fetch bytes.
    CommitmentOnly,

    /// Persist the full payload alongside the commitment.
    Full,
}

/// An admitted ledger entry.
///
/// Under [`StorageMode::CommitmentOnly`] the `payload` field is empty; the
/// hash is still the address the record lives under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Content address of the payload.
    pub payload_hash: PayloadHash,

    /// The source that most recently admitted this content.
    pub source_key: SourceKey,

    /// The sequence this content was most recently admitted under.
    pub sequence: u64,

    /// When this content was most recently admitted (Unix ms).
    pub admitted_at: i64,

    /// The payload bytes; empty in commitment-only mode.
    pub payload: Bytes,
}

impl Record {
    /// Build a record for admission under the given storage mode.
    pub fn admit(
        source_key: SourceKey,
        sequence: u64,
        payload: &[u8],
        mode: StorageMode,
        now: i64,
    ) -> Self {
        let payload_hash = PayloadHash::digest(payload);
        let payload = match mode {
            StorageMode::CommitmentOnly => Bytes::new(),
            StorageMode::Full => Bytes::copy_from_slice(payload),
        };
        Self {
            payload_hash,
            source_key,
            sequence,
            admitted_at: now,
            payload,
        }
    }

    /// Whether only the commitment was persisted.
    pub fn is_commitment_only(&self) -> bool {
        self.payload.is_empty()
    }

    /// Refresh slot metadata after a re-admission of the same content.
    ///
    /// Content never changes; only the slot and timestamp move.
    pub fn refresh(&mut self, source_key: SourceKey, sequence: u64, now: i64) {
        self.source_key = source_key;
        self.sequence = sequence;
        self.admitted_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceId, SourceType};

    fn key() -> SourceKey {
        SourceKey::derive(SourceType(0), SourceId(1))
    }

    #[test]
    fn test_admit_full_keeps_payload() {
        let record = Record::admit(key(), 1, b"payload", StorageMode::Full, 1000);
        assert_eq!(record.payload.as_ref(), b"payload");
        assert!(!record.is_commitment_only());
        assert_eq!(record.payload_hash, PayloadHash::digest(b"payload"));
    }

    #[test]
    fn test_admit_commitment_only_drops_payload() {
        let record = Record::admit(key(), 1, b"payload", StorageMode::CommitmentOnly, 1000);
        assert!(record.payload.is_empty());
        assert!(record.is_commitment_only());
        // The hash still commits to the original bytes.
        assert_eq!(record.payload_hash, PayloadHash::digest(b"payload"));
    }

    #[test]
    fn test_refresh_moves_slot_not_content() {
        let mut record = Record::admit(key(), 1, b"payload", StorageMode::Full, 1000);
        let hash = record.payload_hash;

        record.refresh(key(), 9, 2000);
        assert_eq!(record.sequence, 9);
        assert_eq!(record.admitted_at, 2000);
        assert_eq!(record.payload_hash, hash);
        assert_eq!(record.payload.as_ref(), b"payload");
    }
}
