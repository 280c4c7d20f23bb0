//! Derivation vectors for cross-implementation verification.
//!
//! Every implementation of the oracle's content addressing must produce
//! identical:
//! - source keys for a given `(source_type, source_id)`
//! - payload hashes for given payload bytes
//!
//! Vectors are generated from fixed inputs; regenerating a vector must be a
//! no-op, and exporting them as JSON lets other implementations check
//! against the same inputs.

use native_oracle_core::{PayloadHash, SourceId, SourceKey, SourceType};
use serde::{Deserialize, Serialize};

/// A single derivation vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationVector {
    pub name: String,

    // Inputs
    pub source_type: u32,
    pub source_id: u64,
    pub payload: String, // hex

    // Derived outputs
    pub source_key: String,   // 32 bytes hex
    pub payload_hash: String, // 32 bytes hex
}

/// Generate a vector from inputs.
pub fn generate_vector(
    name: &str,
    source_type: u32,
    source_id: u64,
    payload: &[u8],
) -> DerivationVector {
    let key = SourceKey::derive(SourceType(source_type), SourceId(source_id));
    let hash = PayloadHash::digest(payload);

    DerivationVector {
        name: name.to_string(),
        source_type,
        source_id,
        payload: hex::encode(payload),
        source_key: key.to_hex(),
        payload_hash: hash.to_hex(),
    }
}

/// The fixed vector set.
pub fn all_vectors() -> Vec<DerivationVector> {
    vec![
        generate_vector("empty-payload", 0, 0, b""),
        generate_vector("minimal", 0, 1, b"P1"),
        generate_vector("bridge-event", 1, 42, b"cross-chain transfer observed"),
        generate_vector("keyset-update", 2, 7, &[0xde, 0xad, 0xbe, 0xef]),
        generate_vector("max-ids", u32::MAX, u64::MAX, b"boundary"),
    ]
}

/// Regenerate every vector from its inputs and compare.
///
/// Returns the names of vectors that no longer match.
pub fn verify_all_vectors(vectors: &[DerivationVector]) -> Vec<String> {
    vectors
        .iter()
        .filter(|vector| {
            let payload = hex::decode(&vector.payload).unwrap_or_default();
            let regenerated = generate_vector(
                &vector.name,
                vector.source_type,
                vector.source_id,
                &payload,
            );
            **vector != regenerated
        })
        .map(|vector| vector.name.clone())
        .collect()
}
