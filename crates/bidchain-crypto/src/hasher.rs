use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use bidchain_types::BlockHash;

/// SHA-256 link hasher for ledger blocks.
///
/// A block hash is `SHA-256(canonical_json(payload) || previous_hash)`, where
/// `previous_hash` contributes the bytes of its hex wire form. Both parties to
/// an exchange must produce identical bytes for the same payload, so payloads
/// always go through [`LinkHasher::canonical_bytes`] first.
pub struct LinkHasher;

impl LinkHasher {
    /// Hash a payload and the hash of the block it links to.
    pub fn link<T: Serialize>(
        payload: &T,
        previous_hash: &BlockHash,
    ) -> Result<BlockHash, HasherError> {
        let canonical = Self::canonical_bytes(payload)?;
        Ok(Self::link_bytes(&canonical, previous_hash))
    }

    /// Hash already-canonical payload bytes against a previous hash.
    pub fn link_bytes(canonical_payload: &[u8], previous_hash: &BlockHash) -> BlockHash {
        let mut hasher = Sha256::new();
        hasher.update(canonical_payload);
        hasher.update(previous_hash.as_str().as_bytes());
        BlockHash::from_digest(to_array(&hasher.finalize()))
    }

    /// Serialize a value as compact JSON with object keys sorted
    /// lexicographically at every depth.
    pub fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, HasherError> {
        let value =
            serde_json::to_value(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        let mut out = Vec::new();
        write_canonical(&value, &mut out)?;
        Ok(out)
    }
}

fn to_array(digest: &[u8]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(digest);
    bytes
}

fn write_canonical(value: &Value, out: &mut Vec<u8>) -> Result<(), HasherError> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push(b'{');
            for (i, (key, child)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, key)
                    .map_err(|e| HasherError::Serialization(e.to_string()))?;
                out.push(b':');
                write_canonical(child, out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out)?;
            }
            out.push(b']');
        }
        scalar => {
            serde_json::to_writer(&mut *out, scalar)
                .map_err(|e| HasherError::Serialization(e.to_string()))?;
        }
    }
    Ok(())
}

/// Errors from hashing operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
