use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of hex characters in a full SHA-256 block hash.
pub const HASH_HEX_LEN: usize = 64;

/// Hex-encoded link digest of a block.
///
/// A `BlockHash` is either the lowercase hex form of a 32-byte SHA-256 digest
/// or the literal `"0"`, which the genesis block uses as its previous hash.
/// Any other string is rejected on parse and on deserialization, so a block
/// carrying a malformed hash never makes it into a ledger.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockHash(String);

impl BlockHash {
    /// Previous-hash value carried by the genesis block.
    pub const GENESIS_PARENT: &'static str = "0";

    /// The sentinel previous hash of the genesis block.
    pub fn genesis_parent() -> Self {
        Self(Self::GENESIS_PARENT.to_string())
    }

    /// Wrap a raw 32-byte digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parse a hash from its wire form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s == Self::GENESIS_PARENT {
            return Ok(Self::genesis_parent());
        }
        if s.len() != HASH_HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: HASH_HEX_LEN,
                actual: s.len(),
            });
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TypeError::InvalidHex(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns `true` for the genesis sentinel `"0"`.
    pub fn is_genesis_parent(&self) -> bool {
        self.0 == Self::GENESIS_PARENT
    }

    /// The wire form used when hashing and serializing.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw digest bytes, or `None` for the genesis sentinel.
    pub fn to_digest(&self) -> Option<[u8; 32]> {
        let bytes = hex::decode(&self.0).ok()?;
        bytes.try_into().ok()
    }

    /// First 8 hex characters, for display.
    pub fn short_hex(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.short_hex())
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BlockHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BlockHash {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BlockHash> for String {
    fn from(hash: BlockHash) -> Self {
        hash.0
    }
}
