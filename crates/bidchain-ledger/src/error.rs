use std::fmt;

use bidchain_crypto::HasherError;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    RejectedLink(#[from] RejectedLink),

    #[error(transparent)]
    InvalidChain(#[from] InvalidChain),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("hashing failed: {0}")]
    Hashing(#[from] HasherError),
}

/// An append refused by the ledger. The ledger is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rejected link at index {index}: {reason}")]
pub struct RejectedLink {
    /// Index carried by the refused candidate.
    pub index: u64,
    pub reason: LinkRejection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRejection {
    /// `previousHash` does not name the current tip.
    PreviousHashMismatch,
    /// `hash` is not `H(payload, previousHash)`.
    HashMismatch,
    IndexOutOfSequence { expected: u64 },
    /// Genesis markers only ever live at index 0.
    UnexpectedGenesis,
}

impl fmt::Display for LinkRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreviousHashMismatch => write!(f, "previous hash does not match tip"),
            Self::HashMismatch => write!(f, "block hash does not match payload"),
            Self::IndexOutOfSequence { expected } => write!(f, "expected index {expected}"),
            Self::UnexpectedGenesis => write!(f, "genesis payload outside index 0"),
        }
    }
}

/// First integrity failure found by the chain verifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chain at block {position}: {kind}")]
pub struct InvalidChain {
    /// Position of the offending block in the sequence.
    pub position: usize,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    EmptyChain,
    MalformedGenesis,
    IndexGap { expected: u64, found: u64 },
    BrokenLink,
    HashMismatch,
    UnexpectedGenesis,
    BadSignature,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChain => write!(f, "ledger has no genesis block"),
            Self::MalformedGenesis => write!(f, "genesis block is malformed"),
            Self::IndexGap { expected, found } => {
                write!(f, "expected index {expected}, found {found}")
            }
            Self::BrokenLink => write!(f, "previous hash link mismatch"),
            Self::HashMismatch => write!(f, "block hash does not match computed"),
            Self::UnexpectedGenesis => write!(f, "genesis payload outside index 0"),
            Self::BadSignature => write!(f, "signature does not verify"),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
