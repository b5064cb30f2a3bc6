//! Hash-linked price ledger for a single ad impression.
//!
//! This crate provides:
//! - Block and transaction types with their JSON wire form
//! - The append-only [`Ledger`] with genesis creation and link checks
//! - Price resolution over the ledger tip
//! - The [`ChainVerifier`] (genesis, links, hashes, signatures)

pub mod error;
pub mod ledger;
pub mod records;
pub mod validation;

pub use error::{
    InvalidChain, LedgerError, LedgerResult, LinkRejection, RejectedLink, ViolationKind,
};
pub use ledger::Ledger;
pub use records::{
    signed_message, Block, Creation, Genesis, Payload, PriceUpdate, Transaction, TransactionKind,
};
pub use validation::ChainVerifier;
