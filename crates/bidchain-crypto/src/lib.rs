//! Cryptographic primitives for bidchain.
//!
//! Provides the SHA-256 link hash that chains blocks together and the
//! signing capability used to authenticate transactions. Ed25519 is the
//! default scheme; ledger types only ever see opaque [`PublicKey`] and
//! [`Signature`] bytes.
//!
//! All crypto operations wrap established libraries.

pub mod hasher;
pub mod signer;

pub use hasher::{HasherError, LinkHasher};
pub use signer::{
    Ed25519, PublicKey, Signature, SignatureError, SignatureScheme, Signer, SigningKey,
    VerifyingKey,
};
