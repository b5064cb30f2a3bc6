//! Signed transaction issuer for impression price ledgers.
//!
//! An [`Issuer`] pairs a signing identity with the ledger it holds. An
//! originator starts a fresh ledger with a signed creation; a holder adopts a
//! ledger received from another party and extends it with price updates
//! signed under its own key.

pub mod error;
pub mod issuer;

pub use error::{IssuerError, IssuerResult};
pub use issuer::Issuer;

pub use bidchain_crypto::{Signer, SigningKey};
pub use bidchain_ledger::{Block, ChainVerifier, Ledger};
pub use bidchain_types::{ImpId, Price};
