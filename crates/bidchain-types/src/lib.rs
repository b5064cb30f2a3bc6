//! Foundation types for bidchain.
//!
//! Small validated value types shared by every other bidchain crate.
//!
//! # Key Types
//!
//! - [`BlockHash`]: hex SHA-256 link digest (or the genesis sentinel `"0"`)
//! - [`ImpId`]: identifier of the impression a ledger tracks
//! - [`Price`]: finite, non-negative bid price with a stable text form
//! - [`Timestamp`]: wall-clock milliseconds since the UNIX epoch

pub mod error;
pub mod hash;
pub mod item;
pub mod price;
pub mod temporal;

pub use error::TypeError;
pub use hash::BlockHash;
pub use item::ImpId;
pub use price::Price;
pub use temporal::Timestamp;
