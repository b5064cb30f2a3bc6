//! Wire protocol between bidchain ad servers.
//!
//! Defines the OpenRTB envelope that carries a price ledger in
//! `ext.blockchain`, the verification and originator request bodies, and the
//! JSON snapshot codec used whenever a ledger crosses a process boundary.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use codec::LedgerCodec;
pub use endpoint::{endpoints, HealthResponse, InfoResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    Bid, BidRequest, BidResponse, CreateBidRequest, CreateBidResponse, ErrorResponse, Imp,
    LedgerExt, SeatBid, VerifyRequest, VerifyResponse, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};
