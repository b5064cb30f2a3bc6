use serde::{Deserialize, Serialize};

use bidchain_crypto::PublicKey;

/// HTTP endpoint paths served by a bidchain ad server.
pub mod endpoints {
    pub const ORTB_BID: &str = "/ortb-bid";
    pub const VERIFY_BID: &str = "/verify-bid";
    pub const CREATE_BID: &str = "/create-bid";
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

/// Identity and wiring of a running server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub version: String,
    pub protocol_version: u32,
    /// Key this server signs price updates with.
    pub public_key: PublicKey,
    pub peer: Option<String>,
}

impl InfoResponse {
    pub fn new(public_key: PublicKey, peer: Option<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
            public_key,
            peer,
        }
    }
}
