use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use bidchain_protocol::{
    endpoints, BidRequest, BidResponse, LedgerCodec, VerifyRequest, VerifyResponse,
};

use crate::error::{ServerError, ServerResult};

/// The responding ad server, as seen from the originator.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Offer a ledger for bidding; the peer returns it extended.
    async fn ortb_bid(&self, request: &BidRequest) -> ServerResult<BidResponse>;

    /// Ask the peer to run its own chain verification.
    async fn verify_bid(&self, request: &VerifyRequest) -> ServerResult<VerifyResponse>;

    fn base_url(&self) -> &str;
}

/// [`PeerTransport`] over HTTP/JSON.
pub struct HttpPeer {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpPeer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ServerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> ServerResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "calling peer");

        let resp = self.client.post(&url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                ServerError::Peer(format!("{url} timed out after {:?}", self.timeout))
            } else {
                ServerError::Peer(format!("{url}: {e}"))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ServerError::Peer(format!("{url} returned {status}: {detail}")));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ServerError::Peer(format!("{url}: reading body: {e}")))?;
        LedgerCodec::decode_message(&bytes)
            .map_err(|e| ServerError::Peer(format!("{url}: malformed response: {e}")))
    }
}

#[async_trait]
impl PeerTransport for HttpPeer {
    async fn ortb_bid(&self, request: &BidRequest) -> ServerResult<BidResponse> {
        self.post_json(endpoints::ORTB_BID, request).await
    }

    async fn verify_bid(&self, request: &VerifyRequest) -> ServerResult<VerifyResponse> {
        self.post_json(endpoints::VERIFY_BID, request).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let peer = HttpPeer::new("http://localhost:3001/", Duration::from_secs(1)).unwrap();
        assert_eq!(peer.base_url(), "http://localhost:3001");
    }

    #[tokio::test]
    async fn unreachable_peer_is_peer_error() {
        let peer = HttpPeer::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = peer
            .verify_bid(&VerifyRequest { bid_chain: vec![] })
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Peer(_)));
    }
}
