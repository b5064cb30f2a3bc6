use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use bidchain_crypto::{Signer, SigningKey};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;
use crate::transport::{HttpPeer, PeerTransport};

/// An ad server able to act as originator, responder, or both.
pub struct BidchainServer {
    config: ServerConfig,
    keys: Arc<SigningKey>,
}

impl BidchainServer {
    /// Server with a freshly generated signing key.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_keys(config, SigningKey::generate())
    }

    pub fn with_keys(config: ServerConfig, keys: SigningKey) -> Self {
        Self {
            config,
            keys: Arc::new(keys),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let peer = match &self.config.peer_url {
            Some(url) => {
                let peer = HttpPeer::new(url.as_str(), self.config.request_timeout())?;
                Some(Arc::new(peer) as Arc<dyn PeerTransport>)
            }
            None => None,
        };
        let state = AppState::new(Arc::clone(&self.keys), peer);
        Ok(build_router(state, self.config.max_body_bytes))
    }

    /// Bind the configured address and serve until the process stops.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        let app = self.router()?;
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!(
            %addr,
            public_key = %self.keys.public_key().to_hex(),
            peer = self.config.peer_url.as_deref().unwrap_or("none"),
            "bidchain server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
