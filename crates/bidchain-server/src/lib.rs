//! HTTP ad server for bidchain.
//!
//! One binary hosts both roles of the exchange: the originator
//! (`/create-bid`) opens a ledger and offers it to a peer, and the responder
//! (`/ortb-bid`, `/verify-bid`) extends and checks ledgers offered to it.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod transport;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::BidchainServer;
pub use transport::{HttpPeer, PeerTransport};

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn app() -> axum::Router {
        BidchainServer::new(ServerConfig::default()).router().unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn info_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/v1/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/v1/receipts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}
