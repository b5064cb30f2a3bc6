use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use bidchain_protocol::endpoints;

use crate::handler::{self, AppState};

/// Build the axum router with every ad server endpoint.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::ORTB_BID, post(handler::ortb_bid_handler))
        .route(endpoints::VERIFY_BID, post(handler::verify_bid_handler))
        .route(endpoints::CREATE_BID, post(handler::create_bid_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
