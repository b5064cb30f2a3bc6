use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use bidchain_crypto::{Signer, SigningKey};
use bidchain_issuer::Issuer;
use bidchain_ledger::ChainVerifier;
use bidchain_protocol::{
    BidRequest, BidResponse, CreateBidRequest, CreateBidResponse, HealthResponse, InfoResponse,
    VerifyRequest, VerifyResponse,
};
use bidchain_types::ImpId;

use crate::error::{ServerError, ServerResult};
use crate::transport::PeerTransport;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Key this server signs price updates with.
    pub keys: Arc<SigningKey>,
    pub peer: Option<Arc<dyn PeerTransport>>,
}

impl AppState {
    pub fn new(keys: Arc<SigningKey>, peer: Option<Arc<dyn PeerTransport>>) -> Self {
        Self { keys, peer }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<InfoResponse> {
    let peer = state.peer.as_ref().map(|p| p.base_url().to_string());
    Json(InfoResponse::new(state.keys.public_key(), peer))
}

/// Responder role: adopt the offered ledger and append a price update at the
/// request's floor, signed with this server's key.
pub async fn ortb_bid_handler(
    State(state): State<AppState>,
    Json(request): Json<BidRequest>,
) -> ServerResult<Json<BidResponse>> {
    let bidfloor = request
        .bidfloor()
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
    let imp_id =
        ImpId::new(request.id).map_err(|e| ServerError::InvalidRequest(e.to_string()))?;

    let mut issuer = Issuer::holder(
        Arc::clone(&state.keys),
        Some(imp_id.clone()),
        request.ext.blockchain,
    )?;
    let block = issuer.issue_price_update(bidfloor)?;
    tracing::info!(
        imp_id = %imp_id,
        price = %bidfloor,
        index = block.index,
        "extended bid ledger"
    );

    let blocks = issuer.into_ledger().into_blocks();
    Ok(Json(BidResponse::for_ledger(&imp_id, bidfloor, blocks)))
}

pub async fn verify_bid_handler(Json(request): Json<VerifyRequest>) -> Json<VerifyResponse> {
    let result = ChainVerifier::verify(&request.bid_chain);
    match &result {
        Ok(()) => tracing::info!(blocks = request.bid_chain.len(), "ledger verified"),
        Err(violation) => tracing::info!(%violation, "ledger failed verification"),
    }
    Json(VerifyResponse {
        is_valid: result.is_ok(),
    })
}

/// Originator role: open a ledger for the impression, offer it to the peer,
/// then check the returned ledger locally and remotely.
pub async fn create_bid_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateBidRequest>,
) -> ServerResult<Json<CreateBidResponse>> {
    let peer = state.peer.as_ref().ok_or(ServerError::PeerUnavailable)?;

    let blocks = Issuer::create(Some(request.imp_id.clone()), Some(request.initial_price))?
        .into_ledger()
        .into_blocks();
    let bid_request = BidRequest::for_ledger(&request.imp_id, request.initial_price, blocks);

    let ortb_response = peer.ortb_bid(&bid_request).await?;
    let chain = ortb_response
        .ledger()
        .map_err(|e| ServerError::Peer(e.to_string()))?
        .to_vec();

    let is_valid_local = ChainVerifier::validate_blocks(&chain);
    let is_valid_remote = peer
        .verify_bid(&VerifyRequest { bid_chain: chain })
        .await?
        .is_valid;
    tracing::info!(
        imp_id = %request.imp_id,
        is_valid_local,
        is_valid_remote,
        "bid round trip complete"
    );

    Ok(Json(CreateBidResponse {
        ortb_response,
        is_valid_local,
        is_valid_remote,
    }))
}
