use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use bidchain_issuer::IssuerError;
use bidchain_ledger::InvalidChain;
use bidchain_protocol::{ErrorResponse, ProtocolError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("untrusted ledger history: {0}")]
    UntrustedHistory(InvalidChain),

    #[error("unprocessable ledger: {0}")]
    Unprocessable(String),

    #[error("no peer ad server configured")]
    PeerUnavailable,

    #[error("peer request failed: {0}")]
    Peer(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<IssuerError> for ServerError {
    fn from(err: IssuerError) -> Self {
        match err {
            IssuerError::UntrustedHistory(chain) => Self::UntrustedHistory(chain),
            IssuerError::PriceUnavailable | IssuerError::MissingImpId => {
                Self::Unprocessable(err.to_string())
            }
            IssuerError::Ledger(_) => Self::InvalidRequest(err.to_string()),
            IssuerError::Rejected(_) => Self::Internal(err.to_string()),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UntrustedHistory(_) | Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PeerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Peer(_) => StatusCode::BAD_GATEWAY,
            Self::Protocol(ProtocolError::MessageTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Protocol(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::warn!(error = %self, %status, "request refused");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bidchain_ledger::ViolationKind;

    #[test]
    fn status_mapping() {
        let chain = InvalidChain {
            position: 1,
            kind: ViolationKind::BrokenLink,
        };
        assert_eq!(
            ServerError::from(IssuerError::UntrustedHistory(chain)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ServerError::PeerUnavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ServerError::Peer("down".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ServerError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
