use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("bid response carries no seat bid")]
    MissingBid,

    #[error("bid request carries no impression")]
    MissingImpression,
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
