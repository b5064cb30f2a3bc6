use thiserror::Error;

use bidchain_ledger::{InvalidChain, LedgerError, RejectedLink};

#[derive(Debug, Error)]
pub enum IssuerError {
    #[error("ledger refused block: {0}")]
    Rejected(#[from] RejectedLink),

    #[error("held ledger failed verification: {0}")]
    UntrustedHistory(#[source] InvalidChain),

    #[error("no current price: ledger holds no creation at index 1")]
    PriceUnavailable,

    #[error("no impression id configured and none found in the ledger")]
    MissingImpId,

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

pub type IssuerResult<T> = Result<T, IssuerError>;
