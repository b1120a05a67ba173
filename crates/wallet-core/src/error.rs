use std::time::Duration;

use chain_cosmos::ChainError;
use gov_proposals::MessageError;
use thiserror::Error;

use crate::host::BackendError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Wallet not available: {0}")]
    WalletUnavailable(String),

    #[error("Wallet connection failed: {0}")]
    WalletConnectionFailed(String),

    #[error("Signing rejected by user: {0}")]
    UserRejectedSigning(String),

    #[error("Insufficient funds to pay for the transaction: {0}")]
    InsufficientFunds(String),

    #[error("Transaction ran out of gas, try a higher gas limit: {0}")]
    OutOfGas(String),

    #[error("Broadcast failed with code {code}: {raw_log}")]
    BroadcastFailure { code: u32, raw_log: String },

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Backend(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Maps a backend failure onto the classified variants by matching known
/// phrases in its message. Unmatched messages pass through unchanged.
pub fn classify_backend_error(err: BackendError) -> WalletError {
    let lower = err.message.to_lowercase();
    if lower.contains("insufficient funds") {
        WalletError::InsufficientFunds(err.message)
    } else if lower.contains("out of gas") {
        WalletError::OutOfGas(err.message)
    } else if lower.contains("rejected") {
        WalletError::UserRejectedSigning(err.message)
    } else {
        WalletError::Backend(err.message)
    }
}

impl From<BackendError> for WalletError {
    fn from(err: BackendError) -> Self {
        classify_backend_error(err)
    }
}
