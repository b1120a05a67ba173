use thiserror::Error;

/// Cosmos chain operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("invalid address: {0}")]
    AddressFormat(String),

    #[error("invalid gas price: {0}")]
    InvalidGasPrice(String),

    #[error("invalid fee: {0}")]
    InvalidFeeStructure(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid memo: {0}")]
    InvalidMemo(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid chain config: {0}")]
    InvalidConfig(String),
}
