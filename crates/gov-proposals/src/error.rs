use chain_cosmos::ChainError;
use thiserror::Error;

/// Proposal and message construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("unknown parameter module: {0}")]
    UnknownModule(String),

    #[error("duplicate parameter selection: {module}.{parameter}")]
    DuplicateParameter { module: String, parameter: String },

    #[error("invalid message structure: {0}")]
    InvalidMessageStructure(String),

    #[error("invalid JSON: {0}")]
    JsonParse(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
