use crate::error::ChainError;

/// Maximum memo length in bytes accepted by the auth module by default.
pub const MAX_MEMO_BYTES: usize = 256;

/// Checks that a memo fits the chain's default memo limit.
pub fn validate_memo(memo: &str) -> Result<(), ChainError> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(ChainError::InvalidMemo(format!(
            "memo is {} bytes, maximum is {MAX_MEMO_BYTES}",
            memo.len()
        )));
    }
    Ok(())
}
