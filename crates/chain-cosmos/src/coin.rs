use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// A token amount in a given denomination.
///
/// `amount` is kept as the decimal string the chain expects. Many call sites
/// treat a zero amount as "unset".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub amount: String,
    pub denom: String,
}

impl Coin {
    pub fn new(amount: impl Into<String>, denom: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            denom: denom.into(),
        }
    }

    /// Parses the amount as a non-negative integer.
    pub fn parse_amount(&self) -> Result<u128, ChainError> {
        parse_integer_amount(&self.amount)
    }

    /// Whether the amount parses to zero.
    pub fn is_zero(&self) -> bool {
        matches!(self.parse_amount(), Ok(0))
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Largest decimals value representable by the exact decimal type.
pub const MAX_DECIMALS: u32 = 28;

/// Parses an integer amount string (digits only, no sign).
pub fn parse_integer_amount(amount: &str) -> Result<u128, ChainError> {
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        return Err(ChainError::InvalidAmount(format!(
            "'{amount}' is not a non-negative integer"
        )));
    }

    amount
        .parse::<u128>()
        .map_err(|e| ChainError::InvalidAmount(format!("'{amount}': {e}")))
}

/// Converts a user-facing amount (e.g. `"1.5"`) into base units given the
/// token's decimals (e.g. `"1500000"` for 6 decimals).
///
/// Amounts with more fractional digits than `decimals` are rejected rather
/// than rounded.
pub fn to_base_units(display: &str, decimals: u32) -> Result<String, ChainError> {
    let value = Decimal::from_str(display.trim())
        .map_err(|e| ChainError::InvalidAmount(format!("'{display}': {e}")))?;

    if value.is_sign_negative() {
        return Err(ChainError::InvalidAmount(format!("'{display}' is negative")));
    }

    if value.normalize().scale() > decimals {
        return Err(ChainError::InvalidAmount(format!(
            "'{display}' has more than {decimals} decimal places"
        )));
    }

    if decimals > MAX_DECIMALS {
        return Err(ChainError::InvalidAmount(format!(
            "{decimals} decimals exceeds the supported maximum of {MAX_DECIMALS}"
        )));
    }

    let multiplier = Decimal::from_i128_with_scale(10i128.pow(decimals), 0);
    let base = value
        .checked_mul(multiplier)
        .ok_or_else(|| ChainError::InvalidAmount(format!("'{display}' overflows")))?;

    Ok(base.normalize().trunc().to_string())
}

/// Converts an integer base-unit amount into its user-facing decimal form.
pub fn to_display_units(base: &str, decimals: u32) -> Result<String, ChainError> {
    let raw = parse_integer_amount(base)?;
    let raw = i128::try_from(raw)
        .map_err(|_| ChainError::InvalidAmount(format!("'{base}' overflows")))?;

    let value = Decimal::try_from_i128_with_scale(raw, decimals)
        .map_err(|e| ChainError::InvalidAmount(format!("'{base}': {e}")))?;

    Ok(value.normalize().to_string())
}
