//! Gas-price parsing, fee construction and gas estimation.
//!
//! Everything here is pure: identical inputs always give identical output and
//! nothing touches the network. Gas estimation is a size-based heuristic, not a
//! chain simulation; it only aims to over-estimate safely.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coin::{parse_integer_amount, Coin};
use crate::error::ChainError;

/// Default fixed gas added to every estimate.
pub const DEFAULT_BASE_GAS: u64 = 100_000;

/// Default gas added per message.
pub const DEFAULT_PER_MESSAGE_GAS: u64 = 50_000;

/// Gas charged for every started 100 bytes of serialized message.
const GAS_PER_100_BYTES: u64 = 1_000;

/// Gas charged for a message that cannot be serialized.
pub const UNSERIALIZABLE_MESSAGE_GAS: u64 = 10_000;

/// A transaction fee as handed to a signing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granter: Option<String>,
}

impl Fee {
    /// Parses the gas limit.
    pub fn gas_limit(&self) -> Result<u64, ChainError> {
        parse_gas(&self.gas)
    }
}

/// A price per unit of gas, e.g. `0.025uatom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub amount: Decimal,
    pub denom: String,
}

impl GasPrice {
    /// Returns the price scaled by `factor`, used for low/average/high steps.
    pub fn scaled(&self, factor: Decimal) -> GasPrice {
        GasPrice {
            amount: (self.amount * factor).normalize(),
            denom: self.denom.clone(),
        }
    }
}

impl FromStr for GasPrice {
    type Err = ChainError;

    /// Parses `<digits>[.<digits>]<denom>`; the denom must start with a letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        if int_len == 0 {
            return Err(ChainError::InvalidGasPrice(format!(
                "'{s}' must start with a number"
            )));
        }

        let mut numeric_len = int_len;
        let rest = &s[int_len..];
        if let Some(fraction) = rest.strip_prefix('.') {
            let frac_len = fraction.bytes().take_while(u8::is_ascii_digit).count();
            if frac_len == 0 {
                return Err(ChainError::InvalidGasPrice(format!(
                    "'{s}' has an empty fractional part"
                )));
            }
            numeric_len += 1 + frac_len;
        }

        let (number, denom) = s.split_at(numeric_len);
        if !denom.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ChainError::InvalidGasPrice(format!(
                "'{s}' is missing a denom"
            )));
        }

        let amount = Decimal::from_str(number)
            .map_err(|e| ChainError::InvalidGasPrice(format!("'{s}': {e}")))?;

        Ok(GasPrice {
            amount,
            denom: denom.to_string(),
        })
    }
}

impl std::fmt::Display for GasPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount.normalize(), self.denom)
    }
}

/// Builds a fee paying `ceil(gas_limit * price)` in the gas price's denom.
pub fn build_fee(
    gas_limit: u64,
    gas_price: &str,
    payer: Option<String>,
    granter: Option<String>,
) -> Result<Fee, ChainError> {
    let coin = fee_amount(gas_limit, gas_price)?;

    Ok(Fee {
        amount: vec![coin],
        gas: gas_limit.to_string(),
        payer,
        granter,
    })
}

/// Computes the single fee coin for `gas_limit` at `gas_price`.
pub fn fee_amount(gas_limit: u64, gas_price: &str) -> Result<Coin, ChainError> {
    if gas_limit == 0 {
        return Err(ChainError::InvalidFeeStructure(
            "gas limit must be positive".into(),
        ));
    }

    let price = GasPrice::from_str(gas_price)?;
    let total = Decimal::from(gas_limit)
        .checked_mul(price.amount)
        .ok_or_else(|| {
            ChainError::InvalidFeeStructure(format!("fee for {gas_limit} gas overflows"))
        })?
        .ceil();
    let amount = total.to_u128().ok_or_else(|| {
        ChainError::InvalidFeeStructure(format!("fee amount {total} out of range"))
    })?;

    Ok(Coin::new(amount.to_string(), price.denom))
}

/// Checks a fee before it is handed to a signing backend.
pub fn validate_fee(fee: &Fee) -> Result<(), ChainError> {
    if fee.amount.is_empty() {
        return Err(ChainError::InvalidFeeStructure(
            "fee amount must contain at least one coin".into(),
        ));
    }

    for coin in &fee.amount {
        if coin.denom.is_empty() {
            return Err(ChainError::InvalidFeeStructure("fee coin is missing a denom".into()));
        }
        parse_integer_amount(&coin.amount).map_err(|_| {
            ChainError::InvalidFeeStructure(format!(
                "fee coin amount '{}' must be a non-negative integer",
                coin.amount
            ))
        })?;
    }

    parse_gas(&fee.gas)?;
    Ok(())
}

fn parse_gas(gas: &str) -> Result<u64, ChainError> {
    match gas.parse::<u64>() {
        Ok(0) | Err(_) => Err(ChainError::InvalidFeeStructure(format!(
            "gas '{gas}' must be a positive integer"
        ))),
        Ok(value) => Ok(value),
    }
}

/// Tunables for [`estimate_gas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasEstimateParams {
    pub base_gas: u64,
    pub per_message_gas: u64,
    pub buffer: Decimal,
}

impl Default for GasEstimateParams {
    fn default() -> Self {
        Self {
            base_gas: DEFAULT_BASE_GAS,
            per_message_gas: DEFAULT_PER_MESSAGE_GAS,
            buffer: Decimal::new(12, 1),
        }
    }
}

/// Estimates a gas limit for `messages`.
///
/// `base + per_message * n + sum(ceil(json_len / 100) * 1000)`, multiplied by
/// the buffer and rounded up.
pub fn estimate_gas<M: Serialize>(messages: &[M], params: &GasEstimateParams) -> u64 {
    let size_gas: u64 = messages
        .iter()
        .map(|m| match serde_json::to_vec(m) {
            Ok(bytes) => (bytes.len() as u64).div_ceil(100) * GAS_PER_100_BYTES,
            Err(_) => UNSERIALIZABLE_MESSAGE_GAS,
        })
        .sum();

    let gas = params.base_gas + params.per_message_gas * messages.len() as u64 + size_gas;

    Decimal::from(gas)
        .checked_mul(params.buffer)
        .and_then(|buffered| buffered.ceil().to_u64())
        .unwrap_or(u64::MAX)
}
