//! Cosmos SDK chain support for the governance wallet.
//!
//! This crate provides:
//! - Conversion between bech32 account addresses and `0x` hex addresses
//! - Account-id derivation from backend-reported public keys
//! - Gas-price parsing, fee construction, fee validation and gas estimation
//! - Coin amounts and display/base unit conversion
//! - Memo limits
//! - Chain configuration as produced by the chain registry store

pub mod address;
pub mod chain_config;
pub mod coin;
pub mod error;
pub mod fee;
pub mod memo;

pub use address::{
    bech32_to_hex, convert_prefix, decode_bech32, encode_bech32, from_hex, hex_to_bech32,
    is_valid_bech32, is_valid_hex, module_address, prefix_of, pubkey_to_address_bytes, shorten,
    to_checksum_hex, to_hex, KeyAlgorithm, ADDRESS_LEN,
};
pub use chain_config::ChainConfig;
pub use coin::{to_base_units, to_display_units, Coin};
pub use error::ChainError;
pub use fee::{
    build_fee, estimate_gas, fee_amount, validate_fee, Fee, GasEstimateParams, GasPrice,
};
pub use memo::validate_memo;
