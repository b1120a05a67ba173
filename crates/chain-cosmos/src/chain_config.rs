use std::str::FromStr;

use bech32::Hrp;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::fee::GasPrice;

/// Definition of a Cosmos SDK chain as kept by the chain registry store.
///
/// Field names follow the store's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub bech32_prefix: String,
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u8,
    /// Gas price descriptor, e.g. `0.025uatom`.
    pub gas_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl ChainConfig {
    /// Parses a chain configuration from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        let config: ChainConfig = serde_json::from_str(json)
            .map_err(|e| ChainError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the fields the transaction core relies on.
    pub fn validate(&self) -> Result<(), ChainError> {
        let required = [
            ("chainId", &self.chain_id),
            ("rpc", &self.rpc),
            ("bech32Prefix", &self.bech32_prefix),
            ("coinMinimalDenom", &self.coin_minimal_denom),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ChainError::InvalidConfig(format!("{name} must not be empty")));
            }
        }

        Hrp::parse(&self.bech32_prefix).map_err(|e| {
            ChainError::InvalidConfig(format!("bech32Prefix '{}': {e}", self.bech32_prefix))
        })?;

        self.parsed_gas_price()
            .map_err(|e| ChainError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Parses the configured gas price.
    pub fn parsed_gas_price(&self) -> Result<GasPrice, ChainError> {
        GasPrice::from_str(&self.gas_price)
    }

    /// Whether the chain advertises a feature flag (e.g. `eth-address-gen`).
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features
            .as_deref()
            .is_some_and(|features| features.iter().any(|f| f == feature))
    }

    /// Whether accounts use Ethereum-style key derivation.
    pub fn is_evm(&self) -> bool {
        self.has_feature("eth-address-gen") || self.has_feature("eth-key-sign")
    }
}

/// Cosmos Hub mainnet.
pub fn cosmos_hub() -> ChainConfig {
    ChainConfig {
        chain_id: "cosmoshub-4".into(),
        chain_name: "Cosmos Hub".into(),
        rpc: "https://cosmos-rpc.publicnode.com".into(),
        rest: "https://cosmos-rest.publicnode.com".into(),
        bech32_prefix: "cosmos".into(),
        coin_denom: "ATOM".into(),
        coin_minimal_denom: "uatom".into(),
        coin_decimals: 6,
        gas_price: "0.025uatom".into(),
        features: None,
    }
}

/// Local Cosmos EVM devnet.
pub fn evm_devnet() -> ChainConfig {
    ChainConfig {
        chain_id: "cosmos_262144-1".into(),
        chain_name: "Cosmos EVM Devnet".into(),
        rpc: "http://localhost:26657".into(),
        rest: "http://localhost:1317".into(),
        bech32_prefix: "cosmos".into(),
        coin_denom: "TEST".into(),
        coin_minimal_denom: "atest".into(),
        coin_decimals: 18,
        gas_price: "1000000000atest".into(),
        features: Some(vec!["eth-address-gen".into(), "eth-key-sign".into()]),
    }
}
