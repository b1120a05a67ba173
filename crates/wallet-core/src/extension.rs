//! Browser-extension wallets (Keplr, Leap).
//!
//! Both extensions expose the same provider surface; they differ only in the
//! global object name and the key-store change event.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chain_cosmos::{
    decode_bech32, pubkey_to_address_bytes, ChainConfig, ChainError, Fee,
};
use gov_proposals::EncodeObject;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adapter::{
    AccountChangeCallback, AccountSubscription, AccountWatcher, ChainSuggestible, WalletAccount,
    WalletAdapter,
};
use crate::broadcast::{check_response, BroadcastResponse};
use crate::error::{classify_backend_error, WalletError};
use crate::host::{
    AccountData, BackendError, ExtensionProvider, HostEnvironment, ListenerId, OfflineSigner,
};

/// BIP-44 coin type registered for suggested chains.
pub const SUGGESTED_COIN_TYPE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtensionKind {
    Keplr,
    Leap,
}

impl ExtensionKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExtensionKind::Keplr => "Keplr",
            ExtensionKind::Leap => "Leap",
        }
    }

    /// Name of the injected global object.
    pub fn global_object(&self) -> &'static str {
        match self {
            ExtensionKind::Keplr => "keplr",
            ExtensionKind::Leap => "leap",
        }
    }

    /// Event fired when the user switches accounts in the extension.
    pub fn keystore_event(&self) -> &'static str {
        match self {
            ExtensionKind::Keplr => "keplr_keystorechange",
            ExtensionKind::Leap => "leap_keystorechange",
        }
    }
}

pub struct ExtensionWallet {
    kind: ExtensionKind,
    host: Arc<dyn HostEnvironment>,
    /// Listener registered by the latest `on_account_change`.
    account_listener: Arc<Mutex<Option<ListenerId>>>,
}

impl ExtensionWallet {
    pub fn new(kind: ExtensionKind, host: Arc<dyn HostEnvironment>) -> Self {
        Self {
            kind,
            host,
            account_listener: Arc::new(Mutex::new(None)),
        }
    }

    pub fn keplr(host: Arc<dyn HostEnvironment>) -> Self {
        Self::new(ExtensionKind::Keplr, host)
    }

    pub fn leap(host: Arc<dyn HostEnvironment>) -> Self {
        Self::new(ExtensionKind::Leap, host)
    }

    pub fn kind(&self) -> ExtensionKind {
        self.kind
    }

    fn provider(&self) -> Result<Arc<dyn ExtensionProvider>, WalletError> {
        self.host
            .extension(self.kind.global_object())
            .ok_or_else(|| {
                WalletError::WalletUnavailable(format!(
                    "{} extension is not installed",
                    self.kind.display_name()
                ))
            })
    }

    /// Enables `chain_id` and fetches its offline signer. Backend failures
    /// go through `on_error`.
    async fn enabled_signer<F>(
        &self,
        chain_id: &str,
        on_error: F,
    ) -> Result<Arc<dyn OfflineSigner>, WalletError>
    where
        F: Fn(BackendError) -> WalletError + Send + Sync,
    {
        let provider = self.provider()?;
        provider.enable(chain_id).await.map_err(&on_error)?;
        provider
            .get_offline_signer(chain_id)
            .await
            .map_err(&on_error)
    }

    async fn first_account<F>(
        &self,
        signer: &dyn OfflineSigner,
        on_error: F,
    ) -> Result<AccountData, WalletError>
    where
        F: Fn(BackendError) -> WalletError + Send + Sync,
    {
        let accounts = signer.get_accounts().await.map_err(on_error)?;
        accounts.into_iter().next().ok_or_else(|| {
            WalletError::WalletConnectionFailed(format!(
                "{} exposed no accounts",
                self.kind.display_name()
            ))
        })
    }
}

/// Checks that the reported address belongs to the reported public key.
/// Accounts without a public key are accepted as is.
fn verify_account(account: &AccountData) -> Result<(), ChainError> {
    if account.pubkey.is_empty() {
        return Ok(());
    }
    let derived = pubkey_to_address_bytes(&account.pubkey, account.algo)?;
    let reported = decode_bech32(&account.address, None)?;
    if reported != derived {
        return Err(ChainError::AddressFormat(format!(
            "{} does not match its public key",
            account.address
        )));
    }
    Ok(())
}

#[async_trait]
impl WalletAdapter for ExtensionWallet {
    fn name(&self) -> &str {
        self.kind.display_name()
    }

    fn is_available(&self) -> bool {
        self.host.extension(self.kind.global_object()).is_some()
    }

    async fn connect(&self, chain_id: &str) -> Result<WalletAccount, WalletError> {
        if !self.is_available() {
            return Err(WalletError::WalletUnavailable(format!(
                "{} extension is not installed",
                self.kind.display_name()
            )));
        }

        let name = self.kind.display_name();
        let connection_failed =
            |e: BackendError| WalletError::WalletConnectionFailed(format!("{name}: {e}"));
        let signer = self.enabled_signer(chain_id, connection_failed).await?;
        let account = self
            .first_account(signer.as_ref(), connection_failed)
            .await?;
        verify_account(&account)
            .map_err(|e| WalletError::WalletConnectionFailed(e.to_string()))?;

        info!(wallet = self.name(), chain_id, address = %account.address, "wallet connected");
        Ok(WalletAccount {
            address: account.address,
            pubkey: hex::encode(&account.pubkey),
            algorithm: account.algo,
        })
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        debug!(wallet = self.name(), "extension has no disconnect, nothing to do");
        Ok(())
    }

    async fn get_signer(&self, chain_id: &str) -> Result<Arc<dyn OfflineSigner>, WalletError> {
        self.enabled_signer(chain_id, classify_backend_error).await
    }

    async fn sign_and_broadcast_with(
        &self,
        signer: Arc<dyn OfflineSigner>,
        rpc: &str,
        chain_id: &str,
        messages: &[EncodeObject],
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, WalletError> {
        let account = self
            .first_account(signer.as_ref(), classify_backend_error)
            .await?;

        let client = self
            .host
            .signing_client_connector()
            .connect_with_signer(rpc, signer)
            .await
            .map_err(classify_backend_error)?;

        debug!(
            wallet = self.name(),
            chain_id,
            messages = messages.len(),
            gas = %fee.gas,
            "signing transaction"
        );
        let response = client
            .sign_and_broadcast(&account.address, messages, fee, memo)
            .await
            .map_err(|e| {
                warn!(wallet = self.name(), error = %e, "sign and broadcast failed");
                classify_backend_error(e)
            })?;

        let response = check_response(response)?;
        info!(
            wallet = self.name(),
            tx_hash = %response.transaction_hash,
            height = response.height,
            "transaction broadcast"
        );
        Ok(response)
    }

    fn as_chain_suggestible(&self) -> Option<&dyn ChainSuggestible> {
        Some(self)
    }

    fn as_account_watcher(&self) -> Option<&dyn AccountWatcher> {
        Some(self)
    }
}

#[async_trait]
impl ChainSuggestible for ExtensionWallet {
    async fn suggest_chain(&self, config: &ChainConfig) -> Result<(), WalletError> {
        let info = ChainInfo::from_config(config)?;
        let provider = self.provider()?;
        provider
            .experimental_suggest_chain(&info)
            .await
            .map_err(classify_backend_error)?;
        info!(wallet = self.name(), chain_id = %config.chain_id, "chain suggested");
        Ok(())
    }
}

impl AccountWatcher for ExtensionWallet {
    fn on_account_change(
        &self,
        chain_id: &str,
        callback: AccountChangeCallback,
    ) -> AccountSubscription {
        let bus = self.host.event_bus();
        let event = self.kind.keystore_event();
        let chain = chain_id.to_string();

        let mut active = self
            .account_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.take() {
            debug!(event, listener = previous, "replacing account listener");
            bus.remove_listener(event, previous);
        }

        let id = bus.add_listener(
            event,
            Arc::new(move || {
                debug!(event, chain_id = %chain, "key store changed");
                callback(&chain);
            }),
        );
        *active = Some(id);

        let slot = self.account_listener.clone();
        AccountSubscription::new(move || {
            let mut active = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if *active == Some(id) {
                bus.remove_listener(event, id);
                *active = None;
            }
        })
    }
}

/// Chain description in the shape `experimentalSuggestChain` expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: Vec<Currency>,
    pub fee_currencies: Vec<FeeCurrency>,
    pub stake_currency: Currency,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    pub coin_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: String,
    pub bech32_prefix_acc_pub: String,
    pub bech32_prefix_val_addr: String,
    pub bech32_prefix_val_pub: String,
    pub bech32_prefix_cons_addr: String,
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    /// Standard SDK sub-prefixes derived from the account prefix.
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_string(),
            bech32_prefix_acc_pub: format!("{prefix}pub"),
            bech32_prefix_val_addr: format!("{prefix}valoper"),
            bech32_prefix_val_pub: format!("{prefix}valoperpub"),
            bech32_prefix_cons_addr: format!("{prefix}valcons"),
            bech32_prefix_cons_pub: format!("{prefix}valconspub"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCurrency {
    #[serde(flatten)]
    pub currency: Currency,
    pub gas_price_step: GasPriceStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasPriceStep {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

impl ChainInfo {
    /// Translates a stored chain configuration. Gas price steps are the
    /// configured price scaled by 1, 1.25 and 1.5.
    pub fn from_config(config: &ChainConfig) -> Result<Self, ChainError> {
        config.validate()?;
        let gas_price = config.parsed_gas_price()?;

        let step = |factor: Decimal| -> Result<f64, ChainError> {
            gas_price.scaled(factor).amount.to_f64().ok_or_else(|| {
                ChainError::InvalidGasPrice(format!("{gas_price} is out of range"))
            })
        };

        let currency = Currency {
            coin_denom: config.coin_denom.clone(),
            coin_minimal_denom: config.coin_minimal_denom.clone(),
            coin_decimals: config.coin_decimals,
        };

        Ok(ChainInfo {
            chain_id: config.chain_id.clone(),
            chain_name: config.chain_name.clone(),
            rpc: config.rpc.clone(),
            rest: config.rest.clone(),
            bip44: Bip44 {
                coin_type: SUGGESTED_COIN_TYPE,
            },
            bech32_config: Bech32Config::from_prefix(&config.bech32_prefix),
            currencies: vec![currency.clone()],
            fee_currencies: vec![FeeCurrency {
                currency: currency.clone(),
                gas_price_step: GasPriceStep {
                    low: step(Decimal::ONE)?,
                    average: step(Decimal::new(125, 2))?,
                    high: step(Decimal::new(15, 1))?,
                },
            }],
            stake_currency: currency,
            features: config.features.clone().unwrap_or_default(),
        })
    }
}
