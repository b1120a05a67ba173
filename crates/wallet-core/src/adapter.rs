//! The contract every signing backend satisfies.

use std::sync::Arc;

use async_trait::async_trait;
use chain_cosmos::{ChainConfig, Fee, KeyAlgorithm};
use gov_proposals::EncodeObject;
use serde::Serialize;

use crate::broadcast::BroadcastResponse;
use crate::error::WalletError;
use crate::host::OfflineSigner;

/// The account a backend exposes after connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletAccount {
    pub address: String,
    /// Hex-encoded public key.
    pub pubkey: String,
    pub algorithm: KeyAlgorithm,
}

#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the backend can be used right now. Never panics.
    fn is_available(&self) -> bool;

    async fn connect(&self, chain_id: &str) -> Result<WalletAccount, WalletError>;

    /// Best effort; a local no-op for backends without a disconnect primitive.
    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Resolves the signer for `chain_id`. Backend failures are classified
    /// the same way signing failures are.
    async fn get_signer(&self, chain_id: &str) -> Result<Arc<dyn OfflineSigner>, WalletError>;

    /// Signs `messages` with an already resolved signer and broadcasts them.
    /// A non-zero response code surfaces as [`WalletError::BroadcastFailure`].
    async fn sign_and_broadcast_with(
        &self,
        signer: Arc<dyn OfflineSigner>,
        rpc: &str,
        chain_id: &str,
        messages: &[EncodeObject],
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, WalletError>;

    /// Resolves the signer, then signs and broadcasts `messages`.
    async fn sign_and_broadcast(
        &self,
        rpc: &str,
        chain_id: &str,
        messages: &[EncodeObject],
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, WalletError> {
        let signer = self.get_signer(chain_id).await?;
        self.sign_and_broadcast_with(signer, rpc, chain_id, messages, fee, memo)
            .await
    }

    fn as_chain_suggestible(&self) -> Option<&dyn ChainSuggestible> {
        None
    }

    fn as_account_watcher(&self) -> Option<&dyn AccountWatcher> {
        None
    }
}

/// Backends that can be asked to register a chain they do not know.
#[async_trait]
pub trait ChainSuggestible: Send + Sync {
    async fn suggest_chain(&self, config: &ChainConfig) -> Result<(), WalletError>;
}

/// Called with the chain id whose active account changed.
pub type AccountChangeCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Backends that notify when the user switches accounts.
///
/// A backend keeps at most one live listener: subscribing again removes the
/// previous listener, and the earlier handle becomes inert.
pub trait AccountWatcher: Send + Sync {
    fn on_account_change(
        &self,
        chain_id: &str,
        callback: AccountChangeCallback,
    ) -> AccountSubscription;
}

/// Owned handle to an account-change listener.
///
/// `dispose` removes the listener; later calls do nothing. Dropping the
/// handle disposes it.
pub struct AccountSubscription {
    disposer: Option<Box<dyn FnOnce() + Send>>,
}

impl AccountSubscription {
    pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    pub fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposer.is_none()
    }
}

impl Drop for AccountSubscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for AccountSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSubscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
