//! Interfaces to the environment hosting the signing backends.
//!
//! Extensions, the key-store event bus, the hardware transport and the
//! signing client are all provided by the embedding application through
//! [`HostEnvironment`], so adapters never look up globals themselves.

use std::sync::Arc;

use async_trait::async_trait;
use chain_cosmos::{Fee, KeyAlgorithm};
use gov_proposals::EncodeObject;
use thiserror::Error;

use crate::broadcast::BroadcastResponse;
use crate::extension::ChainInfo;

/// Failure raised by a host-provided object. Only the message text is
/// relied upon, see [`crate::error::classify_backend_error`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An account as reported by an offline signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    pub address: String,
    pub algo: KeyAlgorithm,
    /// SEC1-encoded public key.
    pub pubkey: Vec<u8>,
}

#[async_trait]
pub trait OfflineSigner: Send + Sync {
    async fn get_accounts(&self) -> Result<Vec<AccountData>, BackendError>;
}

/// The global object a browser extension injects.
#[async_trait]
pub trait ExtensionProvider: Send + Sync {
    async fn enable(&self, chain_id: &str) -> Result<(), BackendError>;

    async fn get_offline_signer(
        &self,
        chain_id: &str,
    ) -> Result<Arc<dyn OfflineSigner>, BackendError>;

    async fn experimental_suggest_chain(&self, chain_info: &ChainInfo) -> Result<(), BackendError>;
}

pub type ListenerId = u64;
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Generic named-event listener registry.
pub trait EventBus: Send + Sync {
    fn add_listener(&self, event: &str, listener: Listener) -> ListenerId;

    fn remove_listener(&self, event: &str, id: ListenerId);
}

/// A client bound to one RPC endpoint and one signer.
#[async_trait]
pub trait SigningClient: Send + Sync {
    async fn sign_and_broadcast(
        &self,
        signer_address: &str,
        messages: &[EncodeObject],
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, BackendError>;
}

#[async_trait]
pub trait SigningClientConnector: Send + Sync {
    async fn connect_with_signer(
        &self,
        rpc: &str,
        signer: Arc<dyn OfflineSigner>,
    ) -> Result<Box<dyn SigningClient>, BackendError>;
}

pub trait HostEnvironment: Send + Sync {
    /// Looks up an extension by its global object name (`keplr`, `leap`).
    fn extension(&self, global_name: &str) -> Option<Arc<dyn ExtensionProvider>>;

    fn event_bus(&self) -> Arc<dyn EventBus>;

    /// Whether a hardware-wallet transport (e.g. WebHID) can be opened.
    fn has_hardware_transport(&self) -> bool;

    fn signing_client_connector(&self) -> Arc<dyn SigningClientConnector>;
}
