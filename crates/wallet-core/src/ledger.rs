//! Hardware signer backend.
//!
//! Availability follows the host's hardware transport. Without a transport
//! every operation fails with [`WalletError::WalletUnavailable`]; with one,
//! connecting and signing are not implemented yet and fail with
//! [`WalletError::NotSupported`].

use std::sync::Arc;

use async_trait::async_trait;
use chain_cosmos::Fee;
use gov_proposals::EncodeObject;
use tracing::debug;

use crate::adapter::{WalletAccount, WalletAdapter};
use crate::broadcast::BroadcastResponse;
use crate::error::WalletError;
use crate::host::{HostEnvironment, OfflineSigner};

pub struct LedgerWallet {
    host: Arc<dyn HostEnvironment>,
}

impl LedgerWallet {
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        Self { host }
    }

    fn unsupported(&self, operation: &str) -> WalletError {
        if !self.is_available() {
            return WalletError::WalletUnavailable("no hardware transport for Ledger".into());
        }
        WalletError::NotSupported(format!("Ledger {operation} is not supported yet"))
    }
}

#[async_trait]
impl WalletAdapter for LedgerWallet {
    fn name(&self) -> &str {
        "Ledger"
    }

    fn is_available(&self) -> bool {
        self.host.has_hardware_transport()
    }

    async fn connect(&self, chain_id: &str) -> Result<WalletAccount, WalletError> {
        debug!(chain_id, "ledger connect requested");
        Err(self.unsupported("connect"))
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Ok(())
    }

    async fn get_signer(&self, _chain_id: &str) -> Result<Arc<dyn OfflineSigner>, WalletError> {
        Err(self.unsupported("signing"))
    }

    async fn sign_and_broadcast_with(
        &self,
        _signer: Arc<dyn OfflineSigner>,
        _rpc: &str,
        _chain_id: &str,
        _messages: &[EncodeObject],
        _fee: &Fee,
        _memo: &str,
    ) -> Result<BroadcastResponse, WalletError> {
        Err(self.unsupported("signing"))
    }
}
