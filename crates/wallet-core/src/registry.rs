use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::WalletAdapter;
use crate::error::WalletError;
use crate::extension::{ExtensionKind, ExtensionWallet};
use crate::host::HostEnvironment;
use crate::ledger::LedgerWallet;

/// Signing backends the UI can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Keplr,
    Leap,
    Ledger,
}

impl WalletKind {
    pub const ALL: [WalletKind; 3] = [WalletKind::Keplr, WalletKind::Leap, WalletKind::Ledger];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Keplr => "keplr",
            WalletKind::Leap => "leap",
            WalletKind::Ledger => "ledger",
        }
    }
}

impl FromStr for WalletKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| WalletError::WalletUnavailable(format!("unknown wallet '{s}'")))
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps backend identifiers to adapters.
#[derive(Default)]
pub struct WalletRegistry {
    adapters: Vec<(WalletKind, Arc<dyn WalletAdapter>)>,
}

impl WalletRegistry {
    /// Registry with every built-in backend bound to `host`.
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        let mut registry = Self::default();
        registry.register(
            WalletKind::Keplr,
            Arc::new(ExtensionWallet::new(ExtensionKind::Keplr, host.clone())),
        );
        registry.register(
            WalletKind::Leap,
            Arc::new(ExtensionWallet::new(ExtensionKind::Leap, host.clone())),
        );
        registry.register(WalletKind::Ledger, Arc::new(LedgerWallet::new(host)));
        registry
    }

    /// Adds or replaces the adapter for `kind`.
    pub fn register(&mut self, kind: WalletKind, adapter: Arc<dyn WalletAdapter>) {
        match self.adapters.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = adapter,
            None => self.adapters.push((kind, adapter)),
        }
    }

    pub fn adapter(&self, kind: WalletKind) -> Option<Arc<dyn WalletAdapter>> {
        self.adapters
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, adapter)| adapter.clone())
    }

    /// Backends that report themselves available right now.
    pub fn available(&self) -> Vec<WalletKind> {
        self.adapters
            .iter()
            .filter(|(_, adapter)| adapter.is_available())
            .map(|(kind, _)| *kind)
            .collect()
    }
}
