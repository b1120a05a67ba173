use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Dispatcher behaviour, loaded from the application's settings JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatcherConfig {
    /// Vote yes on a proposal right after submitting it.
    pub auto_vote: bool,
    pub memo: String,
    /// Per-call limit for backend calls. Unset means wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl DispatcherConfig {
    pub fn from_json(json: &str) -> Result<Self, WalletError> {
        let config: DispatcherConfig = serde_json::from_str(json)
            .map_err(|e| WalletError::Backend(format!("invalid dispatcher config: {e}")))?;
        chain_cosmos::validate_memo(&config.memo)?;
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn with_auto_vote(mut self, auto_vote: bool) -> Self {
        self.auto_vote = auto_vote;
        self
    }

    pub fn with_memo(mut self, memo: &str) -> Self {
        self.memo = memo.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }
}
