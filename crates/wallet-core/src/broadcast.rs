use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Event attribute emitted by a delivered transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl TxEvent {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Result of a sign-and-broadcast call as reported by the signing client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    pub code: u32,
    pub transaction_hash: String,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub gas_wanted: u64,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

impl BroadcastResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Turns a non-zero response code into [`WalletError::BroadcastFailure`].
pub fn check_response(response: BroadcastResponse) -> Result<BroadcastResponse, WalletError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(WalletError::BroadcastFailure {
            code: response.code,
            raw_log: response.raw_log,
        })
    }
}

/// Finds the id of a newly submitted proposal in the `submit_proposal`
/// event. Returns `None` when the event or attribute is missing or the value
/// is not a number.
pub fn extract_proposal_id(events: &[TxEvent]) -> Option<u64> {
    events
        .iter()
        .filter(|e| e.kind == "submit_proposal")
        .find_map(|e| e.attribute("proposal_id"))
        .and_then(|id| id.trim().parse().ok())
}
