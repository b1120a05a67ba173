//! Input checks run by callers before invoking the builders.
//!
//! Builders take their inputs as given; this module is where opaque JSON,
//! addresses and selection sets are rejected.

use std::collections::HashSet;

use chain_cosmos::decode_bech32;
use serde_json::Value;

use crate::error::MessageError;
use crate::messages::ProposalMessage;
use crate::params::ParameterSelection;

/// Parses software-upgrade info. An empty string is allowed; anything else
/// must be a JSON object.
pub fn parse_upgrade_info(info: &str) -> Result<Option<Value>, MessageError> {
    if info.trim().is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(info).map_err(|e| MessageError::JsonParse(e.to_string()))?;
    if !value.is_object() {
        return Err(MessageError::InvalidMessageStructure(
            "upgrade info must be a JSON object".into(),
        ));
    }
    Ok(Some(value))
}

/// Parses a caller-supplied message. Accepts either proto-JSON
/// (`{"@type": ..., fields...}`) or the encode form (`{"typeUrl": ..., "value": {...}}`).
pub fn parse_custom_message(json: &str) -> Result<ProposalMessage, MessageError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| MessageError::JsonParse(e.to_string()))?;

    let Value::Object(mut map) = value else {
        return Err(MessageError::InvalidMessageStructure(
            "custom message must be a JSON object".into(),
        ));
    };

    if let Some(Value::String(type_url)) = map.get("typeUrl").cloned() {
        let inner = map.remove("value").unwrap_or(Value::Null);
        return ProposalMessage::custom(&type_url, inner);
    }

    let type_url = match map.get("@type") {
        Some(Value::String(type_url)) => type_url.clone(),
        _ => {
            return Err(MessageError::InvalidMessageStructure(
                "custom message needs an @type or typeUrl field".into(),
            ))
        }
    };
    ProposalMessage::custom(&type_url, Value::Object(map))
}

/// Rejects a selection set naming the same (module, parameter) twice.
pub fn check_unique_selections(selections: &[ParameterSelection]) -> Result<(), MessageError> {
    let mut seen = HashSet::new();
    for s in selections {
        if !seen.insert((s.module.as_str(), s.parameter.as_str())) {
            return Err(MessageError::DuplicateParameter {
                module: s.module.clone(),
                parameter: s.parameter.clone(),
            });
        }
    }
    Ok(())
}

/// Checks that `address` is a bech32 account address under `prefix`.
pub fn validate_address(address: &str, prefix: &str) -> Result<(), MessageError> {
    decode_bech32(address, Some(prefix))?;
    Ok(())
}
