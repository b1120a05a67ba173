//! Parameter-change selections and their grouping into `MsgUpdateParams`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MessageError;
use crate::messages::{ParamsModule, ProposalMessage, RESERVED_FIELDS};

/// One field on one module to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSelection {
    pub module: String,
    pub parameter: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSelection {
    pub fn new(module: &str, parameter: &str, value: Value) -> Self {
        Self {
            module: module.to_string(),
            parameter: parameter.to_string(),
            value,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Groups selections by module, keeping the order in which each module first
/// appears, and merges each group's parameters into one object.
pub fn group_by_module(selections: &[ParameterSelection]) -> Vec<(String, Map<String, Value>)> {
    let mut groups: Vec<(String, Map<String, Value>)> = Vec::new();

    for selection in selections {
        let idx = match groups.iter().position(|(m, _)| *m == selection.module) {
            Some(idx) => idx,
            None => {
                groups.push((selection.module.clone(), Map::new()));
                groups.len() - 1
            }
        };
        groups[idx]
            .1
            .insert(selection.parameter.clone(), selection.value.clone());
    }

    groups
}

/// Emits one `MsgUpdateParams` per distinct module.
///
/// An unrecognised module name fails the whole build.
pub fn build_parameter_change_messages(
    selections: &[ParameterSelection],
    authority: &str,
) -> Result<Vec<ProposalMessage>, MessageError> {
    group_by_module(selections)
        .into_iter()
        .map(|(module, params)| {
            let module: ParamsModule = module.parse()?;
            check_reserved_fields(module, &params)?;
            Ok(ProposalMessage::UpdateParams {
                module,
                authority: authority.to_string(),
                params,
            })
        })
        .collect()
}

/// Consensus params sit beside `authority` and `@type`, so those names cannot
/// be selected as parameters.
fn check_reserved_fields(
    module: ParamsModule,
    params: &Map<String, Value>,
) -> Result<(), MessageError> {
    if module != ParamsModule::Consensus {
        return Ok(());
    }
    match params.keys().find(|k| RESERVED_FIELDS.contains(&k.as_str())) {
        Some(key) => Err(MessageError::InvalidMessageStructure(format!(
            "'{key}' is not a consensus parameter"
        ))),
        None => Ok(()),
    }
}

/// Builds `MsgUpdateParams` for a standard SDK module (gov, bank, staking,
/// distribution, slashing, mint, consensus).
pub fn build_standard_module_params_message(
    module: &str,
    authority: &str,
    params: Map<String, Value>,
) -> Result<ProposalMessage, MessageError> {
    let parsed: ParamsModule = module.parse()?;
    if !parsed.is_standard() {
        return Err(MessageError::UnknownModule(format!(
            "{module} is not a standard SDK module"
        )));
    }
    check_reserved_fields(parsed, &params)?;

    Ok(ProposalMessage::UpdateParams {
        module: parsed,
        authority: authority.to_string(),
        params,
    })
}
