//! Human-readable titles and summaries derived from proposal messages.
//!
//! Output is deterministic for a given input. Values without a dedicated
//! rendering fall back to compact JSON.

use chain_cosmos::Coin;
use serde_json::Value;

use crate::messages::ProposalMessage;
use crate::params::ParameterSelection;

/// Renders a parameter value for display.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) if items.iter().all(is_scalar) => {
            let items: Vec<String> = items.iter().map(describe_value).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn describe_coins(coins: &[Coin]) -> String {
    if coins.is_empty() {
        return "nothing".to_string();
    }
    coins.iter().map(Coin::to_string).collect::<Vec<_>>().join(", ")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Last segment of a type URL, e.g. `MsgSend` for `/cosmos.bank.v1beta1.MsgSend`.
fn short_type_name(type_url: &str) -> &str {
    type_url.rsplit('.').next().unwrap_or(type_url).trim_start_matches('/')
}

/// One-line title for a single message.
pub fn message_title(msg: &ProposalMessage) -> String {
    match msg {
        ProposalMessage::UpdateParams { module, params, .. } => {
            if params.len() == 1 {
                let key = params.keys().next().map(String::as_str).unwrap_or_default();
                format!("Update {module} parameter {key}")
            } else {
                format!("Update {module} parameters")
            }
        }
        ProposalMessage::CommunityPoolSpend { amount, .. } => {
            format!("Community pool spend of {}", describe_coins(amount))
        }
        ProposalMessage::SoftwareUpgrade { plan, .. } => {
            format!("Software upgrade {} at height {}", plan.name, plan.height)
        }
        ProposalMessage::CancelUpgrade { .. } => "Cancel software upgrade".to_string(),
        ProposalMessage::IbcClientParams { .. } => "Update IBC allowed clients".to_string(),
        ProposalMessage::RegisterPreinstalls { preinstalls, .. } => {
            format!("Register {}", plural(preinstalls.len(), "preinstall", "preinstalls"))
        }
        ProposalMessage::RegisterErc20 { erc20_addresses, .. } => format!(
            "Register {}",
            plural(erc20_addresses.len(), "ERC20 token", "ERC20 tokens")
        ),
        ProposalMessage::ToggleConversion { token, .. } => {
            format!("Toggle ERC20 conversion for {token}")
        }
        ProposalMessage::Send { amount, .. } => format!("Send {}", describe_coins(amount)),
        ProposalMessage::Vote {
            proposal_id, option, ..
        } => format!("Vote {} on proposal {proposal_id}", option.as_str()),
        ProposalMessage::VoteWeighted { proposal_id, .. } => {
            format!("Weighted vote on proposal {proposal_id}")
        }
        ProposalMessage::SubmitProposal { proposal, .. } => proposal.title.clone(),
        ProposalMessage::Custom { type_url, .. } => {
            format!("Execute {}", short_type_name(type_url))
        }
    }
}

/// Suggested proposal title for a message set.
pub fn suggest_title(messages: &[ProposalMessage]) -> String {
    match messages {
        [] => "Governance proposal".to_string(),
        [single] => message_title(single),
        many => {
            let mut modules: Vec<String> = Vec::new();
            for msg in many {
                match msg {
                    ProposalMessage::UpdateParams { module, .. } => {
                        let name = module.to_string();
                        if !modules.contains(&name) {
                            modules.push(name);
                        }
                    }
                    _ => return format!("Governance proposal with {} messages", many.len()),
                }
            }
            format!("Update {} parameters", modules.join(", "))
        }
    }
}

/// Bullet lines describing what each message changes.
fn message_lines(msg: &ProposalMessage) -> Vec<String> {
    match msg {
        ProposalMessage::UpdateParams { module, params, .. } => params
            .iter()
            .map(|(key, value)| format!("Set {module}.{key} to {}", describe_value(value)))
            .collect(),
        ProposalMessage::CommunityPoolSpend {
            recipient, amount, ..
        } => vec![format!(
            "Transfer {} from the community pool to {recipient}",
            describe_coins(amount)
        )],
        ProposalMessage::SoftwareUpgrade { plan, .. } => vec![format!(
            "Upgrade the chain to {} at block height {}",
            plan.name, plan.height
        )],
        ProposalMessage::CancelUpgrade { .. } => {
            vec!["Cancel the currently scheduled software upgrade".to_string()]
        }
        ProposalMessage::IbcClientParams {
            allowed_clients, ..
        } => vec![format!(
            "Set the IBC allowed clients to [{}]",
            allowed_clients.join(", ")
        )],
        ProposalMessage::RegisterPreinstalls { preinstalls, .. } => preinstalls
            .iter()
            .map(|p| format!("Register preinstall {} at {}", p.name, p.address))
            .collect(),
        ProposalMessage::RegisterErc20 {
            erc20_addresses, ..
        } => erc20_addresses
            .iter()
            .map(|a| format!("Register ERC20 token {a}"))
            .collect(),
        ProposalMessage::ToggleConversion { token, .. } => {
            vec![format!("Toggle native conversion for token {token}")]
        }
        other => vec![message_title(other)],
    }
}

/// Suggested proposal summary: one line per change.
pub fn suggest_summary(messages: &[ProposalMessage]) -> String {
    if messages.is_empty() {
        return "This proposal contains no messages.".to_string();
    }

    let mut out = String::from("This proposal will:");
    for line in messages.iter().flat_map(message_lines) {
        out.push_str("\n- ");
        out.push_str(&line);
    }
    out
}

/// Lists parameter selections, one per line, with their descriptions.
pub fn describe_parameter_changes(selections: &[ParameterSelection]) -> String {
    selections
        .iter()
        .map(|s| {
            let line = format!("{}.{}: {}", s.module, s.parameter, describe_value(&s.value));
            match &s.description {
                Some(d) => format!("{line} ({d})"),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use crate::messages::Preinstall;
    use crate::params::build_parameter_change_messages;
    use crate::vote::{build_vote_message, VoteOption};
    use serde_json::json;

    const AUTHORITY: &str = "cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn";

    #[test]
    fn value_rendering() {
        assert_eq!(describe_value(&json!("atest")), "atest");
        assert_eq!(describe_value(&json!(true)), "true");
        assert_eq!(describe_value(&json!(42)), "42");
        assert_eq!(describe_value(&json!(null)), "null");
        assert_eq!(describe_value(&json!(["a", 1])), "[a, 1]");
    }

    #[test]
    fn nested_values_fall_back_to_json() {
        assert_eq!(describe_value(&json!({"max_gas": "-1"})), r#"{"max_gas":"-1"}"#);
        assert_eq!(describe_value(&json!([[1], {"a": 2}])), r#"[[1],{"a":2}]"#);
    }

    #[test]
    fn single_parameter_title() {
        let msgs = build_parameter_change_messages(
            &[ParameterSelection::new("vm", "evm_denom", json!("atest"))],
            AUTHORITY,
        )
        .unwrap();
        assert_eq!(suggest_title(&msgs), "Update vm parameter evm_denom");
        assert_eq!(suggest_summary(&msgs), "This proposal will:\n- Set vm.evm_denom to atest");
    }

    #[test]
    fn multi_module_title() {
        let msgs = build_parameter_change_messages(
            &[
                ParameterSelection::new("gov", "voting_period", json!("172800s")),
                ParameterSelection::new("mint", "mint_denom", json!("uatom")),
            ],
            AUTHORITY,
        )
        .unwrap();
        assert_eq!(suggest_title(&msgs), "Update gov, mint parameters");
    }

    #[test]
    fn mixed_messages_title() {
        let msgs = vec![
            build_cancel_upgrade_message(AUTHORITY),
            build_toggle_conversion_message(AUTHORITY, "0xabc"),
        ];
        assert_eq!(suggest_title(&msgs), "Governance proposal with 2 messages");
        let summary = suggest_summary(&msgs);
        assert!(summary.contains("- Cancel the currently scheduled software upgrade"));
        assert!(summary.contains("- Toggle native conversion for token 0xabc"));
    }

    #[test]
    fn per_variant_titles() {
        assert_eq!(
            message_title(&build_software_upgrade_message(AUTHORITY, "v2.0.0", 1000000, "{}")),
            "Software upgrade v2.0.0 at height 1000000"
        );
        assert_eq!(
            message_title(&build_community_pool_spend_message(
                AUTHORITY,
                "cosmos1x",
                vec![Coin::new("10", "uatom")]
            )),
            "Community pool spend of 10uatom"
        );
        assert_eq!(
            message_title(&build_register_erc20_message(AUTHORITY, vec!["0x1".into()])),
            "Register 1 ERC20 token"
        );
        assert_eq!(
            message_title(&build_register_preinstalls_message(
                AUTHORITY,
                vec![
                    Preinstall { name: "a".into(), address: "0x1".into(), code: "0x".into() },
                    Preinstall { name: "b".into(), address: "0x2".into(), code: "0x".into() },
                ]
            )),
            "Register 2 preinstalls"
        );
        assert_eq!(
            message_title(&build_vote_message(3, "cosmos1v", VoteOption::Yes)),
            "Vote VOTE_OPTION_YES on proposal 3"
        );
    }

    #[test]
    fn custom_message_title_uses_short_name() {
        let msg = ProposalMessage::custom("/cosmos.evm.vm.v1.MsgFoo", json!({})).unwrap();
        assert_eq!(message_title(&msg), "Execute MsgFoo");
    }

    #[test]
    fn empty_set_has_fallbacks() {
        assert_eq!(suggest_title(&[]), "Governance proposal");
        assert_eq!(suggest_summary(&[]), "This proposal contains no messages.");
    }

    #[test]
    fn parameter_change_listing() {
        let text = describe_parameter_changes(&[
            ParameterSelection::new("vm", "evm_denom", json!("atest"))
                .with_description("EVM denom"),
            ParameterSelection::new("feemarket", "no_base_fee", json!(false)),
        ]);
        assert_eq!(text, "vm.evm_denom: atest (EVM denom)\nfeemarket.no_base_fee: false");
    }

    #[test]
    fn output_is_deterministic() {
        let msgs = vec![build_ibc_client_params_message(AUTHORITY, vec!["07-tendermint".into()])];
        assert_eq!(suggest_summary(&msgs), suggest_summary(&msgs));
        assert_eq!(
            suggest_summary(&msgs),
            "This proposal will:\n- Set the IBC allowed clients to [07-tendermint]"
        );
    }
}
