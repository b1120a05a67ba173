//! Protocol message variants.
//!
//! Every message serializes to the chain's proto-JSON form: an `@type` field
//! holding the message-type URL followed by the message fields in snake_case.
//! Signing backends receive the same body as an [`EncodeObject`].

use std::str::FromStr;

use chain_cosmos::{encode_bech32, module_address, ChainError, Coin};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::MessageError;
use crate::proposal::BuiltProposal;
use crate::vote::{VoteOption, WeightedVoteOption};

pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const MSG_COMMUNITY_POOL_SPEND: &str = "/cosmos.distribution.v1beta1.MsgCommunityPoolSpend";
pub const MSG_SOFTWARE_UPGRADE: &str = "/cosmos.upgrade.v1beta1.MsgSoftwareUpgrade";
pub const MSG_CANCEL_UPGRADE: &str = "/cosmos.upgrade.v1beta1.MsgCancelUpgrade";
pub const MSG_IBC_CLIENT_UPDATE_PARAMS: &str = "/ibc.core.client.v1.MsgUpdateParams";
pub const MSG_REGISTER_PREINSTALLS: &str = "/cosmos.evm.vm.v1.MsgRegisterPreinstalls";
pub const MSG_REGISTER_ERC20: &str = "/cosmos.evm.erc20.v1.MsgRegisterERC20";
pub const MSG_TOGGLE_CONVERSION: &str = "/cosmos.evm.erc20.v1.MsgToggleConversion";
pub const MSG_SUBMIT_PROPOSAL: &str = "/cosmos.gov.v1.MsgSubmitProposal";
pub const MSG_VOTE: &str = "/cosmos.gov.v1.MsgVote";
pub const MSG_VOTE_WEIGHTED: &str = "/cosmos.gov.v1.MsgVoteWeighted";

/// Envelope keys a flattened params body may not carry.
pub const RESERVED_FIELDS: [&str; 2] = ["@type", "authority"];

/// Modules whose parameters can be changed by governance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamsModule {
    Vm,
    Erc20,
    Feemarket,
    Gov,
    Bank,
    Staking,
    Distribution,
    Slashing,
    Mint,
    Consensus,
}

impl ParamsModule {
    pub const ALL: [ParamsModule; 10] = [
        ParamsModule::Vm,
        ParamsModule::Erc20,
        ParamsModule::Feemarket,
        ParamsModule::Gov,
        ParamsModule::Bank,
        ParamsModule::Staking,
        ParamsModule::Distribution,
        ParamsModule::Slashing,
        ParamsModule::Mint,
        ParamsModule::Consensus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParamsModule::Vm => "vm",
            ParamsModule::Erc20 => "erc20",
            ParamsModule::Feemarket => "feemarket",
            ParamsModule::Gov => "gov",
            ParamsModule::Bank => "bank",
            ParamsModule::Staking => "staking",
            ParamsModule::Distribution => "distribution",
            ParamsModule::Slashing => "slashing",
            ParamsModule::Mint => "mint",
            ParamsModule::Consensus => "consensus",
        }
    }

    /// Message-type URL of this module's `MsgUpdateParams`.
    pub fn update_params_type_url(&self) -> &'static str {
        match self {
            ParamsModule::Vm => "/cosmos.evm.vm.v1.MsgUpdateParams",
            ParamsModule::Erc20 => "/cosmos.evm.erc20.v1.MsgUpdateParams",
            ParamsModule::Feemarket => "/cosmos.evm.feemarket.v1.MsgUpdateParams",
            ParamsModule::Gov => "/cosmos.gov.v1.MsgUpdateParams",
            ParamsModule::Bank => "/cosmos.bank.v1beta1.MsgUpdateParams",
            ParamsModule::Staking => "/cosmos.staking.v1beta1.MsgUpdateParams",
            ParamsModule::Distribution => "/cosmos.distribution.v1beta1.MsgUpdateParams",
            ParamsModule::Slashing => "/cosmos.slashing.v1beta1.MsgUpdateParams",
            ParamsModule::Mint => "/cosmos.mint.v1beta1.MsgUpdateParams",
            ParamsModule::Consensus => "/cosmos.consensus.v1.MsgUpdateParams",
        }
    }

    /// SDK modules whose type URL follows `/cosmos.<module>.<version>.MsgUpdateParams`.
    pub fn is_standard(&self) -> bool {
        !matches!(
            self,
            ParamsModule::Vm | ParamsModule::Erc20 | ParamsModule::Feemarket
        )
    }
}

impl FromStr for ParamsModule {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamsModule::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| MessageError::UnknownModule(s.to_string()))
    }
}

impl std::fmt::Display for ParamsModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Upgrade plan carried by a software-upgrade proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePlan {
    pub name: String,
    pub height: String,
    /// Opaque upgrade info, normally JSON describing binaries and checksums.
    pub info: String,
}

/// A precompiled contract registered at genesis-like addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preinstall {
    pub name: String,
    pub address: String,
    pub code: String,
}

/// A protocol message, one variant per message category.
#[derive(Debug, Clone, PartialEq)]
pub enum ProposalMessage {
    UpdateParams {
        module: ParamsModule,
        authority: String,
        params: Map<String, Value>,
    },
    CommunityPoolSpend {
        authority: String,
        recipient: String,
        amount: Vec<Coin>,
    },
    SoftwareUpgrade {
        authority: String,
        plan: UpgradePlan,
    },
    CancelUpgrade {
        authority: String,
    },
    IbcClientParams {
        authority: String,
        allowed_clients: Vec<String>,
    },
    RegisterPreinstalls {
        authority: String,
        preinstalls: Vec<Preinstall>,
    },
    /// Carries `signer` rather than `authority`, as the protocol defines it.
    RegisterErc20 {
        signer: String,
        erc20_addresses: Vec<String>,
    },
    ToggleConversion {
        authority: String,
        token: String,
    },
    Send {
        from_address: String,
        to_address: String,
        amount: Vec<Coin>,
    },
    Vote {
        proposal_id: u64,
        voter: String,
        option: VoteOption,
        metadata: String,
    },
    VoteWeighted {
        proposal_id: u64,
        voter: String,
        options: Vec<WeightedVoteOption>,
        metadata: String,
    },
    SubmitProposal {
        proposal: BuiltProposal,
        proposer: String,
    },
    /// Caller-supplied payload for message types without a dedicated builder.
    Custom {
        type_url: String,
        value: Map<String, Value>,
    },
}

impl ProposalMessage {
    /// Wraps a caller-supplied message. The type URL must start with `/` and
    /// the value must be a JSON object; an `@type` key in the value is dropped.
    pub fn custom(type_url: &str, value: Value) -> Result<Self, MessageError> {
        if !type_url.starts_with('/') {
            return Err(MessageError::InvalidMessageStructure(format!(
                "typeUrl '{type_url}' must start with '/'"
            )));
        }
        match value {
            Value::Object(map) => Ok(ProposalMessage::Custom {
                type_url: type_url.to_string(),
                value: map.into_iter().filter(|(k, _)| k != "@type").collect(),
            }),
            _ => Err(MessageError::InvalidMessageStructure(format!(
                "value of {type_url} must be an object"
            ))),
        }
    }

    pub fn type_url(&self) -> &str {
        match self {
            ProposalMessage::UpdateParams { module, .. } => module.update_params_type_url(),
            ProposalMessage::CommunityPoolSpend { .. } => MSG_COMMUNITY_POOL_SPEND,
            ProposalMessage::SoftwareUpgrade { .. } => MSG_SOFTWARE_UPGRADE,
            ProposalMessage::CancelUpgrade { .. } => MSG_CANCEL_UPGRADE,
            ProposalMessage::IbcClientParams { .. } => MSG_IBC_CLIENT_UPDATE_PARAMS,
            ProposalMessage::RegisterPreinstalls { .. } => MSG_REGISTER_PREINSTALLS,
            ProposalMessage::RegisterErc20 { .. } => MSG_REGISTER_ERC20,
            ProposalMessage::ToggleConversion { .. } => MSG_TOGGLE_CONVERSION,
            ProposalMessage::Send { .. } => MSG_SEND,
            ProposalMessage::Vote { .. } => MSG_VOTE,
            ProposalMessage::VoteWeighted { .. } => MSG_VOTE_WEIGHTED,
            ProposalMessage::SubmitProposal { .. } => MSG_SUBMIT_PROPOSAL,
            ProposalMessage::Custom { type_url, .. } => type_url.as_str(),
        }
    }

    /// The governance authority (or ERC20 registration signer), if any.
    pub fn authority(&self) -> Option<&str> {
        match self {
            ProposalMessage::UpdateParams { authority, .. }
            | ProposalMessage::CommunityPoolSpend { authority, .. }
            | ProposalMessage::SoftwareUpgrade { authority, .. }
            | ProposalMessage::CancelUpgrade { authority }
            | ProposalMessage::IbcClientParams { authority, .. }
            | ProposalMessage::RegisterPreinstalls { authority, .. }
            | ProposalMessage::ToggleConversion { authority, .. } => Some(authority.as_str()),
            ProposalMessage::RegisterErc20 { signer, .. } => Some(signer.as_str()),
            ProposalMessage::Custom { value, .. } => value
                .get("authority")
                .or_else(|| value.get("signer"))
                .and_then(Value::as_str),
            ProposalMessage::Send { .. }
            | ProposalMessage::Vote { .. }
            | ProposalMessage::VoteWeighted { .. }
            | ProposalMessage::SubmitProposal { .. } => None,
        }
    }

    /// Message fields without the `@type` tag.
    pub fn value(&self) -> Map<String, Value> {
        let value = match self {
            ProposalMessage::UpdateParams {
                module: ParamsModule::Consensus,
                authority,
                params,
            } => {
                // Consensus params are top-level fields (block, evidence, validator, abci).
                let mut fields = Map::new();
                fields.insert("authority".into(), json!(authority));
                fields.extend(
                    params
                        .iter()
                        .filter(|(k, _)| !RESERVED_FIELDS.contains(&k.as_str()))
                        .map(|(k, v)| (k.clone(), v.clone())),
                );
                Value::Object(fields)
            }
            ProposalMessage::UpdateParams {
                authority, params, ..
            } => json!({ "authority": authority, "params": params }),
            ProposalMessage::CommunityPoolSpend {
                authority,
                recipient,
                amount,
            } => json!({ "authority": authority, "recipient": recipient, "amount": amount }),
            ProposalMessage::SoftwareUpgrade { authority, plan } => {
                json!({ "authority": authority, "plan": plan })
            }
            ProposalMessage::CancelUpgrade { authority } => json!({ "authority": authority }),
            ProposalMessage::IbcClientParams {
                authority,
                allowed_clients,
            } => json!({
                "authority": authority,
                "params": { "allowed_clients": allowed_clients },
            }),
            ProposalMessage::RegisterPreinstalls {
                authority,
                preinstalls,
            } => json!({ "authority": authority, "preinstalls": preinstalls }),
            ProposalMessage::RegisterErc20 {
                signer,
                erc20_addresses,
            } => json!({ "signer": signer, "erc20addresses": erc20_addresses }),
            ProposalMessage::ToggleConversion { authority, token } => {
                json!({ "authority": authority, "token": token })
            }
            ProposalMessage::Send {
                from_address,
                to_address,
                amount,
            } => json!({
                "from_address": from_address,
                "to_address": to_address,
                "amount": amount,
            }),
            ProposalMessage::Vote {
                proposal_id,
                voter,
                option,
                metadata,
            } => json!({
                "proposal_id": proposal_id.to_string(),
                "voter": voter,
                "option": option.as_str(),
                "metadata": metadata,
            }),
            ProposalMessage::VoteWeighted {
                proposal_id,
                voter,
                options,
                metadata,
            } => json!({
                "proposal_id": proposal_id.to_string(),
                "voter": voter,
                "options": options,
                "metadata": metadata,
            }),
            ProposalMessage::SubmitProposal { proposal, proposer } => json!({
                "messages": proposal
                    .messages
                    .iter()
                    .map(ProposalMessage::to_json)
                    .collect::<Vec<_>>(),
                "initial_deposit": proposal.deposit,
                "proposer": proposer,
                "metadata": proposal.metadata,
                "title": proposal.title,
                "summary": proposal.summary,
                "expedited": proposal.expedited,
            }),
            ProposalMessage::Custom { value, .. } => Value::Object(value.clone()),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Full proto-JSON form with the leading `@type` field.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("@type".into(), Value::String(self.type_url().to_string()));
        out.extend(self.value().into_iter().filter(|(k, _)| k != "@type"));
        Value::Object(out)
    }

    /// Backend-facing `{typeUrl, value}` form.
    pub fn to_encode_object(&self) -> EncodeObject {
        EncodeObject {
            type_url: self.type_url().to_string(),
            value: Value::Object(self.value()),
        }
    }
}

impl Serialize for ProposalMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A message as handed to a signing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeObject {
    pub type_url: String,
    pub value: Value,
}

impl EncodeObject {
    pub fn new(type_url: impl Into<String>, value: Value) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Checks the shape every backend relies on: a `/`-prefixed type URL and
    /// an object value.
    pub fn validate(&self) -> Result<(), MessageError> {
        if !self.type_url.starts_with('/') {
            return Err(MessageError::InvalidMessageStructure(format!(
                "typeUrl '{}' must start with '/'",
                self.type_url
            )));
        }
        if !self.value.is_object() {
            return Err(MessageError::InvalidMessageStructure(format!(
                "value of {} must be an object",
                self.type_url
            )));
        }
        Ok(())
    }
}

impl From<&ProposalMessage> for EncodeObject {
    fn from(msg: &ProposalMessage) -> Self {
        msg.to_encode_object()
    }
}

/// Bech32 address of the governance module account under `prefix`.
pub fn gov_authority(prefix: &str) -> Result<String, ChainError> {
    encode_bech32(prefix, &module_address("gov"))
}
