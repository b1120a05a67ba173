//! Governance proposal construction for Cosmos EVM chains.
//!
//! This crate provides:
//! - Protocol message variants with their proto-JSON and encode forms
//! - Grouping of parameter selections into per-module `MsgUpdateParams`
//! - Builders for upgrade, community-pool, IBC, preinstall and ERC20 messages
//! - Proposal assembly, vote messages and `MsgSubmitProposal` wrapping
//! - Proposal file export and CLI command generation
//! - Title and summary suggestions
//! - Caller-side validation of opaque JSON and selection sets

pub mod builder;
pub mod describe;
pub mod error;
pub mod export;
pub mod messages;
pub mod params;
pub mod proposal;
pub mod validation;
pub mod vote;

pub use builder::{
    build_cancel_upgrade_message, build_community_pool_spend_message,
    build_ibc_client_params_message, build_register_erc20_message,
    build_register_preinstalls_message, build_send_message, build_software_upgrade_message,
    build_toggle_conversion_message,
};
pub use describe::{describe_parameter_changes, describe_value, suggest_summary, suggest_title};
pub use error::MessageError;
pub use export::{export_json, generate_cli_command, suggested_cli_fee, CliOptions};
pub use messages::{
    gov_authority, EncodeObject, ParamsModule, Preinstall, ProposalMessage, UpgradePlan,
};
pub use params::{
    build_parameter_change_messages, build_standard_module_params_message, ParameterSelection,
};
pub use proposal::{build_proposal, BuiltProposal};
pub use vote::{build_vote_message, build_weighted_vote_message, VoteOption, WeightedVoteOption};
