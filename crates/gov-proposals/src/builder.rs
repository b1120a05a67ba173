//! Builders for the governance-gated message categories.
//!
//! Builders are pure: inputs are taken as given and addresses or amounts are
//! not re-validated here. Callers run the checks in [`crate::validation`] and
//! `chain_cosmos` first.

use chain_cosmos::Coin;

use crate::messages::{Preinstall, ProposalMessage, UpgradePlan};

pub fn build_community_pool_spend_message(
    authority: &str,
    recipient: &str,
    amount: Vec<Coin>,
) -> ProposalMessage {
    ProposalMessage::CommunityPoolSpend {
        authority: authority.to_string(),
        recipient: recipient.to_string(),
        amount,
    }
}

/// Schedules a software upgrade at `height`. `info` is passed through
/// untouched (usually JSON listing binaries per platform).
pub fn build_software_upgrade_message(
    authority: &str,
    name: &str,
    height: u64,
    info: &str,
) -> ProposalMessage {
    ProposalMessage::SoftwareUpgrade {
        authority: authority.to_string(),
        plan: UpgradePlan {
            name: name.to_string(),
            height: height.to_string(),
            info: info.to_string(),
        },
    }
}

pub fn build_cancel_upgrade_message(authority: &str) -> ProposalMessage {
    ProposalMessage::CancelUpgrade {
        authority: authority.to_string(),
    }
}

/// Replaces the IBC light-client allow list.
pub fn build_ibc_client_params_message(
    authority: &str,
    allowed_clients: Vec<String>,
) -> ProposalMessage {
    ProposalMessage::IbcClientParams {
        authority: authority.to_string(),
        allowed_clients,
    }
}

pub fn build_register_preinstalls_message(
    authority: &str,
    preinstalls: Vec<Preinstall>,
) -> ProposalMessage {
    ProposalMessage::RegisterPreinstalls {
        authority: authority.to_string(),
        preinstalls,
    }
}

/// Registers native ERC20 contracts. The message is signed by `signer`, which
/// for a governance proposal is the gov module account.
pub fn build_register_erc20_message(signer: &str, erc20_addresses: Vec<String>) -> ProposalMessage {
    ProposalMessage::RegisterErc20 {
        signer: signer.to_string(),
        erc20_addresses,
    }
}

pub fn build_toggle_conversion_message(authority: &str, token: &str) -> ProposalMessage {
    ProposalMessage::ToggleConversion {
        authority: authority.to_string(),
        token: token.to_string(),
    }
}

/// Bank transfer from `from` to `to`.
pub fn build_send_message(from: &str, to: &str, amount: Vec<Coin>) -> ProposalMessage {
    ProposalMessage::Send {
        from_address: from.to_string(),
        to_address: to.to_string(),
        amount,
    }
}
