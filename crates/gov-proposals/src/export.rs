//! Proposal file export and the matching `submit-proposal` CLI command.
//!
//! Presentation only: nothing here validates the proposal.

use chain_cosmos::{estimate_gas, fee_amount, ChainError, Coin, GasEstimateParams};

use crate::proposal::BuiltProposal;

/// File name the CLI command refers to.
pub const PROPOSAL_FILE: &str = "proposal.json";

/// Gas adjustment passed alongside `--gas=auto`.
pub const CLI_GAS_ADJUSTMENT: &str = "1.5";

/// Command-line options for the generated submit command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    /// Chain daemon binary, e.g. `evmd` or `gaiad`.
    pub binary: String,
    /// Key name or address passed to `--from`.
    pub from: String,
    /// Fee string passed to `--fees`, e.g. `5000uatom`.
    pub fees: String,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            binary: "evmd".into(),
            from: "<key>".into(),
            fees: "<fee>".into(),
        }
    }
}

/// Pretty-printed proposal file JSON.
pub fn export_json(proposal: &BuiltProposal) -> String {
    format!("{:#}", proposal.to_json())
}

/// The `tx gov submit-proposal` command for a proposal saved as
/// [`PROPOSAL_FILE`].
pub fn generate_cli_command(
    _proposal: &BuiltProposal,
    chain_id: &str,
    options: &CliOptions,
) -> String {
    format!(
        "{} tx gov submit-proposal {PROPOSAL_FILE} --from={} --chain-id={chain_id} --gas=auto --gas-adjustment={CLI_GAS_ADJUSTMENT} --fees={}",
        options.binary, options.from, options.fees
    )
}

/// Fee suggestion for the CLI flow: estimated gas for the proposal's
/// messages priced at `gas_price`.
pub fn suggested_cli_fee(proposal: &BuiltProposal, gas_price: &str) -> Result<Coin, ChainError> {
    let gas = estimate_gas(&proposal.messages, &GasEstimateParams::default());
    fee_amount(gas, gas_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_toggle_conversion_message;
    use crate::proposal::build_proposal;

    const AUTHORITY: &str = "cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn";

    fn sample() -> BuiltProposal {
        build_proposal(
            vec![build_toggle_conversion_message(AUTHORITY, "0xabc")],
            "Toggle conversion",
            "Disables conversion for 0xabc",
            Coin::new("10000000", "atest"),
            true,
        )
    }

    #[test]
    fn cli_command_template() {
        let options = CliOptions {
            binary: "evmd".into(),
            from: "validator".into(),
            fees: "5000atest".into(),
        };
        assert_eq!(
            generate_cli_command(&sample(), "cosmos_262144-1", &options),
            "evmd tx gov submit-proposal proposal.json --from=validator --chain-id=cosmos_262144-1 --gas=auto --gas-adjustment=1.5 --fees=5000atest"
        );
    }

    #[test]
    fn default_options_leave_placeholders() {
        let cmd = generate_cli_command(&sample(), "testnet-1", &CliOptions::default());
        assert!(cmd.contains("--from=<key>"));
        assert!(cmd.ends_with("--fees=<fee>"));
    }

    #[test]
    fn export_is_pretty_and_parses_back() {
        let text = export_json(&sample());
        assert!(text.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample().to_json());
        assert!(text.find("\"messages\"").unwrap() < text.find("\"expedited\"").unwrap());
    }

    #[test]
    fn suggested_fee_uses_estimate() {
        let fee = suggested_cli_fee(&sample(), "0.025atest").unwrap();
        assert_eq!(fee.denom, "atest");
        assert!(fee.parse_amount().unwrap() > 0);
        assert!(suggested_cli_fee(&sample(), "free").is_err());
    }
}
