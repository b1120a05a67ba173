use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MessageError;
use crate::messages::ProposalMessage;

/// Governance vote options with their proto enum names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    #[serde(rename = "VOTE_OPTION_YES")]
    Yes,
    #[serde(rename = "VOTE_OPTION_ABSTAIN")]
    Abstain,
    #[serde(rename = "VOTE_OPTION_NO")]
    No,
    #[serde(rename = "VOTE_OPTION_NO_WITH_VETO")]
    NoWithVeto,
}

impl VoteOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOption::Yes => "VOTE_OPTION_YES",
            VoteOption::Abstain => "VOTE_OPTION_ABSTAIN",
            VoteOption::No => "VOTE_OPTION_NO",
            VoteOption::NoWithVeto => "VOTE_OPTION_NO_WITH_VETO",
        }
    }
}

impl FromStr for VoteOption {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches("vote_option_") {
            "yes" => Ok(VoteOption::Yes),
            "abstain" => Ok(VoteOption::Abstain),
            "no" => Ok(VoteOption::No),
            "no_with_veto" | "nowithveto" | "veto" => Ok(VoteOption::NoWithVeto),
            _ => Err(MessageError::InvalidMessageStructure(format!(
                "unknown vote option '{s}'"
            ))),
        }
    }
}

/// One leg of a weighted vote. Weights are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedVoteOption {
    pub option: VoteOption,
    pub weight: String,
}

impl WeightedVoteOption {
    pub fn new(option: VoteOption, weight: impl Into<String>) -> Self {
        Self {
            option,
            weight: weight.into(),
        }
    }
}

/// Builds a simple vote with empty metadata.
pub fn build_vote_message(proposal_id: u64, voter: &str, option: VoteOption) -> ProposalMessage {
    ProposalMessage::Vote {
        proposal_id,
        voter: voter.to_string(),
        option,
        metadata: String::new(),
    }
}

/// Builds a weighted vote. Weights are expected to sum to 1 but are not
/// checked here.
pub fn build_weighted_vote_message(
    proposal_id: u64,
    voter: &str,
    options: Vec<WeightedVoteOption>,
) -> ProposalMessage {
    ProposalMessage::VoteWeighted {
        proposal_id,
        voter: voter.to_string(),
        options,
        metadata: String::new(),
    }
}
