use chain_cosmos::Coin;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::messages::ProposalMessage;

/// A proposal ready for export or submission. Built once per attempt and
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltProposal {
    pub messages: Vec<ProposalMessage>,
    pub metadata: String,
    pub deposit: Vec<Coin>,
    pub title: String,
    pub summary: String,
    pub expedited: bool,
}

impl BuiltProposal {
    /// Proposal file JSON as consumed by `tx gov submit-proposal`.
    pub fn to_json(&self) -> Value {
        json!({
            "messages": self.messages.iter().map(ProposalMessage::to_json).collect::<Vec<_>>(),
            "metadata": self.metadata,
            "deposit": self.deposit,
            "title": self.title,
            "summary": self.summary,
            "expedited": self.expedited,
        })
    }

    /// Wraps the proposal in a `MsgSubmitProposal` signed by `proposer`.
    pub fn to_submit_message(&self, proposer: &str) -> ProposalMessage {
        ProposalMessage::SubmitProposal {
            proposal: self.clone(),
            proposer: proposer.to_string(),
        }
    }
}

impl Serialize for BuiltProposal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Assembles a proposal. The deposit becomes a one-element list and the
/// metadata is left empty.
pub fn build_proposal(
    messages: Vec<ProposalMessage>,
    title: &str,
    summary: &str,
    deposit: Coin,
    expedited: bool,
) -> BuiltProposal {
    BuiltProposal {
        messages,
        metadata: String::new(),
        deposit: vec![deposit],
        title: title.to_string(),
        summary: summary.to_string(),
        expedited,
    }
}
