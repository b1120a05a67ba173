//! Validates and submits transactions through the selected wallet adapter.
//!
//! Each dispatch runs its own `Idle -> Signing -> Broadcasting -> Success |
//! Failed` sequence. Fee and message checks happen before the adapter is
//! touched. An auto-vote after a proposal is a second, independent dispatch
//! whose failure leaves the proposal submitted.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use chain_cosmos::{decode_bech32, validate_fee, validate_memo, ChainConfig, ChainError, Coin, Fee};
use gov_proposals::{
    build_send_message, build_vote_message, BuiltProposal, EncodeObject, MessageError, VoteOption,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapter::WalletAdapter;
use crate::broadcast::{extract_proposal_id, BroadcastResponse};
use crate::config::DispatcherConfig;
use crate::error::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchState {
    Idle,
    Signing,
    Broadcasting,
    Success,
    Failed,
}

pub type StateObserver = Arc<dyn Fn(DispatchState) + Send + Sync>;

/// What happened to the vote that follows a submitted proposal.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoVoteOutcome {
    Disabled,
    /// Enabled, but the proposal id could not be read from the events.
    Skipped,
    Submitted(BroadcastResponse),
    Failed(WalletError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub response: BroadcastResponse,
    pub proposal_id: Option<u64>,
    pub auto_vote: AutoVoteOutcome,
}

impl SubmissionOutcome {
    pub fn transaction_hash(&self) -> &str {
        &self.response.transaction_hash
    }
}

/// Shape checks every backend relies on: at least one message, each with a
/// `/`-prefixed type URL and an object value.
pub fn validate_messages(messages: &[EncodeObject]) -> Result<(), MessageError> {
    if messages.is_empty() {
        return Err(MessageError::InvalidMessageStructure(
            "transaction must contain at least one message".into(),
        ));
    }
    messages.iter().try_for_each(EncodeObject::validate)
}

pub struct TransactionDispatcher {
    adapter: Arc<dyn WalletAdapter>,
    chain: ChainConfig,
    config: DispatcherConfig,
    state: Mutex<DispatchState>,
    observer: Option<StateObserver>,
}

impl TransactionDispatcher {
    pub fn new(
        adapter: Arc<dyn WalletAdapter>,
        chain: ChainConfig,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            adapter,
            chain,
            config,
            state: Mutex::new(DispatchState::Idle),
            observer: None,
        }
    }

    /// Registers a callback invoked on every state transition.
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn state(&self) -> DispatchState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    fn set_state(&self, state: DispatchState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        debug!(wallet = self.adapter.name(), ?state, "dispatch state");
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }

    async fn within_timeout<T, F>(&self, fut: F) -> Result<T, WalletError>
    where
        F: Future<Output = Result<T, WalletError>>,
    {
        match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| WalletError::Timeout(limit))?,
            None => fut.await,
        }
    }

    /// Validates and signs-and-broadcasts one transaction.
    pub async fn dispatch(
        &self,
        messages: &[EncodeObject],
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, WalletError> {
        self.set_state(DispatchState::Idle);
        let result = self.run(messages, fee, memo).await;
        match &result {
            Ok(response) => {
                self.set_state(DispatchState::Success);
                info!(
                    wallet = self.adapter.name(),
                    chain_id = %self.chain.chain_id,
                    tx_hash = %response.transaction_hash,
                    "dispatch succeeded"
                );
            }
            Err(e) => {
                self.set_state(DispatchState::Failed);
                warn!(
                    wallet = self.adapter.name(),
                    chain_id = %self.chain.chain_id,
                    error = %e,
                    "dispatch failed"
                );
            }
        }
        result
    }

    async fn run(
        &self,
        messages: &[EncodeObject],
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, WalletError> {
        validate_fee(fee)?;
        validate_messages(messages)?;
        validate_memo(memo)?;

        let chain_id = self.chain.chain_id.as_str();

        self.set_state(DispatchState::Signing);
        let signer = self.within_timeout(self.adapter.get_signer(chain_id)).await?;

        self.set_state(DispatchState::Broadcasting);
        self.within_timeout(self.adapter.sign_and_broadcast_with(
            signer,
            &self.chain.rpc,
            chain_id,
            messages,
            fee,
            memo,
        ))
        .await
    }

    /// Submits `proposal` from `proposer`, then votes yes on it when
    /// auto-vote is enabled and the proposal id is known.
    pub async fn submit_proposal(
        &self,
        proposal: &BuiltProposal,
        proposer: &str,
        fee: &Fee,
    ) -> Result<SubmissionOutcome, WalletError> {
        let message = proposal.to_submit_message(proposer).to_encode_object();
        let response = self.dispatch(&[message], fee, &self.config.memo).await?;

        let proposal_id = extract_proposal_id(&response.events);
        info!(tx_hash = %response.transaction_hash, ?proposal_id, "proposal submitted");

        let auto_vote = match (self.config.auto_vote, proposal_id) {
            (false, _) => AutoVoteOutcome::Disabled,
            (true, None) => {
                warn!(
                    tx_hash = %response.transaction_hash,
                    "no proposal id in events, skipping auto-vote"
                );
                AutoVoteOutcome::Skipped
            }
            (true, Some(id)) => match self.vote(id, proposer, VoteOption::Yes, fee).await {
                Ok(vote) => AutoVoteOutcome::Submitted(vote),
                Err(e) => AutoVoteOutcome::Failed(e),
            },
        };

        Ok(SubmissionOutcome {
            response,
            proposal_id,
            auto_vote,
        })
    }

    pub async fn vote(
        &self,
        proposal_id: u64,
        voter: &str,
        option: VoteOption,
        fee: &Fee,
    ) -> Result<BroadcastResponse, WalletError> {
        let message = build_vote_message(proposal_id, voter, option).to_encode_object();
        self.dispatch(&[message], fee, &self.config.memo).await
    }

    /// Sends `amount` from `from` to `to`. Both addresses must use the
    /// chain's bech32 prefix and the amount must be positive.
    pub async fn send_tokens(
        &self,
        from: &str,
        to: &str,
        amount: Coin,
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, WalletError> {
        validate_fee(fee)?;
        let prefix = self.chain.bech32_prefix.as_str();
        decode_bech32(from, Some(prefix))?;
        decode_bech32(to, Some(prefix))?;
        if amount.parse_amount()? == 0 {
            return Err(ChainError::InvalidAmount("amount must be positive".into()).into());
        }

        let message = build_send_message(from, to, vec![amount]).to_encode_object();
        self.dispatch(&[message], fee, memo).await
    }
}
