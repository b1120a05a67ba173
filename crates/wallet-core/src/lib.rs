//! Wallet abstraction and transaction dispatch for the governance UI.
//!
//! Signing backends (Keplr, Leap, Ledger) sit behind [`WalletAdapter`]; the
//! environment they run in is injected through [`HostEnvironment`]. The
//! [`TransactionDispatcher`] validates fees and messages, drives the adapter,
//! and follows proposal submissions with an optional yes vote.

pub mod adapter;
pub mod broadcast;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod extension;
pub mod host;
pub mod ledger;
pub mod registry;

pub use adapter::{
    AccountChangeCallback, AccountSubscription, AccountWatcher, ChainSuggestible, WalletAccount,
    WalletAdapter,
};
pub use broadcast::{
    check_response, extract_proposal_id, BroadcastResponse, EventAttribute, TxEvent,
};
pub use config::DispatcherConfig;
pub use dispatcher::{
    validate_messages, AutoVoteOutcome, DispatchState, StateObserver, SubmissionOutcome,
    TransactionDispatcher,
};
pub use error::{classify_backend_error, WalletError};
pub use extension::{ChainInfo, ExtensionKind, ExtensionWallet};
pub use host::{
    AccountData, BackendError, EventBus, ExtensionProvider, HostEnvironment, Listener, ListenerId,
    OfflineSigner, SigningClient, SigningClientConnector,
};
pub use ledger::LedgerWallet;
pub use registry::{WalletKind, WalletRegistry};
