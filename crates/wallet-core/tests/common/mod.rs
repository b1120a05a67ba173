//! In-memory host environment for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chain_cosmos::{Fee, KeyAlgorithm};
use gov_proposals::EncodeObject;
use wallet_core::{
    AccountData, BackendError, BroadcastResponse, ChainInfo, EventAttribute, EventBus,
    ExtensionProvider, HostEnvironment, Listener, ListenerId, OfflineSigner, SigningClient,
    SigningClientConnector, TxEvent,
};

/// Account of secp256k1 private key 1.
pub const ACCOUNT: &str = "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c";
pub const ACCOUNT_PUBKEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
pub const RECIPIENT: &str = "cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn";

pub fn test_account() -> AccountData {
    AccountData {
        address: ACCOUNT.into(),
        algo: KeyAlgorithm::Secp256k1,
        pubkey: hex::decode(ACCOUNT_PUBKEY).unwrap(),
    }
}

pub struct FakeSigner {
    pub accounts: Vec<AccountData>,
}

#[async_trait]
impl OfflineSigner for FakeSigner {
    async fn get_accounts(&self) -> Result<Vec<AccountData>, BackendError> {
        Ok(self.accounts.clone())
    }
}

pub struct FakeProvider {
    pub accounts: Vec<AccountData>,
    pub enable_error: Option<String>,
    pub enabled: Mutex<Vec<String>>,
    pub suggested: Mutex<Vec<ChainInfo>>,
}

impl FakeProvider {
    pub fn new(accounts: Vec<AccountData>) -> Self {
        Self {
            accounts,
            enable_error: None,
            enabled: Mutex::new(Vec::new()),
            suggested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_enable(message: &str) -> Self {
        Self {
            enable_error: Some(message.into()),
            ..Self::new(vec![test_account()])
        }
    }
}

#[async_trait]
impl ExtensionProvider for FakeProvider {
    async fn enable(&self, chain_id: &str) -> Result<(), BackendError> {
        if let Some(msg) = &self.enable_error {
            return Err(BackendError::new(msg.clone()));
        }
        self.enabled.lock().unwrap().push(chain_id.to_string());
        Ok(())
    }

    async fn get_offline_signer(
        &self,
        _chain_id: &str,
    ) -> Result<Arc<dyn OfflineSigner>, BackendError> {
        Ok(Arc::new(FakeSigner {
            accounts: self.accounts.clone(),
        }))
    }

    async fn experimental_suggest_chain(&self, chain_info: &ChainInfo) -> Result<(), BackendError> {
        self.suggested.lock().unwrap().push(chain_info.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeBus {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(String, ListenerId, Listener)>>,
}

impl FakeBus {
    pub fn emit(&self, event: &str) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _, _)| name == event)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _, _)| name == event)
            .count()
    }
}

impl EventBus for FakeBus {
    fn add_listener(&self, event: &str, listener: Listener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .lock()
            .unwrap()
            .push((event.to_string(), id, listener));
        id
    }

    fn remove_listener(&self, event: &str, id: ListenerId) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|(name, lid, _)| !(name == event && *lid == id));
    }
}

/// A recorded sign-and-broadcast call.
#[derive(Debug, Clone)]
pub struct BroadcastCall {
    pub rpc: String,
    pub signer_address: String,
    pub messages: Vec<EncodeObject>,
    pub fee: Fee,
    pub memo: String,
}

/// Signing client with scripted responses. Without a scripted response it
/// returns a successful empty broadcast.
#[derive(Default)]
pub struct FakeChain {
    pub responses: Mutex<VecDeque<Result<BroadcastResponse, BackendError>>>,
    pub calls: Mutex<Vec<BroadcastCall>>,
    pub delay: Option<Duration>,
}

impl FakeChain {
    pub fn push_response(&self, response: Result<BroadcastResponse, BackendError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<BroadcastCall> {
        self.calls.lock().unwrap().clone()
    }
}

struct FakeClient {
    rpc: String,
    chain: Arc<FakeChain>,
}

#[async_trait]
impl SigningClient for FakeClient {
    async fn sign_and_broadcast(
        &self,
        signer_address: &str,
        messages: &[EncodeObject],
        fee: &Fee,
        memo: &str,
    ) -> Result<BroadcastResponse, BackendError> {
        if let Some(delay) = self.chain.delay {
            tokio::time::sleep(delay).await;
        }
        self.chain.calls.lock().unwrap().push(BroadcastCall {
            rpc: self.rpc.clone(),
            signer_address: signer_address.to_string(),
            messages: messages.to_vec(),
            fee: fee.clone(),
            memo: memo.to_string(),
        });
        let scripted = self.chain.responses.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(success("EMPTY", vec![])))
    }
}

struct FakeConnector(Arc<FakeChain>);

#[async_trait]
impl SigningClientConnector for FakeConnector {
    async fn connect_with_signer(
        &self,
        rpc: &str,
        _signer: Arc<dyn OfflineSigner>,
    ) -> Result<Box<dyn SigningClient>, BackendError> {
        Ok(Box::new(FakeClient {
            rpc: rpc.to_string(),
            chain: self.0.clone(),
        }))
    }
}

pub struct FakeHost {
    pub extensions: HashMap<String, Arc<FakeProvider>>,
    pub bus: Arc<FakeBus>,
    pub hardware: bool,
    pub chain: Arc<FakeChain>,
}

impl FakeHost {
    pub fn empty() -> Self {
        Self {
            extensions: HashMap::new(),
            bus: Arc::new(FakeBus::default()),
            hardware: false,
            chain: Arc::new(FakeChain::default()),
        }
    }

    pub fn with_extension(mut self, global_name: &str, provider: FakeProvider) -> Self {
        self.extensions
            .insert(global_name.to_string(), Arc::new(provider));
        self
    }

    pub fn with_chain(mut self, chain: FakeChain) -> Self {
        self.chain = Arc::new(chain);
        self
    }

    /// Host with Keplr installed and one valid account.
    pub fn keplr() -> Self {
        Self::empty().with_extension("keplr", FakeProvider::new(vec![test_account()]))
    }
}

impl HostEnvironment for FakeHost {
    fn extension(&self, global_name: &str) -> Option<Arc<dyn ExtensionProvider>> {
        self.extensions
            .get(global_name)
            .map(|p| p.clone() as Arc<dyn ExtensionProvider>)
    }

    fn event_bus(&self) -> Arc<dyn EventBus> {
        self.bus.clone()
    }

    fn has_hardware_transport(&self) -> bool {
        self.hardware
    }

    fn signing_client_connector(&self) -> Arc<dyn SigningClientConnector> {
        Arc::new(FakeConnector(self.chain.clone()))
    }
}

pub fn success(hash: &str, events: Vec<TxEvent>) -> BroadcastResponse {
    BroadcastResponse {
        code: 0,
        transaction_hash: hash.into(),
        height: 100,
        gas_used: 90_000,
        gas_wanted: 120_000,
        events,
        ..Default::default()
    }
}

pub fn submit_proposal_event(id: &str) -> TxEvent {
    TxEvent {
        kind: "submit_proposal".into(),
        attributes: vec![EventAttribute {
            key: "proposal_id".into(),
            value: id.into(),
        }],
    }
}
