//! Adapter contract tests against the in-memory host.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chain_cosmos::chain_config::{cosmos_hub, evm_devnet};
use chain_cosmos::{build_fee, KeyAlgorithm};
use common::*;
use gov_proposals::build_cancel_upgrade_message;
use wallet_core::*;

// ─── Availability and registry ─────────────────────────────────────

#[test]
fn availability_follows_host() {
    let host = Arc::new(FakeHost::keplr());
    let registry = WalletRegistry::new(host);
    assert_eq!(registry.available(), vec![WalletKind::Keplr]);

    let keplr = registry.adapter(WalletKind::Keplr).unwrap();
    let leap = registry.adapter(WalletKind::Leap).unwrap();
    assert_eq!(keplr.name(), "Keplr");
    assert_eq!(leap.name(), "Leap");
    assert!(keplr.is_available());
    assert!(!leap.is_available());
}

#[test]
fn registry_replaces_adapters() {
    let host: Arc<dyn HostEnvironment> = Arc::new(FakeHost::empty());
    let mut registry = WalletRegistry::new(host.clone());
    registry.register(WalletKind::Leap, Arc::new(ExtensionWallet::keplr(host)));
    assert_eq!(registry.adapter(WalletKind::Leap).unwrap().name(), "Keplr");
}

#[tokio::test]
async fn connect_without_extension_is_unavailable() {
    let host = Arc::new(FakeHost::empty());
    let wallet = ExtensionWallet::leap(host);
    let err = wallet.connect("cosmoshub-4").await.unwrap_err();
    assert!(matches!(err, WalletError::WalletUnavailable(_)));
}

// ─── Connect ───────────────────────────────────────────────────────

#[tokio::test]
async fn connect_returns_first_account() {
    let host = Arc::new(FakeHost::keplr());
    let wallet = ExtensionWallet::keplr(host.clone());

    let account = wallet.connect("cosmoshub-4").await.unwrap();
    assert_eq!(account.address, ACCOUNT);
    assert_eq!(account.pubkey, ACCOUNT_PUBKEY);
    assert_eq!(account.algorithm, KeyAlgorithm::Secp256k1);
    assert_eq!(*host.extensions["keplr"].enabled.lock().unwrap(), vec!["cosmoshub-4"]);
}

#[tokio::test]
async fn connect_fails_when_enable_fails() {
    let host = Arc::new(
        FakeHost::empty().with_extension("keplr", FakeProvider::failing_enable("chain not found")),
    );
    let err = ExtensionWallet::keplr(host).connect("unknown-1").await.unwrap_err();
    assert!(matches!(err, WalletError::WalletConnectionFailed(m) if m.contains("chain not found")));
}

#[tokio::test]
async fn connect_fails_without_accounts() {
    let host = Arc::new(FakeHost::empty().with_extension("leap", FakeProvider::new(vec![])));
    let err = ExtensionWallet::leap(host).connect("cosmoshub-4").await.unwrap_err();
    assert!(matches!(err, WalletError::WalletConnectionFailed(_)));
}

#[tokio::test]
async fn connect_rejects_mismatched_account() {
    let mut account = test_account();
    account.address = RECIPIENT.into();
    let host =
        Arc::new(FakeHost::empty().with_extension("keplr", FakeProvider::new(vec![account])));
    let err = ExtensionWallet::keplr(host).connect("cosmoshub-4").await.unwrap_err();
    assert!(matches!(err, WalletError::WalletConnectionFailed(_)));
}

#[tokio::test]
async fn rejected_enable_while_signing_is_classified() {
    let host = Arc::new(
        FakeHost::empty().with_extension("keplr", FakeProvider::failing_enable("Request rejected")),
    );
    let wallet = ExtensionWallet::keplr(host.clone());
    let fee = build_fee(200_000, "0.025uatom", None, None).unwrap();
    let msg = build_cancel_upgrade_message(RECIPIENT).to_encode_object();

    let err = wallet
        .sign_and_broadcast("http://localhost:26657", "cosmoshub-4", &[msg], &fee, "")
        .await
        .unwrap_err();
    assert_eq!(err, WalletError::UserRejectedSigning("Request rejected".into()));
    assert!(host.chain.calls().is_empty());

    // Connecting still reports a connection failure.
    let err = wallet.connect("cosmoshub-4").await.unwrap_err();
    assert!(matches!(err, WalletError::WalletConnectionFailed(_)));
}

#[tokio::test]
async fn disconnect_is_a_no_op() {
    let host = Arc::new(FakeHost::empty());
    assert!(ExtensionWallet::keplr(host).disconnect().await.is_ok());
}

// ─── Sign and broadcast ────────────────────────────────────────────

#[tokio::test]
async fn sign_and_broadcast_uses_connector() {
    let host = Arc::new(FakeHost::keplr());
    host.chain.push_response(Ok(success("ABC123", vec![])));
    let wallet = ExtensionWallet::keplr(host.clone());

    let fee = build_fee(200_000, "0.025uatom", None, None).unwrap();
    let msg = build_cancel_upgrade_message(RECIPIENT).to_encode_object();
    let response = wallet
        .sign_and_broadcast("http://localhost:26657", "cosmoshub-4", &[msg], &fee, "memo")
        .await
        .unwrap();

    assert_eq!(response.transaction_hash, "ABC123");
    let calls = host.chain.calls();
    assert_eq!(calls[0].rpc, "http://localhost:26657");
    assert_eq!(calls[0].fee.amount[0].amount, "5000");
}

// ─── Ledger stub ───────────────────────────────────────────────────

#[tokio::test]
async fn ledger_stub_rejects_signing() {
    let mut host = FakeHost::empty();
    host.hardware = true;
    let ledger = LedgerWallet::new(Arc::new(host));

    assert!(ledger.is_available());
    assert_eq!(ledger.name(), "Ledger");
    assert!(matches!(
        ledger.connect("cosmoshub-4").await,
        Err(WalletError::NotSupported(_))
    ));
    assert!(matches!(
        ledger.get_signer("cosmoshub-4").await,
        Err(WalletError::NotSupported(_))
    ));

    let fee = build_fee(1, "1uatom", None, None).unwrap();
    assert!(matches!(
        ledger.sign_and_broadcast("rpc", "cosmoshub-4", &[], &fee, "").await,
        Err(WalletError::NotSupported(_))
    ));
    assert!(ledger.disconnect().await.is_ok());
    assert!(ledger.as_chain_suggestible().is_none());
    assert!(ledger.as_account_watcher().is_none());
}

#[tokio::test]
async fn ledger_unavailable_without_transport() {
    let ledger = LedgerWallet::new(Arc::new(FakeHost::empty()));
    assert!(!ledger.is_available());
    assert!(matches!(
        ledger.connect("cosmoshub-4").await,
        Err(WalletError::WalletUnavailable(_))
    ));
    assert!(matches!(
        ledger.get_signer("cosmoshub-4").await,
        Err(WalletError::WalletUnavailable(_))
    ));
}

// ─── Optional capabilities ─────────────────────────────────────────

#[tokio::test]
async fn suggest_chain_translates_config() {
    let host = Arc::new(FakeHost::keplr());
    let wallet = ExtensionWallet::keplr(host.clone());

    let suggestible = wallet.as_chain_suggestible().unwrap();
    suggestible.suggest_chain(&evm_devnet()).await.unwrap();

    let suggested = host.extensions["keplr"].suggested.lock().unwrap().clone();
    assert_eq!(suggested.len(), 1);
    assert_eq!(suggested[0].chain_id, "cosmos_262144-1");
    assert_eq!(suggested[0].bip44.coin_type, 60);
    assert_eq!(suggested[0].fee_currencies[0].gas_price_step.high, 1_500_000_000.0);
}

#[tokio::test]
async fn suggest_chain_requires_extension() {
    let wallet = ExtensionWallet::keplr(Arc::new(FakeHost::empty()));
    let err = wallet
        .as_chain_suggestible()
        .unwrap()
        .suggest_chain(&cosmos_hub())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::WalletUnavailable(_)));
}

#[test]
fn account_change_subscription_lifecycle() {
    let host = Arc::new(FakeHost::keplr());
    let wallet = ExtensionWallet::keplr(host.clone());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();

    let mut subscription = wallet.as_account_watcher().unwrap().on_account_change(
        "cosmoshub-4",
        Box::new(move |chain_id| recorded.lock().unwrap().push(chain_id.to_string())),
    );
    assert_eq!(host.bus.listener_count("keplr_keystorechange"), 1);

    host.bus.emit("leap_keystorechange");
    host.bus.emit("keplr_keystorechange");
    assert_eq!(*seen.lock().unwrap(), vec!["cosmoshub-4"]);

    subscription.dispose();
    subscription.dispose();
    assert_eq!(host.bus.listener_count("keplr_keystorechange"), 0);

    host.bus.emit("keplr_keystorechange");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn resubscribing_replaces_previous_listener() {
    let host = Arc::new(FakeHost::keplr());
    let wallet = ExtensionWallet::keplr(host.clone());
    let watcher = wallet.as_account_watcher().unwrap();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let counter = first.clone();
    let mut old = watcher.on_account_change(
        "cosmoshub-4",
        Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    let counter = second.clone();
    let current = watcher.on_account_change(
        "cosmoshub-4",
        Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    host.bus.emit("keplr_keystorechange");
    assert_eq!(host.bus.listener_count("keplr_keystorechange"), 1);
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);

    // The replaced handle no longer owns a listener.
    old.dispose();
    assert_eq!(host.bus.listener_count("keplr_keystorechange"), 1);

    drop(current);
    assert_eq!(host.bus.listener_count("keplr_keystorechange"), 0);
}

#[test]
fn dropping_subscription_removes_listener() {
    let host = Arc::new(FakeHost::empty().with_extension("leap", FakeProvider::new(vec![])));
    let wallet = ExtensionWallet::leap(host.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    {
        let _subscription = wallet.as_account_watcher().unwrap().on_account_change(
            "evmos_9001-2",
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        host.bus.emit("leap_keystorechange");
    }

    host.bus.emit("leap_keystorechange");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(host.bus.listener_count("leap_keystorechange"), 0);
}
