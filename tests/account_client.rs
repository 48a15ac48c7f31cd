use async_trait::async_trait;
use hotclaim::account::{
    AccountClient, AccountIdentity, AccountSession, BalanceSource, ClaimResult, Connector,
    YOCTO_PER_NEAR,
};
use hotclaim::error::{ClaimerError, Result};
use hotclaim::strategy::{ClaimAttempt, ContractClaimer};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Ledger {
    connects: u32,
    /// (session id, operation) in call order
    operations: Vec<(u32, String)>,
}

struct StubConnector {
    ledger: Arc<Mutex<Ledger>>,
    balance: u128,
    reject_calls: bool,
}

impl StubConnector {
    fn new(balance: u128) -> (Self, Arc<Mutex<Ledger>>) {
        let ledger = Arc::new(Mutex::new(Ledger::default()));
        (
            Self {
                ledger: ledger.clone(),
                balance,
                reject_calls: false,
            },
            ledger,
        )
    }
}

struct StubSession {
    id: u32,
    account_id: String,
    ledger: Arc<Mutex<Ledger>>,
    balance: u128,
    reject_calls: bool,
}

#[async_trait]
impl Connector for StubConnector {
    type Session = StubSession;

    async fn connect(&self, identity: &AccountIdentity) -> Result<StubSession> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.connects += 1;
        Ok(StubSession {
            id: ledger.connects,
            account_id: identity.account_id().to_string(),
            ledger: self.ledger.clone(),
            balance: self.balance,
            reject_calls: self.reject_calls,
        })
    }
}

#[async_trait]
impl AccountSession for StubSession {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    async fn total_balance(self) -> Result<u128> {
        self.ledger
            .lock()
            .unwrap()
            .operations
            .push((self.id, "balance".to_string()));
        Ok(self.balance)
    }

    async fn function_call(self, contract_id: &str, method: &str, args: Value) -> Result<String> {
        assert_eq!(args, json!({}));
        self.ledger
            .lock()
            .unwrap()
            .operations
            .push((self.id, format!("{}::{}", contract_id, method)));
        if self.reject_calls {
            return Err(ClaimerError::network("broadcast_tx_commit", "reset"));
        }
        Ok(format!("tx-{}", self.id))
    }
}

fn identity() -> AccountIdentity {
    AccountIdentity::new("alice.tg", "ed25519:unused")
}

#[tokio::test]
async fn every_operation_opens_its_own_session() {
    let (connector, ledger) = StubConnector::new(YOCTO_PER_NEAR);
    let client = Arc::new(AccountClient::new(connector));
    let claimer = ContractClaimer::new(client.clone());

    client.fetch_balance(&identity()).await.unwrap();
    let first = claimer.attempt(&identity(), "game.hot.tg").await;
    let second = claimer.attempt(&identity(), "game.hot.tg").await;
    client.fetch_balance(&identity()).await.unwrap();

    assert_eq!(first.transaction_id(), Some("tx-2"));
    assert_eq!(second.transaction_id(), Some("tx-3"));

    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.connects, 4);
    assert_eq!(
        ledger.operations,
        vec![
            (1, "balance".to_string()),
            (2, "game.hot.tg::claim".to_string()),
            (3, "game.hot.tg::claim".to_string()),
            (4, "balance".to_string()),
        ]
    );
}

#[tokio::test]
async fn balance_is_normalized_to_near() {
    let (connector, _) = StubConnector::new(YOCTO_PER_NEAR);
    let client = AccountClient::new(connector);
    let balance = client.fetch_balance(&identity()).await.unwrap();
    assert_eq!(balance.near(), dec!(1));

    let (connector, _) = StubConnector::new(1_234_500_000_000_000_000_000_000);
    let client = AccountClient::new(connector);
    let balance = client.fetch_balance(&identity()).await.unwrap();
    assert_eq!(balance.near(), dec!(1.2345));
    assert_eq!(balance.to_string(), "1.2345");

    let (connector, _) = StubConnector::new(0);
    let client = AccountClient::new(connector);
    let balance = client.fetch_balance(&identity()).await.unwrap();
    assert_eq!(balance.near(), dec!(0));
}

#[tokio::test]
async fn failed_call_becomes_failed_result() {
    let (mut connector, _) = StubConnector::new(0);
    connector.reject_calls = true;
    let client = Arc::new(AccountClient::new(connector));

    let result = ContractClaimer::with_method(client, "claim")
        .attempt(&identity(), "game.hot.tg")
        .await;
    assert!(!result.is_success());
    match result {
        ClaimResult::Failed { cause } => assert!(cause.is_transient()),
        ClaimResult::Claimed { .. } => panic!("claim should have failed"),
    }
}
