//! NEAR-backed sessions
//!
//! Each session gets its own key store and reads the access-key nonce fresh, so a
//! stale nonce from an earlier call can never leak into the next transaction.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::near_rpc::NearRpcClient;
use crate::account::{AccountIdentity, AccountSession, Connector};
use crate::config::{AppConfig, NetworkConfig};
use crate::error::{ClaimerError, Result};
use crate::signing::{FunctionCallAction, InMemoryKeyStore, KeyPair, Transaction};

/// Gas and deposit attached to every function call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSettings {
    pub gas: u64,
    pub deposit: u128,
}

impl Default for CallSettings {
    fn default() -> Self {
        Self {
            gas: crate::config::DEFAULT_GAS,
            deposit: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NearConnector {
    rpc: NearRpcClient,
    network_id: String,
    call: CallSettings,
}

impl NearConnector {
    pub fn new(rpc: NearRpcClient, network_id: &str, call: CallSettings) -> Self {
        Self {
            rpc,
            network_id: network_id.to_string(),
            call,
        }
    }

    pub fn from_network(network: &NetworkConfig, call: CallSettings) -> Result<Self> {
        let rpc = NearRpcClient::new(&network.rpc_url, network.request_timeout())?;
        Ok(Self::new(rpc, &network.network_id, call))
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let call = CallSettings {
            gas: config.claim.gas,
            deposit: config.claim.deposit()?,
        };
        Self::from_network(&config.network, call)
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }
}

#[async_trait]
impl Connector for NearConnector {
    type Session = NearSession;

    async fn connect(&self, identity: &AccountIdentity) -> Result<NearSession> {
        let key_pair = KeyPair::from_secret(identity.secret_key())
            .map_err(|e| ClaimerError::auth(identity.account_id(), e))?;

        let mut key_store = InMemoryKeyStore::new();
        key_store.set_key(&self.network_id, identity.account_id(), key_pair);

        Ok(NearSession {
            rpc: self.rpc.clone(),
            network_id: self.network_id.clone(),
            account_id: identity.account_id().to_string(),
            key_store,
            call: self.call,
        })
    }
}

#[derive(Debug)]
pub struct NearSession {
    rpc: NearRpcClient,
    network_id: String,
    account_id: String,
    key_store: InMemoryKeyStore,
    call: CallSettings,
}

impl NearSession {
    fn key_pair(&self) -> Result<&KeyPair> {
        self.key_store
            .get_key(&self.network_id, &self.account_id)
            .ok_or_else(|| {
                ClaimerError::auth(
                    &self.account_id,
                    format!("no key for network {}", self.network_id),
                )
            })
    }
}

#[async_trait]
impl AccountSession for NearSession {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    async fn total_balance(self) -> Result<u128> {
        let view = self.rpc.view_account(&self.account_id).await?;
        view.total_yocto()
    }

    async fn function_call(self, contract_id: &str, method: &str, args: Value) -> Result<String> {
        let key_pair = self.key_pair()?;
        let public_key = key_pair.public_key();

        let access_key = self
            .rpc
            .view_access_key(&self.account_id, &public_key.to_string())
            .await?;
        let nonce = access_key.nonce + 1;
        let block_hash = access_key.block_hash_bytes()?;

        let args = serde_json::to_vec(&args)?;
        let signed = Transaction::function_call(
            &self.account_id,
            public_key,
            nonce,
            contract_id,
            block_hash,
            FunctionCallAction {
                method_name: method.to_string(),
                args,
                gas: self.call.gas,
                deposit: self.call.deposit,
            },
        )
        .sign(key_pair)?;

        debug!(
            "Broadcasting {}::{} from {} (nonce {}, tx {})",
            contract_id,
            method,
            self.account_id,
            nonce,
            signed.hash_base58()
        );

        let outcome = self
            .rpc
            .broadcast_tx_commit(&signed.to_base64()?)
            .await?
            .map_err(|e| e.into_call_error(contract_id, method))?;

        outcome
            .check_status()
            .map_err(|message| ClaimerError::Contract {
                contract_id: contract_id.to_string(),
                method: method.to_string(),
                kind: crate::error::ContractErrorKind::ExecutionFailed,
                message,
            })?;

        info!(
            "{}::{} confirmed for {}: {}",
            contract_id, method, self.account_id, outcome.transaction.hash
        );
        Ok(outcome.transaction.hash)
    }
}
