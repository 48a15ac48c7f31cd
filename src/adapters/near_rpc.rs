//! NEAR JSON-RPC client (native Rust, no SDK dependency).
//!
//! Covers the three calls the claimer needs: `view_account`, `view_access_key`
//! and `broadcast_tx_commit`. RPC-level failures are surfaced as [`RpcError`] so
//! callers can decide whether they are transient or a contract rejection.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClaimerError, ContractErrorKind, Result};

/// Structured JSON-RPC error body
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RpcError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cause: Option<RpcErrorCause>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RpcErrorCause {
    pub name: String,
    #[serde(default)]
    pub info: Option<Value>,
}

impl RpcError {
    pub fn cause_name(&self) -> Option<&str> {
        self.cause.as_ref().map(|c| c.name.as_str())
    }

    /// Timeouts mean the transaction may still land; treat as transient
    pub fn is_timeout(&self) -> bool {
        self.cause_name() == Some("TIMEOUT_ERROR") || self.name.as_deref() == Some("TIMEOUT_ERROR")
    }

    pub fn is_internal(&self) -> bool {
        self.cause_name() == Some("INTERNAL_ERROR")
            || self.name.as_deref() == Some("INTERNAL_ERROR")
    }

    pub fn is_invalid_transaction(&self) -> bool {
        self.cause_name() == Some("INVALID_TRANSACTION")
    }

    pub fn describe(&self) -> String {
        let head = self
            .cause_name()
            .or(self.name.as_deref())
            .unwrap_or("RPC_ERROR");
        let detail = self
            .cause
            .as_ref()
            .and_then(|c| c.info.as_ref())
            .filter(|info| !is_empty_info(info))
            .or(self.data.as_ref())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .or_else(|| self.message.clone())
            .unwrap_or_default();

        if detail.is_empty() {
            head.to_string()
        } else {
            format!("{}: {}", head, detail)
        }
    }

    /// Map a failed read-only query onto the error taxonomy
    pub fn into_query_error(self, operation: &str) -> ClaimerError {
        ClaimerError::network(operation, self.describe())
    }

    /// Map a failed transaction submission onto the error taxonomy
    pub fn into_call_error(self, contract_id: &str, method: &str) -> ClaimerError {
        if self.is_timeout() {
            return ClaimerError::network("broadcast_tx_commit (timeout)", self.describe());
        }
        if self.is_internal() {
            return ClaimerError::network("broadcast_tx_commit", self.describe());
        }
        let kind = if self.is_invalid_transaction() {
            ContractErrorKind::InvalidTransaction
        } else {
            ContractErrorKind::Rejected
        };
        ClaimerError::Contract {
            contract_id: contract_id.to_string(),
            method: method.to_string(),
            kind,
            message: self.describe(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountView {
    /// Liquid balance, yoctoNEAR as a decimal string
    pub amount: String,
    /// Staked balance, yoctoNEAR as a decimal string
    pub locked: String,
    #[serde(default)]
    pub storage_usage: u64,
    #[serde(default)]
    pub block_hash: Option<String>,
}

impl AccountView {
    /// `amount + locked`, the figure wallets report as total
    pub fn total_yocto(&self) -> Result<u128> {
        let amount = parse_yocto("amount", &self.amount)?;
        let locked = parse_yocto("locked", &self.locked)?;
        amount.checked_add(locked).ok_or_else(|| {
            ClaimerError::Serialization("account balance overflows u128".to_string())
        })
    }
}

fn is_empty_info(info: &Value) -> bool {
    info.is_null() || info.as_object().is_some_and(|o| o.is_empty())
}

fn parse_yocto(field: &str, raw: &str) -> Result<u128> {
    raw.trim().parse::<u128>().map_err(|e| {
        let reason = format!("invalid {} '{}' in account view: {}", field, raw, e);
        ClaimerError::Serialization(reason)
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessKeyView {
    pub nonce: u64,
    pub block_hash: String,
    #[serde(default)]
    pub permission: Option<Value>,
}

impl AccessKeyView {
    pub fn block_hash_bytes(&self) -> Result<[u8; 32]> {
        let bytes = bs58::decode(&self.block_hash).into_vec().map_err(|e| {
            ClaimerError::Serialization(format!("invalid block hash '{}': {}", self.block_hash, e))
        })?;
        bytes.try_into().map_err(|b: Vec<u8>| {
            ClaimerError::Serialization(format!("block hash has {} bytes, expected 32", b.len()))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionView {
    pub hash: String,
}

/// Subset of `FinalExecutionOutcome` the claimer reads
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionOutcome {
    pub status: Value,
    pub transaction: TransactionView,
}

impl ExecutionOutcome {
    /// `Ok(())` for `SuccessValue`, otherwise the reason the transaction failed
    pub fn check_status(&self) -> std::result::Result<(), String> {
        if self.status.get("SuccessValue").is_some() {
            return Ok(());
        }
        if let Some(failure) = self.status.get("Failure") {
            return Err(failure_message(failure));
        }
        Err(format!("transaction not final: {}", self.status))
    }
}

/// Pull the human-readable reason out of a NEAR `Failure` tree
fn failure_message(failure: &Value) -> String {
    fn find_execution_error(value: &Value) -> Option<String> {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(msg)) = map.get("ExecutionError") {
                    return Some(msg.clone());
                }
                map.values().find_map(find_execution_error)
            }
            _ => None,
        }
    }

    find_execution_error(failure).unwrap_or_else(|| failure.to_string())
}

#[derive(Clone)]
pub struct NearRpcClient {
    http: Client,
    rpc_url: String,
}

impl NearRpcClient {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("hotclaim/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClaimerError::Internal(format!("RPC client: {}", e)))?;

        Ok(Self {
            http,
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<std::result::Result<T, RpcError>> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "hotclaim",
            "method": method,
            "params": params,
        });

        debug!("RPC {} -> {}", method, self.rpc_url);
        let response = self.http.post(&self.rpc_url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed: JsonRpcResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("RPC {} body is not JSON-RPC (HTTP {})", method, status);
                let detail = if text.trim().is_empty() {
                    e.to_string()
                } else {
                    text
                };
                let reason = format!("HTTP {}: {}", status, detail);
                return Err(ClaimerError::network(method, reason));
            }
        };

        if let Some(error) = parsed.error {
            return Ok(Err(error));
        }

        let result = parsed.result.ok_or_else(|| {
            ClaimerError::network(method, format!("HTTP {}: response has no result", status))
        })?;

        // Older nodes report query failures inside `result`
        if let Some(Value::String(message)) = result.get("error") {
            return Ok(Err(RpcError {
                name: Some("HANDLER_ERROR".to_string()),
                cause: None,
                code: None,
                message: Some(message.clone()),
                data: None,
            }));
        }

        Ok(Ok(serde_json::from_value(result)?))
    }

    pub async fn view_account(&self, account_id: &str) -> Result<AccountView> {
        let params = json!({
            "request_type": "view_account",
            "finality": "final",
            "account_id": account_id,
        });
        self.call("query", params)
            .await?
            .map_err(|e| e.into_query_error("view_account"))
    }

    pub async fn view_access_key(
        &self,
        account_id: &str,
        public_key: &str,
    ) -> Result<AccessKeyView> {
        let params = json!({
            "request_type": "view_access_key",
            "finality": "final",
            "account_id": account_id,
            "public_key": public_key,
        });
        self.call("query", params)
            .await?
            .map_err(|e| e.into_query_error("view_access_key"))
    }

    /// Submit a signed transaction and wait for its final outcome
    pub async fn broadcast_tx_commit(
        &self,
        signed_tx_base64: &str,
    ) -> Result<std::result::Result<ExecutionOutcome, RpcError>> {
        self.call("broadcast_tx_commit", json!([signed_tx_base64]))
            .await
    }
}

impl std::fmt::Debug for NearRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearRpcClient")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc_error(value: Value) -> RpcError {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_timeout_is_network_error() {
        let err = rpc_error(json!({
            "name": "HANDLER_ERROR",
            "cause": {"name": "TIMEOUT_ERROR", "info": {}},
            "code": -32000,
            "message": "Server error",
            "data": "Timeout"
        }));
        assert!(matches!(
            err.into_call_error("game.hot.tg", "claim"),
            ClaimerError::Network { .. }
        ));
    }

    #[test]
    fn test_invalid_transaction_is_contract_error() {
        let err = rpc_error(json!({
            "name": "HANDLER_ERROR",
            "cause": {"name": "INVALID_TRANSACTION", "info": {"InvalidNonce": {"ak_nonce": 5, "tx_nonce": 5}}},
            "code": -32000,
            "message": "Server error"
        }));
        match err.into_call_error("game.hot.tg", "claim") {
            ClaimerError::Contract { kind, message, .. } => {
                assert_eq!(kind, ContractErrorKind::InvalidTransaction);
                assert!(message.contains("InvalidNonce"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_failure_status_extracts_execution_error() {
        let outcome: ExecutionOutcome = serde_json::from_value(json!({
            "status": {"Failure": {"ActionError": {"index": 0, "kind": {
                "FunctionCallError": {"ExecutionError": "Smart contract panicked: Too early to claim"}
            }}}},
            "transaction": {"hash": "abc"}
        }))
        .unwrap();
        assert_eq!(
            outcome.check_status().unwrap_err(),
            "Smart contract panicked: Too early to claim"
        );
    }

    #[test]
    fn test_success_status() {
        let outcome: ExecutionOutcome = serde_json::from_value(json!({
            "status": {"SuccessValue": ""},
            "transaction": {"hash": "abc"}
        }))
        .unwrap();
        assert!(outcome.check_status().is_ok());
    }

    #[test]
    fn test_account_total_includes_locked() {
        let view = AccountView {
            amount: "1000000000000000000000000".to_string(),
            locked: "500000000000000000000000".to_string(),
            storage_usage: 0,
            block_hash: None,
        };
        assert_eq!(
            view.total_yocto().unwrap(),
            1_500_000_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_block_hash_must_be_32_bytes() {
        let view = AccessKeyView {
            nonce: 1,
            block_hash: bs58::encode([1u8; 31]).into_string(),
            permission: None,
        };
        assert!(view.block_hash_bytes().is_err());

        let view = AccessKeyView {
            nonce: 1,
            block_hash: bs58::encode([1u8; 32]).into_string(),
            permission: None,
        };
        assert_eq!(view.block_hash_bytes().unwrap(), [1u8; 32]);
    }
}
