//! Single claim attempt against the rewards contract

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::account::{AccountClient, AccountIdentity, ClaimResult, Connector};
use crate::config::DEFAULT_CLAIM_METHOD;

/// One contract invocation per call; retrying is the caller's job
#[async_trait]
pub trait ClaimAttempt: Send + Sync {
    async fn attempt(&self, identity: &AccountIdentity, contract_id: &str) -> ClaimResult;
}

/// Claims through a fresh session of an [`AccountClient`]
pub struct ContractClaimer<C> {
    client: Arc<AccountClient<C>>,
    method: String,
}

impl<C: Connector> ContractClaimer<C> {
    pub fn new(client: Arc<AccountClient<C>>) -> Self {
        Self::with_method(client, DEFAULT_CLAIM_METHOD)
    }

    pub fn with_method(client: Arc<AccountClient<C>>, method: &str) -> Self {
        Self {
            client,
            method: method.to_string(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

#[async_trait]
impl<C: Connector> ClaimAttempt for ContractClaimer<C> {
    async fn attempt(&self, identity: &AccountIdentity, contract_id: &str) -> ClaimResult {
        let session = match self.client.connect(identity).await {
            Ok(session) => session,
            Err(cause) => return ClaimResult::Failed { cause },
        };

        debug!(
            "Calling {}::{} for {}",
            contract_id,
            self.method,
            identity.account_id()
        );
        self.client
            .invoke(session, contract_id, &self.method, json!({}))
            .await
    }
}
