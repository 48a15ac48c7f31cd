use async_trait::async_trait;
use serde_json::Value;

use super::{AccountIdentity, Balance};
use crate::error::Result;

/// Authenticated handle for one account, good for exactly one remote operation.
///
/// Both operations take `self` so a session cannot be reused once it has been spent;
/// nonce and key state are always read fresh by the next session.
#[async_trait]
pub trait AccountSession: Send + Sized {
    fn account_id(&self) -> &str;

    /// Total balance in base units
    async fn total_balance(self) -> Result<u128>;

    /// Submit a state-changing function call and return the confirmed transaction hash
    async fn function_call(self, contract_id: &str, method: &str, args: Value) -> Result<String>;
}

/// Opens sessions for an identity
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: AccountSession;

    async fn connect(&self, identity: &AccountIdentity) -> Result<Self::Session>;
}

/// Anything that can report an account's balance
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balance(&self, identity: &AccountIdentity) -> Result<Balance>;
}
