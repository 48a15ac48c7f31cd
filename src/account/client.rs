use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{AccountIdentity, AccountSession, Balance, BalanceSource, Connector};
use crate::error::{ClaimerError, Result};

/// Outcome of one contract invocation
#[derive(Debug)]
pub enum ClaimResult {
    Claimed { transaction_id: String },
    Failed { cause: ClaimerError },
}

impl ClaimResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ClaimResult::Claimed { .. })
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            ClaimResult::Claimed { transaction_id } => Some(transaction_id),
            ClaimResult::Failed { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<String> {
        match self {
            ClaimResult::Claimed { transaction_id } => Ok(transaction_id),
            ClaimResult::Failed { cause } => Err(cause),
        }
    }
}

impl From<Result<String>> for ClaimResult {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(transaction_id) => ClaimResult::Claimed { transaction_id },
            Err(cause) => ClaimResult::Failed { cause },
        }
    }
}

/// Account operations on top of a [`Connector`].
///
/// Every operation runs on its own session; nothing is cached between calls.
pub struct AccountClient<C> {
    connector: C,
}

impl<C: Connector> AccountClient<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Open a fresh session for `identity`
    pub async fn connect(&self, identity: &AccountIdentity) -> Result<C::Session> {
        debug!("Opening session for {}", identity.account_id());
        self.connector.connect(identity).await
    }

    pub async fn get_balance(&self, session: C::Session) -> Result<Balance> {
        let account_id = session.account_id().to_owned();
        let raw = session.total_balance().await?;
        debug!("{}: {} yoctoNEAR", account_id, raw);
        Ok(Balance::from_yocto(raw))
    }

    pub async fn invoke(
        &self,
        session: C::Session,
        contract_id: &str,
        method: &str,
        args: Value,
    ) -> ClaimResult {
        debug!(
            "{}: calling {}::{}",
            session.account_id(),
            contract_id,
            method
        );
        session
            .function_call(contract_id, method, args)
            .await
            .into()
    }
}

#[async_trait]
impl<C: Connector> BalanceSource for AccountClient<C> {
    async fn fetch_balance(&self, identity: &AccountIdentity) -> Result<Balance> {
        let session = self.connect(identity).await?;
        self.get_balance(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_result_into_result() {
        let claimed = ClaimResult::from(Ok("tx1".to_string()));
        assert!(claimed.is_success());
        assert_eq!(claimed.into_result().unwrap(), "tx1");

        let failed = ClaimResult::from(Err(ClaimerError::network("claim", "reset")));
        assert_eq!(failed.transaction_id(), None);
        let result = failed.into_result();
        assert!(matches!(result, Err(ClaimerError::Network { .. })));
    }
}
