use hotclaim::account::{AccountClient, AccountIdentity, BalanceSource};
use hotclaim::adapters::NearConnector;
use hotclaim::config::AppConfig;
use hotclaim::error::Result;
use hotclaim::status::account_status;
use hotclaim::strategy::{ClaimAttempt, ContractClaimer};
use std::sync::Arc;
use tracing::{error, info};

mod claimer_mode;

pub use claimer_mode::run_claimer;

/// Print the current balance once
pub async fn run_balance(config: &AppConfig, identity: &AccountIdentity) -> Result<()> {
    let client = AccountClient::new(NearConnector::from_config(config)?);
    let balance = client.fetch_balance(identity).await?;
    println!(
        "Account ID : {}\nNear Balance : {}",
        identity.account_id(),
        balance
    );
    Ok(())
}

/// One claim attempt without retries
pub async fn run_claim(config: &AppConfig, identity: &AccountIdentity) -> Result<String> {
    let client = Arc::new(AccountClient::new(NearConnector::from_config(config)?));
    let claimer = ContractClaimer::with_method(client, &config.claim.method);

    info!(
        "Claiming {}::{} for {}",
        config.claim.contract_id,
        claimer.method(),
        identity.account_id()
    );
    let result = claimer.attempt(identity, &config.claim.contract_id).await;
    match result.into_result() {
        Ok(transaction_id) => {
            println!(
                "{}",
                account_status(
                    identity.account_id(),
                    None,
                    &format!("Claimed {}...", transaction_id)
                )
            );
            Ok(transaction_id)
        }
        Err(cause) => {
            error!("Claim failed: {}", cause);
            Err(cause)
        }
    }
}
