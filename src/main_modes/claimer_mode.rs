use hotclaim::account::{AccountClient, AccountIdentity};
use hotclaim::adapters::NearConnector;
use hotclaim::config::{AppConfig, StatusMode};
use hotclaim::error::Result;
use hotclaim::status::{LogStatus, StatusSink, TerminalStatus};
use hotclaim::strategy::{ContractClaimer, CycleController, CycleSettings};
use hotclaim::supervisor::{ClaimSupervisor, SupervisorSummary};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run_claimer(
    config: &AppConfig,
    identity: AccountIdentity,
) -> Result<SupervisorSummary> {
    let interval_hours = config.claim.effective_interval_hours();
    info!(
        "Starting auto-claimer for {} (contract={}, method={}, interval={}h, rpc={})",
        identity.account_id(),
        config.claim.contract_id,
        config.claim.method,
        interval_hours,
        config.network.rpc_url
    );

    let client = Arc::new(AccountClient::new(NearConnector::from_config(config)?));
    let claimer = Arc::new(ContractClaimer::with_method(
        client.clone(),
        &config.claim.method,
    ));

    let status: Arc<dyn StatusSink> = match config.status.mode {
        StatusMode::Terminal => Arc::new(TerminalStatus::stdout()),
        StatusMode::Plain => Arc::new(LogStatus::default()),
    };

    let settings = CycleSettings {
        contract_id: config.claim.contract_id.clone(),
        interval_hours,
        timing: config.timing.to_timing(),
    };
    let key = identity.account_id().to_string();
    let controller = Arc::new(CycleController::new(
        identity,
        settings,
        client,
        claimer,
        status.clone(),
    ));

    let cancel = CancellationToken::new();
    let supervisor = ClaimSupervisor::new(controller, status.clone(), cancel.clone());

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
        }
    });

    let summary = supervisor.run().await;
    status.remove(&key);
    info!(
        "Claimer stopped: {} claimed, {} failed cycles ({} panics)",
        summary.cycles_completed, summary.cycles_failed, summary.panics
    );
    Ok(summary)
}
