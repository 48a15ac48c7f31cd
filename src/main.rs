use clap::Parser;
use hotclaim::account::AccountIdentity;
use hotclaim::cli::{Cli, Commands};
use hotclaim::config::{AppConfig, StatusMode};
use tracing::{error, info};

mod main_modes;
mod main_runtime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment and config files still apply
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let command = cli.command();

    let mut config = AppConfig::load_from(&cli.config_dir)?;
    if cli.plain {
        config.status.mode = StatusMode::Plain;
    }
    if let Some(hours) = cli.interval {
        config.claim.interval_hours = hours;
    }

    let console = command != Commands::Run || config.status.mode == StatusMode::Plain;
    let _log_guard = main_runtime::init_logging(&config.logging, console);

    if let Err(e) = config.validate() {
        error!("{}", e);
        return Err(e.into());
    }

    let identity = AccountIdentity::from_config(&config.account);
    identity.validate_secret()?;
    info!(
        "Loaded account {} on {}",
        identity.account_id(),
        config.network.network_id
    );

    match command {
        Commands::Run => {
            main_modes::run_claimer(&config, identity).await?;
        }
        Commands::Balance => {
            main_modes::run_balance(&config, &identity).await?;
        }
        Commands::Claim => {
            main_modes::run_claim(&config, &identity).await?;
        }
    }

    Ok(())
}
