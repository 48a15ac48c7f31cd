use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::error::{ClaimerError, Result};
use crate::strategy::ClaimTiming;

pub const DEFAULT_NETWORK_ID: &str = "mainnet";
pub const DEFAULT_RPC_URL: &str = "https://rpc.mainnet.near.org";
pub const DEFAULT_CONTRACT_ID: &str = "game.hot.tg";
pub const DEFAULT_CLAIM_METHOD: &str = "claim";
pub const DEFAULT_INTERVAL_HOURS: f64 = 1.0;
/// Longest accepted claim interval (one year)
pub const MAX_INTERVAL_HOURS: f64 = 24.0 * 365.0;
/// 30 Tgas, the NEAR JS client's default for function calls
pub const DEFAULT_GAS: u64 = 30_000_000_000_000;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub account: AccountConfig,
    pub network: NetworkConfig,
    pub claim: ClaimConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize, Default)]
pub struct AccountConfig {
    /// NEAR account that signs the claim (e.g. "alice.tg")
    #[serde(default)]
    pub account_id: String,
    /// Full-access or function-call key, "ed25519:<base58>"
    #[serde(default)]
    pub private_key: String,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("account_id", &self.account_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Network the key is registered under in the key store
    pub network_id: String,
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl NetworkConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network_id: DEFAULT_NETWORK_ID.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimConfig {
    pub contract_id: String,
    pub method: String,
    /// Hours between successful claims, before the safety margin
    pub interval_hours: f64,
    /// Gas attached to the function call
    #[serde(default = "default_gas")]
    pub gas: u64,
    /// Deposit attached to the function call, in yoctoNEAR
    #[serde(default = "default_deposit")]
    pub deposit_yocto: String,
}

fn default_deposit() -> String {
    "0".to_string()
}

fn default_gas() -> u64 {
    DEFAULT_GAS
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            contract_id: DEFAULT_CONTRACT_ID.to_string(),
            method: DEFAULT_CLAIM_METHOD.to_string(),
            interval_hours: DEFAULT_INTERVAL_HOURS,
            gas: DEFAULT_GAS,
            deposit_yocto: default_deposit(),
        }
    }
}

impl ClaimConfig {
    /// Attached deposit as a yoctoNEAR amount
    pub fn deposit(&self) -> Result<u128> {
        self.deposit_yocto.trim().parse::<u128>().map_err(|e| {
            ClaimerError::InvalidConfig(format!(
                "claim.deposit_yocto '{}' is not an integer: {}",
                self.deposit_yocto, e
            ))
        })
    }

    /// Interval actually used by the wait phase.
    ///
    /// Non-finite or non-positive values fall back to one hour; values above
    /// [`MAX_INTERVAL_HOURS`] are clamped to it.
    pub fn effective_interval_hours(&self) -> f64 {
        if !(self.interval_hours.is_finite() && self.interval_hours > 0.0) {
            warn!(
                "claim.interval_hours={} is not a positive number, using {}h",
                self.interval_hours, DEFAULT_INTERVAL_HOURS
            );
            DEFAULT_INTERVAL_HOURS
        } else if self.interval_hours > MAX_INTERVAL_HOURS {
            warn!(
                "claim.interval_hours={} is above the {}h maximum, clamping",
                self.interval_hours, MAX_INTERVAL_HOURS
            );
            MAX_INTERVAL_HOURS
        } else {
            self.interval_hours
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Delay between failed claim attempts
    pub retry_backoff_ms: u64,
    /// How long the "Claimed" line stays visible
    pub success_hold_ms: u64,
    /// Added on top of the claim interval
    pub safety_margin_ms: u64,
    /// Extra sleep after the countdown reaches zero
    pub trailing_pad_ms: u64,
    /// Countdown refresh period
    pub tick_ms: u64,
    /// Supervisor pause after a failed cycle
    pub cooldown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            retry_backoff_ms: 5_000,
            success_hold_ms: 5_000,
            safety_margin_ms: 300_000,
            trailing_pad_ms: 5_000,
            tick_ms: 1_000,
            cooldown_ms: 5_000,
        }
    }
}

impl TimingConfig {
    pub fn to_timing(&self) -> ClaimTiming {
        ClaimTiming {
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            success_hold: Duration::from_millis(self.success_hold_ms),
            safety_margin: Duration::from_millis(self.safety_margin_ms),
            trailing_pad: Duration::from_millis(self.trailing_pad_ms),
            tick: Duration::from_millis(self.tick_ms),
            cooldown: Duration::from_millis(self.cooldown_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusMode {
    /// Live redraw of the status block on the terminal
    #[default]
    Terminal,
    /// Status updates go to the log, for services and pipes
    Plain,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatusConfig {
    #[serde(default)]
    pub mode: StatusMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for the rolling log file; file logging is off when unset
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> std::result::Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let defaults = TimingConfig::default();

        let mut builder = Config::builder()
            .set_default("network.network_id", DEFAULT_NETWORK_ID)?
            .set_default("network.rpc_url", DEFAULT_RPC_URL)?
            .set_default("network.request_timeout_secs", default_request_timeout())?
            .set_default("claim.contract_id", DEFAULT_CONTRACT_ID)?
            .set_default("claim.method", DEFAULT_CLAIM_METHOD)?
            .set_default("claim.interval_hours", DEFAULT_INTERVAL_HOURS)?
            .set_default("claim.gas", DEFAULT_GAS)?
            .set_default("timing.retry_backoff_ms", defaults.retry_backoff_ms)?
            .set_default("timing.success_hold_ms", defaults.success_hold_ms)?
            .set_default("timing.safety_margin_ms", defaults.safety_margin_ms)?
            .set_default("timing.trailing_pad_ms", defaults.trailing_pad_ms)?
            .set_default("timing.tick_ms", defaults.tick_ms)?
            .set_default("timing.cooldown_ms", defaults.cooldown_ms)?
            .set_default("status.mode", "terminal")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?;

        // Flat variables of the original .env layout sit just above the defaults
        if let Ok(account_id) = std::env::var("ACCOUNT_ID") {
            builder = builder.set_default("account.account_id", account_id)?;
        }
        if let Ok(private_key) = std::env::var("PRIVATE_KEY") {
            builder = builder.set_default("account.private_key", private_key)?;
        }
        if let Some(hours) = std::env::var("CLAIM_INTERVAL")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
        {
            builder = builder.set_default("claim.interval_hours", hours)?;
        }

        let builder = builder
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("HOTCLAIM_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (HOTCLAIM__ACCOUNT__ACCOUNT_ID, etc.)
            .add_source(
                Environment::with_prefix("HOTCLAIM")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Build a configuration for a single account with all other settings at their defaults
    pub fn for_account(account_id: &str, private_key: &str) -> Self {
        Self {
            account: AccountConfig {
                account_id: account_id.to_string(),
                private_key: private_key.to_string(),
            },
            network: NetworkConfig::default(),
            claim: ClaimConfig::default(),
            timing: TimingConfig::default(),
            status: StatusConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Reject configurations the claimer cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.account.account_id.trim().is_empty() {
            return Err(ClaimerError::InvalidConfig(
                "account.account_id (or ACCOUNT_ID) is required".to_string(),
            ));
        }
        if self.account.private_key.trim().is_empty() {
            return Err(ClaimerError::InvalidConfig(
                "account.private_key (or PRIVATE_KEY) is required".to_string(),
            ));
        }
        url::Url::parse(&self.network.rpc_url).map_err(|e| {
            ClaimerError::InvalidConfig(format!(
                "network.rpc_url '{}' is not a valid URL: {}",
                self.network.rpc_url, e
            ))
        })?;
        if self.timing.tick_ms == 0 {
            return Err(ClaimerError::InvalidConfig(
                "timing.tick_ms must be greater than zero".to_string(),
            ));
        }
        if self.claim.interval_hours > MAX_INTERVAL_HOURS {
            return Err(ClaimerError::InvalidConfig(format!(
                "claim.interval_hours {} exceeds the {}h maximum",
                self.claim.interval_hours, MAX_INTERVAL_HOURS
            )));
        }
        self.claim.deposit()?;
        if self.claim.contract_id.trim().is_empty() || self.claim.method.trim().is_empty() {
            return Err(ClaimerError::InvalidConfig(
                "claim.contract_id and claim.method must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_matches_claim_cadence() {
        let timing = TimingConfig::default().to_timing();
        assert_eq!(timing.retry_backoff, Duration::from_secs(5));
        assert_eq!(timing.safety_margin, Duration::from_secs(300));
        assert_eq!(timing.tick, Duration::from_secs(1));
        assert_eq!(timing.cooldown, Duration::from_secs(5));
    }

    #[test]
    fn non_positive_interval_falls_back_to_one_hour() {
        let mut claim = ClaimConfig::default();
        claim.interval_hours = 0.0;
        assert_eq!(claim.effective_interval_hours(), 1.0);
        claim.interval_hours = f64::NAN;
        assert_eq!(claim.effective_interval_hours(), 1.0);
        claim.interval_hours = -2.0;
        assert_eq!(claim.effective_interval_hours(), 1.0);
        claim.interval_hours = 2.5;
        assert_eq!(claim.effective_interval_hours(), 2.5);
    }

    #[test]
    fn huge_interval_is_clamped_and_rejected() {
        let mut claim = ClaimConfig::default();
        claim.interval_hours = 1e13;
        assert_eq!(claim.effective_interval_hours(), MAX_INTERVAL_HOURS);
        claim.interval_hours = MAX_INTERVAL_HOURS;
        assert_eq!(claim.effective_interval_hours(), MAX_INTERVAL_HOURS);

        let mut config = AppConfig::for_account("alice.near", "ed25519:abc");
        config.claim.interval_hours = 1e13;
        assert!(matches!(
            config.validate(),
            Err(ClaimerError::InvalidConfig(_))
        ));
        config.claim.interval_hours = MAX_INTERVAL_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_requires_credentials() {
        let config = AppConfig::for_account("", "ed25519:abc");
        assert!(matches!(
            config.validate(),
            Err(ClaimerError::InvalidConfig(_))
        ));

        let config = AppConfig::for_account("alice.near", "  ");
        assert!(config.validate().is_err());

        let config = AppConfig::for_account("alice.near", "ed25519:abc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_rpc_url_and_zero_tick() {
        let mut config = AppConfig::for_account("alice.near", "ed25519:abc");
        config.network.rpc_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::for_account("alice.near", "ed25519:abc");
        config.timing.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn account_debug_redacts_private_key() {
        let config = AppConfig::for_account("alice.near", "ed25519:secret");
        let debug = format!("{:?}", config.account);
        assert!(debug.contains("alice.near"));
        assert!(!debug.contains("secret"));
    }
}
