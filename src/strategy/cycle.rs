//! Claim cycle state machine
//!
//! One cycle is: fetch the balance, claim until the contract accepts, then count down
//! the claim interval (plus a safety margin) before handing control back to the
//! supervisor. Every wait is a cancellation point.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::claimer::ClaimAttempt;
use super::countdown::Countdown;
use super::timing::{cancellable, pause, ClaimTiming};
use crate::account::{AccountIdentity, Balance, BalanceSource, ClaimResult};
use crate::error::Result;
use crate::status::{account_status, StatusSink, StatusUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    FetchingBalance,
    Claiming,
    Waiting,
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CyclePhase::FetchingBalance => write!(f, "fetching_balance"),
            CyclePhase::Claiming => write!(f, "claiming"),
            CyclePhase::Waiting => write!(f, "waiting"),
        }
    }
}

/// Progress of the current cycle; reset when the next cycle starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleState {
    pub phase: CyclePhase,
    pub last_balance: Option<Balance>,
    pub remaining_wait_ms: u64,
}

impl CycleState {
    fn new() -> Self {
        Self {
            phase: CyclePhase::FetchingBalance,
            last_balance: None,
            remaining_wait_ms: 0,
        }
    }
}

/// What a completed cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub balance: Balance,
    pub transaction_id: String,
    pub attempts: u32,
    pub waited: Duration,
}

/// What to claim and how often
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub contract_id: String,
    pub interval_hours: f64,
    pub timing: ClaimTiming,
}

pub struct CycleController {
    identity: AccountIdentity,
    settings: CycleSettings,
    balances: Arc<dyn BalanceSource>,
    claimer: Arc<dyn ClaimAttempt>,
    status: Arc<dyn StatusSink>,
    state: watch::Sender<CycleState>,
}

impl CycleController {
    pub fn new(
        identity: AccountIdentity,
        settings: CycleSettings,
        balances: Arc<dyn BalanceSource>,
        claimer: Arc<dyn ClaimAttempt>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let (state, _) = watch::channel(CycleState::new());
        Self {
            identity,
            settings,
            balances,
            claimer,
            status,
            state,
        }
    }

    pub fn identity(&self) -> &AccountIdentity {
        &self.identity
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    pub fn status_key(&self) -> &str {
        self.identity.account_id()
    }

    /// Snapshot of the running (or last) cycle
    pub fn state(&self) -> CycleState {
        self.state.borrow().clone()
    }

    /// Length of the waiting phase before the trailing pad
    pub fn total_wait_ms(&self) -> u64 {
        self.settings
            .timing
            .wait_millis(self.settings.interval_hours)
    }

    /// Run one full cycle.
    ///
    /// Only the balance fetch (and cancellation) can fail; claim failures are retried
    /// here without limit.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Result<CycleReport> {
        self.state.send_replace(CycleState::new());

        let fetch = self.balances.fetch_balance(&self.identity);
        let balance = cancellable(cancel, fetch).await??;
        self.state
            .send_modify(|state| state.last_balance = Some(balance));
        debug!("{}: balance {} NEAR", self.status_key(), balance);

        self.enter(CyclePhase::Claiming);
        self.show(&balance, "Claiming...");
        let (transaction_id, attempts) = self.claim_until_success(&balance, cancel).await?;

        self.enter(CyclePhase::Waiting);
        let waited = self.wait_out(&balance, cancel).await?;

        Ok(CycleReport {
            balance,
            transaction_id,
            attempts,
            waited,
        })
    }

    async fn claim_until_success(
        &self,
        balance: &Balance,
        cancel: &CancellationToken,
    ) -> Result<(String, u32)> {
        let timing = &self.settings.timing;
        let contract_id = &self.settings.contract_id;
        let key = self.status_key();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            let attempt = self.claimer.attempt(&self.identity, contract_id);
            let result = cancellable(cancel, attempt).await?;

            match result {
                ClaimResult::Claimed { transaction_id } => {
                    info!(
                        "{}: claimed on attempt {} (tx {})",
                        key, attempts, transaction_id
                    );
                    let claimed = format!("Claimed {}...", transaction_id);
                    let text = self.text(balance, &claimed);
                    self.status.put(key, StatusUpdate::text(text.clone()));
                    pause(cancel, timing.success_hold).await?;
                    self.status.put(key, StatusUpdate::finished(text));
                    return Ok((transaction_id, attempts));
                }
                ClaimResult::Failed { cause } => {
                    warn!("{}: claim attempt {} failed: {}", key, attempts, cause);
                    self.show(balance, &format!("{}...", cause));
                    pause(cancel, timing.retry_backoff).await?;
                }
            }
        }
    }

    fn enter(&self, phase: CyclePhase) {
        self.state.send_modify(|state| {
            debug!("{}: {} -> {}", self.status_key(), state.phase, phase);
            state.phase = phase;
        });
    }

    async fn wait_out(&self, balance: &Balance, cancel: &CancellationToken) -> Result<Duration> {
        let timing = &self.settings.timing;
        let total_ms = self.total_wait_ms();
        let started = tokio::time::Instant::now();
        info!(
            "{}: next claim in {}",
            self.status_key(),
            super::countdown::TimeBreakdown::from_millis(total_ms)
        );

        for tick in Countdown::new(total_ms, timing.tick) {
            self.state
                .send_modify(|state| state.remaining_wait_ms = tick.remaining_ms);
            let mining = format!("Mining for {}...", tick.breakdown);
            self.show(balance, &mining);
            pause(cancel, tick.sleep).await?;
        }
        self.state.send_modify(|state| state.remaining_wait_ms = 0);

        pause(cancel, timing.trailing_pad).await?;
        Ok(started.elapsed())
    }

    fn text(&self, balance: &Balance, status: &str) -> String {
        account_status(self.status_key(), Some(balance), status)
    }

    fn show(&self, balance: &Balance, status: &str) {
        let text = self.text(balance, status);
        self.status.put(self.status_key(), StatusUpdate::text(text));
    }
}
