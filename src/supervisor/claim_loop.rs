//! Claim supervisor
//!
//! Runs claim cycles back to back for one account. A failed or panicking cycle is
//! reported on the status sink, followed by a cooldown and a fresh cycle; only
//! cancellation ends the loop.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{ClaimerError, Result};
use crate::status::{account_status, StatusSink, StatusUpdate};
use crate::strategy::{pause, CycleController};

/// Outcome of one supervised cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed { transaction_id: String },
    Failed { message: String },
    Panicked { message: String },
}

/// Counters for a supervisor run
#[derive(Debug, Clone, Default)]
pub struct SupervisorSummary {
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub panics: u64,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
}

impl SupervisorSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Completed { .. } => self.cycles_completed += 1,
            CycleOutcome::Failed { message } => {
                self.cycles_failed += 1;
                self.last_error = Some(message.clone());
                self.last_error_at = Some(Utc::now());
            }
            CycleOutcome::Panicked { message } => {
                self.cycles_failed += 1;
                self.panics += 1;
                self.last_error = Some(message.clone());
                self.last_error_at = Some(Utc::now());
            }
        }
    }
}

pub struct ClaimSupervisor {
    controller: Arc<CycleController>,
    status: Arc<dyn StatusSink>,
    cooldown: Duration,
    cancel: CancellationToken,
}

impl ClaimSupervisor {
    pub fn new(
        controller: Arc<CycleController>,
        status: Arc<dyn StatusSink>,
        cancel: CancellationToken,
    ) -> Self {
        let cooldown = controller.settings().timing.cooldown;
        Self {
            controller,
            status,
            cooldown,
            cancel,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Loop until cancelled
    pub async fn run(&self) -> SupervisorSummary {
        let account_id = self.controller.status_key().to_string();
        let mut summary = SupervisorSummary::default();
        info!("Starting claim loop for {}", account_id);

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let outcome = match self.run_once().await {
                Ok(outcome) => outcome,
                Err(ClaimerError::Cancelled) => break,
                Err(err) => CycleOutcome::Failed {
                    message: self.report_failure(&err.message(), err.cause()),
                },
            };
            summary.record(&outcome);

            if !matches!(outcome, CycleOutcome::Completed { .. })
                && pause(&self.cancel, self.cooldown).await.is_err()
            {
                break;
            }
        }

        info!(
            "Claim loop for {} stopped after {} cycles ({} failed)",
            account_id, summary.cycles_completed, summary.cycles_failed
        );
        summary
    }

    /// One cycle with panics contained; errors are returned unreported
    pub async fn run_once(&self) -> Result<CycleOutcome> {
        let cycle = AssertUnwindSafe(self.controller.run_cycle(&self.cancel)).catch_unwind();
        match cycle.await {
            Ok(Ok(report)) => Ok(CycleOutcome::Completed {
                transaction_id: report.transaction_id,
            }),
            Ok(Err(err)) => Err(err),
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                Ok(CycleOutcome::Panicked {
                    message: self.report_failure("Claim cycle panicked", Some(detail)),
                })
            }
        }
    }

    fn report_failure(&self, message: &str, cause: Option<String>) -> String {
        let key = self.controller.status_key();
        let line = format!("{} - {}", message, cause.unwrap_or_default());
        warn!("{}: {}, restarting in {:?}", key, line, self.cooldown);
        self.status.put(
            key,
            StatusUpdate::text(account_status(key, None, &format!("{}...", line))),
        );
        line
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
