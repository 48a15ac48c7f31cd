use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{ClaimerError, Result};

/// Every fixed delay used by the claim cycle and its supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTiming {
    pub retry_backoff: Duration,
    pub success_hold: Duration,
    pub safety_margin: Duration,
    pub trailing_pad: Duration,
    pub tick: Duration,
    pub cooldown: Duration,
}

impl Default for ClaimTiming {
    fn default() -> Self {
        Self {
            retry_backoff: Duration::from_secs(5),
            success_hold: Duration::from_secs(5),
            safety_margin: Duration::from_secs(5 * 60),
            trailing_pad: Duration::from_secs(5),
            tick: Duration::from_secs(1),
            cooldown: Duration::from_secs(5),
        }
    }
}

impl ClaimTiming {
    /// Countdown length: the claim interval plus the safety margin, in whole milliseconds
    pub fn wait_millis(&self, interval_hours: f64) -> u64 {
        let margin = u64::try_from(self.safety_margin.as_millis()).unwrap_or(u64::MAX);
        hours_to_millis(interval_hours).saturating_add(margin)
    }
}

/// Whole milliseconds in `hours`; saturates at `u64::MAX`, negative and NaN give 0
pub fn hours_to_millis(hours: f64) -> u64 {
    (hours * 3_600_000.0).round().max(0.0) as u64
}

/// Sleep unless cancelled first
pub async fn pause(cancel: &CancellationToken, duration: Duration) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClaimerError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Drive `fut` to completion unless cancelled first
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClaimerError::Cancelled),
        value = fut => Ok(value),
    }
}
