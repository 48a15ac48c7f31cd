use async_trait::async_trait;
use hotclaim::account::{AccountIdentity, Balance, BalanceSource, ClaimResult, YOCTO_PER_NEAR};
use hotclaim::error::{ClaimerError, ContractErrorKind, Result};
use hotclaim::status::{status_line, MemoryStatus};
use hotclaim::strategy::{ClaimAttempt, ClaimTiming, CycleController, CycleSettings};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;

struct FixedBalance(u128);

#[async_trait]
impl BalanceSource for FixedBalance {
    async fn fetch_balance(&self, _identity: &AccountIdentity) -> Result<Balance> {
        Ok(Balance::from_yocto(self.0))
    }
}

/// Fails the first `failures` attempts, then succeeds
struct FlakyClaimer {
    failures: u32,
    calls: AtomicU32,
}

impl FlakyClaimer {
    fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClaimAttempt for FlakyClaimer {
    async fn attempt(&self, _identity: &AccountIdentity, contract_id: &str) -> ClaimResult {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            ClaimResult::Failed {
                cause: ClaimerError::Contract {
                    contract_id: contract_id.to_string(),
                    method: "claim".to_string(),
                    kind: ContractErrorKind::ExecutionFailed,
                    message: "Smart contract panicked: Too early".to_string(),
                },
            }
        } else {
            ClaimResult::Claimed {
                transaction_id: format!("tx-{}", n),
            }
        }
    }
}

fn controller(
    interval_hours: f64,
    claimer: Arc<FlakyClaimer>,
    status: Arc<MemoryStatus>,
) -> CycleController {
    CycleController::new(
        AccountIdentity::new("alice.tg", "ed25519:unused"),
        CycleSettings {
            contract_id: "game.hot.tg".to_string(),
            interval_hours,
            timing: ClaimTiming::default(),
        },
        Arc::new(FixedBalance(5 * YOCTO_PER_NEAR)),
        claimer,
        status,
    )
}

#[tokio::test(start_paused = true)]
async fn claim_is_retried_until_it_succeeds() {
    let claimer = Arc::new(FlakyClaimer::new(3));
    let status = Arc::new(MemoryStatus::new());
    let controller = controller(1.0, claimer.clone(), status.clone());

    let start = Instant::now();
    let report = assert_ok!(controller.run_cycle(&CancellationToken::new()).await);

    assert_eq!(claimer.calls(), 4);
    assert_eq!(report.attempts, 4);
    assert_eq!(report.transaction_id, "tx-3");

    // 3 retry backoffs + success hold + countdown + trailing pad
    let expected = Duration::from_secs(3 * 5 + 5) + Duration::from_millis(3_900_000 + 5_000);
    assert_eq!(start.elapsed(), expected);

    let lines: Vec<String> = status
        .history_for("alice.tg")
        .iter()
        .filter_map(|r| status_line(&r.text).map(str::to_string))
        .collect();
    assert_eq!(lines[0], "Claiming...");
    let rejected = "game.hot.tg::claim execution failed: Smart contract panicked";
    let failures = lines.iter().filter(|l| l.contains(rejected)).count();
    assert_eq!(failures, 3);
    assert!(lines.iter().any(|l| l == "Claimed tx-3..."));
}

#[tokio::test(start_paused = true)]
async fn wait_is_interval_plus_safety_margin() {
    for (hours, wait_ms) in [(1.0, 3_900_000u64), (0.5, 2_100_000), (8.0, 29_100_000)] {
        let claimer = Arc::new(FlakyClaimer::new(0));
        let status = Arc::new(MemoryStatus::new());
        let controller = controller(hours, claimer, status.clone());
        assert_eq!(controller.total_wait_ms(), wait_ms);

        let report = assert_ok!(controller.run_cycle(&CancellationToken::new()).await);
        assert_eq!(report.waited, Duration::from_millis(wait_ms + 5_000));

        let first_mining = status
            .history_for("alice.tg")
            .into_iter()
            .filter_map(|r| status_line(&r.text).map(str::to_string))
            .find(|l| l.starts_with("Mining for"))
            .unwrap();
        let h = wait_ms / 3_600_000;
        let m = (wait_ms % 3_600_000) / 60_000;
        let s = (wait_ms % 60_000) / 1_000;
        assert_eq!(
            first_mining,
            format!("Mining for {} Hours {} Minutes {} Seconds...", h, m, s)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_once_per_second() {
    let status = Arc::new(MemoryStatus::new());
    let controller = controller(0.01, Arc::new(FlakyClaimer::new(0)), status.clone());

    let cancel = CancellationToken::new();
    assert_ok!(controller.run_cycle(&cancel).await);

    let ticks = status
        .history_for("alice.tg")
        .iter()
        .filter(|r| r.text.contains("Status : Mining for"))
        .count() as u64;
    assert_eq!(ticks, controller.total_wait_ms().div_ceil(1_000));

    let last = status.latest("alice.tg").unwrap();
    assert!(last.text.contains("Near Balance : 5"));
    let final_tick = "Mining for 0 Hours 0 Minutes 1 Seconds...";
    assert!(last.text.ends_with(final_tick));
}

#[tokio::test(start_paused = true)]
async fn retry_backoff_is_cancellable() {
    let claimer = Arc::new(FlakyClaimer::new(u32::MAX));
    let status = Arc::new(MemoryStatus::new());
    let controller = Arc::new(controller(1.0, claimer.clone(), status));

    let cancel = CancellationToken::new();
    let task = {
        let controller = controller.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { controller.run_cycle(&cancel).await })
    };

    // attempts at 0s, 5s and 10s, then backing off until 15s
    tokio::time::sleep(Duration::from_secs(12)).await;
    assert_eq!(claimer.calls(), 3);

    let before = Instant::now();
    cancel.cancel();
    let result = task.await.unwrap();
    assert!(matches!(result, Err(ClaimerError::Cancelled)));
    assert_eq!(before.elapsed(), Duration::ZERO);
    assert_eq!(claimer.calls(), 3);
}
