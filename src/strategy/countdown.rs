use std::time::Duration;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Whole hours, minutes and seconds of a millisecond count (floor semantics)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBreakdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeBreakdown {
    pub fn from_millis(ms: u64) -> Self {
        Self {
            hours: ms / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }
}

impl std::fmt::Display for TimeBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Hours {} Minutes {} Seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// One countdown step: what to show, then how long to sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub remaining_ms: u64,
    pub breakdown: TimeBreakdown,
    pub sleep: Duration,
}

/// Splits a wait into ticks.
///
/// The last tick only covers what is left, so the ticks always sum to the total.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining_ms: u64,
    tick_ms: u64,
}

impl Countdown {
    pub fn new(total_ms: u64, tick: Duration) -> Self {
        Self {
            remaining_ms: total_ms,
            tick_ms: (tick.as_millis() as u64).max(1),
        }
    }
}

impl Iterator for Countdown {
    type Item = CountdownTick;

    fn next(&mut self) -> Option<CountdownTick> {
        if self.remaining_ms == 0 {
            return None;
        }
        let step = self.tick_ms.min(self.remaining_ms);
        let tick = CountdownTick {
            remaining_ms: self.remaining_ms,
            breakdown: TimeBreakdown::from_millis(self.remaining_ms),
            sleep: Duration::from_millis(step),
        };
        self.remaining_ms -= step;
        Some(tick)
    }
}
