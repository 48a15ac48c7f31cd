use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, trace};

use super::{status_line, StatusSink, StatusUpdate};

#[derive(Debug)]
struct LastLogged {
    kind: String,
    at: Instant,
}

/// Status sink for non-interactive runs.
///
/// A status line is logged when its kind changes (first word: "Claiming", "Claimed",
/// "Mining", ...) or when `refresh` has passed since the last line for that key, so the
/// per-second countdown does not flood the log.
#[derive(Debug)]
pub struct LogStatus {
    refresh: Duration,
    last: Mutex<HashMap<String, LastLogged>>,
}

impl LogStatus {
    pub fn new(refresh: Duration) -> Self {
        Self {
            refresh,
            last: Mutex::new(HashMap::new()),
        }
    }

    fn should_log(&self, key: &str, kind: &str, force: bool) -> bool {
        let mut last = self.last.lock().unwrap_or_else(|p| p.into_inner());
        let now = Instant::now();
        let due = match last.get(key) {
            Some(prev) => force || prev.kind != kind || now.duration_since(prev.at) >= self.refresh,
            None => true,
        };
        if due {
            last.insert(
                key.to_string(),
                LastLogged {
                    kind: kind.to_string(),
                    at: now,
                },
            );
        }
        due
    }
}

impl Default for LogStatus {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl StatusSink for LogStatus {
    fn put(&self, key: &str, update: StatusUpdate) {
        let line = status_line(&update.text).unwrap_or(update.text.as_str());
        let kind = line.split_whitespace().next().unwrap_or_default();
        let removed = update.removed.unwrap_or(false);

        if self.should_log(key, kind, removed) {
            info!(account = %key, "{}", line);
        } else {
            trace!(account = %key, "{}", line);
        }
    }

    fn remove(&self, key: &str) {
        self.last
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_is_throttled() {
        let sink = LogStatus::new(Duration::from_secs(60));
        assert!(sink.should_log("alice.tg", "Mining", false));
        assert!(!sink.should_log("alice.tg", "Mining", false));
        assert!(sink.should_log("alice.tg", "Claiming", false));
        assert!(sink.should_log("alice.tg", "Claiming", true));
        assert!(sink.should_log("bob.tg", "Mining", false));
    }
}
