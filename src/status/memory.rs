use std::collections::HashMap;
use std::sync::Mutex;

use super::{StatusRecord, StatusSink, StatusUpdate};

#[derive(Debug, Default)]
struct Inner {
    latest: HashMap<String, StatusRecord>,
    history: Vec<StatusRecord>,
}

/// Keeps every status write in memory, for headless embedding and inspection
#[derive(Debug, Default)]
pub struct MemoryStatus {
    inner: Mutex<Inner>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record for `key`, `None` once removed
    pub fn latest(&self, key: &str) -> Option<StatusRecord> {
        self.lock().latest.get(key).cloned()
    }

    /// Every write in order, including the final one of removed keys
    pub fn history(&self) -> Vec<StatusRecord> {
        self.lock().history.clone()
    }

    pub fn history_for(&self, key: &str) -> Vec<StatusRecord> {
        self.lock()
            .history
            .iter()
            .filter(|r| r.key == key)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the data intact; keep serving it
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatusSink for MemoryStatus {
    fn put(&self, key: &str, update: StatusUpdate) {
        let record = update.into_record(key);
        let mut inner = self.lock();
        inner.history.push(record.clone());
        if record.removed {
            inner.latest.remove(key);
        } else {
            inner.latest.insert(key.to_string(), record);
        }
    }

    fn remove(&self, key: &str) {
        self.lock().latest.remove(key);
    }
}
