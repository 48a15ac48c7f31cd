//! Per-account status display
//!
//! The claim cycle pushes a text block per account key; sinks decide how to show it.

pub mod log;
pub mod memory;
pub mod terminal;

pub use log::LogStatus;
pub use memory::MemoryStatus;
pub use terminal::TerminalStatus;

use crate::account::Balance;

/// Last known display state for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub key: String,
    pub text: String,
    pub active: bool,
    pub removed: bool,
}

/// A write to a key; unset flags keep their defaults (active, not removed)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub text: String,
    pub active: Option<bool>,
    pub removed: Option<bool>,
}

impl StatusUpdate {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Final write for a key: stop refreshing it and drop it from the live view
    pub fn finished(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            active: Some(false),
            removed: Some(true),
        }
    }

    pub fn into_record(self, key: &str) -> StatusRecord {
        StatusRecord {
            key: key.to_string(),
            text: self.text,
            active: self.active.unwrap_or(true),
            removed: self.removed.unwrap_or(false),
        }
    }
}

/// Receives live status text per account key.
///
/// Called inline from the claim cycle, so implementations must not block for long.
pub trait StatusSink: Send + Sync {
    fn put(&self, key: &str, update: StatusUpdate);

    fn remove(&self, key: &str);
}

/// Status block used by the claim cycle
pub fn account_status(account_id: &str, balance: Option<&Balance>, status: &str) -> String {
    match balance {
        Some(balance) => format!(
            "Account ID : {}\nNear Balance : {}\nStatus : {}",
            account_id, balance, status
        ),
        None => format!("Account ID : {}\nStatus : {}", account_id, status),
    }
}

/// The `Status : ...` line of a block, if present
pub fn status_line(text: &str) -> Option<&str> {
    text.lines()
        .find_map(|line| line.trim().strip_prefix("Status : "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::YOCTO_PER_NEAR;

    #[test]
    fn test_update_defaults() {
        let record = StatusUpdate::text("hello").into_record("alice.tg");
        assert!(record.active);
        assert!(!record.removed);

        let record = StatusUpdate::finished("bye").into_record("alice.tg");
        assert!(!record.active);
        assert!(record.removed);
    }

    #[test]
    fn test_account_status_layout() {
        let balance = crate::account::Balance::from_yocto(2 * YOCTO_PER_NEAR);
        let text = account_status("alice.tg", Some(&balance), "Claiming...");
        assert_eq!(
            text,
            "Account ID : alice.tg\nNear Balance : 2\nStatus : Claiming..."
        );
        assert_eq!(status_line(&text), Some("Claiming..."));

        let text = account_status("alice.tg", None, "boom - ...");
        assert_eq!(text, "Account ID : alice.tg\nStatus : boom - ...");
    }
}
