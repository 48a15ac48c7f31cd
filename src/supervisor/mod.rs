//! Supervisor layer
//!
//! Keeps the claim cycle running forever: failures and panics are reported, cooled
//! down and restarted from the balance fetch.

pub mod claim_loop;

pub use claim_loop::{ClaimSupervisor, CycleOutcome, SupervisorSummary};
