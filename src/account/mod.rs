//! Account identity, balances and per-operation sessions

pub mod balance;
pub mod client;
pub mod identity;
pub mod session;

pub use balance::{Balance, YOCTO_PER_NEAR};
pub use client::{AccountClient, ClaimResult};
pub use identity::AccountIdentity;
pub use session::{AccountSession, BalanceSource, Connector};

#[cfg(test)]
pub use session::MockBalanceSource;
