pub mod account;
pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod signing;
pub mod status;
pub mod strategy;
pub mod supervisor;

pub use account::{AccountClient, AccountIdentity, Balance, ClaimResult};
pub use adapters::{NearConnector, NearRpcClient, NearSession};
pub use config::AppConfig;
pub use error::{ClaimerError, Result};
pub use signing::{KeyPair, PublicKey};
pub use status::{LogStatus, MemoryStatus, StatusSink, StatusUpdate, TerminalStatus};
pub use strategy::{ClaimAttempt, ClaimTiming, ContractClaimer, CycleController, CycleSettings};
pub use supervisor::{ClaimSupervisor, SupervisorSummary};
