//! Key handling and transaction signing for NEAR accounts

pub mod key_pair;
pub mod key_store;
pub mod transaction;

pub use key_pair::{KeyPair, KeyParseError, PublicKey};
pub use key_store::InMemoryKeyStore;
pub use transaction::{Action, FunctionCallAction, SignedTransaction, Transaction};
