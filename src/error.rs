use thiserror::Error;

/// Why a contract call was turned down by the network or the contract itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorKind {
    /// The transaction executed but an action failed (e.g. the contract panicked)
    ExecutionFailed,
    /// The transaction was rejected before execution (bad nonce, expired block hash, ...)
    InvalidTransaction,
    /// Any other rejection the RPC reported for this call
    Rejected,
}

impl std::fmt::Display for ContractErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractErrorKind::ExecutionFailed => write!(f, "execution failed"),
            ContractErrorKind::InvalidTransaction => write!(f, "invalid transaction"),
            ContractErrorKind::Rejected => write!(f, "rejected"),
        }
    }
}

/// Main error type for the claimer
#[derive(Error, Debug)]
pub enum ClaimerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Credential errors
    #[error("Authentication failed for {account_id}: {reason}")]
    Authentication { account_id: String, reason: String },

    // Transient RPC / connectivity errors
    #[error("Network error during {operation}: {reason}")]
    Network { operation: String, reason: String },

    // Business-logic rejections from the claim call
    #[error("Contract {contract_id}::{method} {kind}: {message}")]
    Contract {
        contract_id: String,
        method: String,
        kind: ContractErrorKind,
        message: String,
    },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type alias for ClaimerError
pub type Result<T> = std::result::Result<T, ClaimerError>;

impl ClaimerError {
    pub fn network(operation: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ClaimerError::Network {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    pub fn auth(account_id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ClaimerError::Authentication {
            account_id: account_id.into(),
            reason: reason.to_string(),
        }
    }

    /// Headline shown on the status line
    pub fn message(&self) -> String {
        match self {
            ClaimerError::Authentication { .. } => "Authentication failed".to_string(),
            ClaimerError::Network { operation, .. } => {
                format!("Network error during {}", operation)
            }
            ClaimerError::Contract {
                contract_id,
                method,
                kind,
                ..
            } => format!("{}::{} {}", contract_id, method, kind),
            other => other.to_string(),
        }
    }

    /// Underlying detail, if the variant carries one separately from the headline
    pub fn cause(&self) -> Option<String> {
        match self {
            ClaimerError::Authentication { reason, .. } | ClaimerError::Network { reason, .. } => {
                Some(reason.clone())
            }
            ClaimerError::Contract { message, .. } => Some(message.clone()),
            _ => std::error::Error::source(self).map(|s| s.to_string()),
        }
    }

    /// Retrying the same operation later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClaimerError::Network { .. } | ClaimerError::Contract { .. }
        )
    }
}

impl From<reqwest::Error> for ClaimerError {
    fn from(err: reqwest::Error) -> Self {
        let operation = if err.is_timeout() {
            "rpc request (timeout)"
        } else if err.is_connect() {
            "rpc connect"
        } else {
            "rpc request"
        };
        ClaimerError::network(operation, err)
    }
}
