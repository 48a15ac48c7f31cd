use zeroize::Zeroize;

use crate::config::AccountConfig;
use crate::error::{ClaimerError, Result};
use crate::signing::KeyPair;

/// Account id plus the secret used to sign for it.
///
/// Immutable after construction; the secret is zeroized when the identity is dropped.
#[derive(Clone)]
pub struct AccountIdentity {
    account_id: String,
    secret_key: String,
}

impl AccountIdentity {
    pub fn new(account_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_config(config: &AccountConfig) -> Self {
        Self::new(config.account_id.trim(), config.private_key.trim())
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Parse the secret once so a malformed key fails at startup instead of every cycle
    pub fn validate_secret(&self) -> Result<()> {
        KeyPair::from_secret(&self.secret_key)
            .map(|_| ())
            .map_err(|e| ClaimerError::auth(&self.account_id, e))
    }
}

impl Drop for AccountIdentity {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

impl std::fmt::Debug for AccountIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountIdentity")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret() {
        let key = KeyPair::from_seed([4u8; 32]);
        let identity = AccountIdentity::new("alice.tg", key.to_secret_string());
        assert!(identity.validate_secret().is_ok());

        let broken = AccountIdentity::new("alice.tg", "ed25519:not-base58!");
        match broken.validate_secret() {
            Err(ClaimerError::Authentication { account_id, .. }) => {
                assert_eq!(account_id, "alice.tg")
            }
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_omits_secret() {
        let identity = AccountIdentity::new("alice.tg", "ed25519:topsecret");
        let debug = format!("{:?}", identity);
        assert!(debug.contains("alice.tg"));
        assert!(!debug.contains("topsecret"));
    }
}
