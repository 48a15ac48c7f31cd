use borsh::BorshSerialize;
use ed25519_dalek::{Signer, SigningKey};
use thiserror::Error;
use zeroize::Zeroize;

pub const ED25519_PREFIX: &str = "ed25519";

/// NEAR key type tag for ed25519 in borsh-encoded keys and signatures
pub(crate) const ED25519_KEY_TYPE: u8 = 0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("unsupported key curve '{0}', expected ed25519")]
    UnsupportedCurve(String),

    #[error("secret key is not valid base58: {0}")]
    InvalidEncoding(String),

    #[error("secret key has {0} bytes, expected 32 or 64")]
    InvalidLength(usize),

    #[error("public half of the secret key does not match its seed")]
    PublicKeyMismatch,
}

/// ed25519 public key as NEAR encodes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = bs58::encode(self.0).into_string();
        write!(f, "{}:{}", ED25519_PREFIX, encoded)
    }
}

impl BorshSerialize for PublicKey {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        BorshSerialize::serialize(&ED25519_KEY_TYPE, writer)?;
        BorshSerialize::serialize(&self.0, writer)
    }
}

/// Signing key derived from an `ed25519:<base58>` secret
///
/// # Security
/// The decoded secret bytes are zeroized right after the signing key is built, and
/// the signing key itself is zeroized on drop. `Debug` only shows the public key.
#[derive(Clone)]
pub struct KeyPair {
    signing: SigningKey,
}

impl KeyPair {
    /// Parse a NEAR secret key string.
    ///
    /// Accepts `ed25519:<base58>` or bare base58, holding either the 64-byte
    /// seed+public form or a bare 32-byte seed.
    pub fn from_secret(encoded: &str) -> Result<Self, KeyParseError> {
        let encoded = encoded.trim();
        let (curve, data) = encoded.split_once(':').unwrap_or((ED25519_PREFIX, encoded));

        if !curve.eq_ignore_ascii_case(ED25519_PREFIX) {
            return Err(KeyParseError::UnsupportedCurve(curve.to_string()));
        }

        let mut bytes = bs58::decode(data)
            .into_vec()
            .map_err(|e| KeyParseError::InvalidEncoding(e.to_string()))?;

        let result = Self::from_secret_bytes(&bytes);
        bytes.zeroize();
        result
    }

    fn from_secret_bytes(bytes: &[u8]) -> Result<Self, KeyParseError> {
        if bytes.len() != 32 && bytes.len() != 64 {
            return Err(KeyParseError::InvalidLength(bytes.len()));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let signing = SigningKey::from_bytes(&seed);
        seed.zeroize();

        if bytes.len() == 64 && signing.verifying_key().as_bytes()[..] != bytes[32..] {
            return Err(KeyParseError::PublicKeyMismatch);
        }

        Ok(Self { signing })
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing.verifying_key().to_bytes())
    }

    /// Sign raw bytes (NEAR signs the SHA-256 digest of the transaction)
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }

    /// Encode as `ed25519:<base58(seed || public)>`
    pub fn to_secret_string(&self) -> String {
        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(&self.signing.to_bytes());
        raw[32..].copy_from_slice(self.signing.verifying_key().as_bytes());
        let encoded = format!("{}:{}", ED25519_PREFIX, bs58::encode(raw).into_string());
        raw.zeroize();
        encoded
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key().to_string())
            .finish()
    }
}

impl std::str::FromStr for KeyPair {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_secret(s)
    }
}
