//! NEAR transaction encoding
//!
//! Transactions are borsh-encoded; the transaction id is the SHA-256 digest of the
//! encoded (unsigned) transaction, and that digest is what the account key signs.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

use super::key_pair::ED25519_KEY_TYPE;
use super::{KeyPair, PublicKey};
use crate::error::{ClaimerError, Result};

/// Borsh variant index of `FunctionCall` in NEAR's `Action` enum
const FUNCTION_CALL_ACTION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl BorshSerialize for Action {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Action::FunctionCall(call) => {
                BorshSerialize::serialize(&FUNCTION_CALL_ACTION, writer)?;
                BorshSerialize::serialize(call, writer)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: PublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl Transaction {
    /// Single function call from `signer_id` to `receiver_id`
    pub fn function_call(
        signer_id: &str,
        public_key: PublicKey,
        nonce: u64,
        receiver_id: &str,
        block_hash: [u8; 32],
        call: FunctionCallAction,
    ) -> Self {
        Self {
            signer_id: signer_id.to_string(),
            public_key,
            nonce,
            receiver_id: receiver_id.to_string(),
            block_hash,
            actions: vec![Action::FunctionCall(call)],
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        borsh::to_vec(self).map_err(|e| ClaimerError::Serialization(e.to_string()))
    }

    pub fn hash(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.encode()?).into())
    }

    pub fn sign(self, key: &KeyPair) -> Result<SignedTransaction> {
        let hash = self.hash()?;
        let signature = key.sign(&hash);
        Ok(SignedTransaction {
            transaction: self,
            signature,
            hash,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    signature: [u8; 64],
    hash: [u8; 32],
}

impl BorshSerialize for SignedTransaction {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        BorshSerialize::serialize(&self.transaction, writer)?;
        BorshSerialize::serialize(&ED25519_KEY_TYPE, writer)?;
        BorshSerialize::serialize(&self.signature, writer)
    }
}

impl SignedTransaction {
    /// Transaction id as the explorer and RPC show it
    pub fn hash_base58(&self) -> String {
        bs58::encode(self.hash).into_string()
    }

    pub fn signature(&self) -> &[u8; 64] {
        &self.signature
    }

    /// Payload for `broadcast_tx_commit`
    pub fn to_base64(&self) -> Result<String> {
        let bytes = borsh::to_vec(self).map_err(|e| ClaimerError::Serialization(e.to_string()))?;
        Ok(BASE64_STANDARD.encode(bytes))
    }
}
