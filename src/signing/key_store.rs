use std::collections::HashMap;

use super::KeyPair;

/// Keys held in process memory, looked up by network and account
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyStore {
    keys: HashMap<(String, String), KeyPair>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, network_id: &str, account_id: &str, key_pair: KeyPair) {
        self.keys
            .insert((network_id.to_string(), account_id.to_string()), key_pair);
    }

    pub fn get_key(&self, network_id: &str, account_id: &str) -> Option<&KeyPair> {
        self.keys
            .get(&(network_id.to_string(), account_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
