use std::collections::HashMap;

use serde_json::Value;

use crate::error::StoreError;

use super::Store;

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl Store for MemoryStore {
    fn read_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write_json(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}
