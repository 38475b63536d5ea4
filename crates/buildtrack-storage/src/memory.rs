//! In-memory storage, used by tests and ephemeral sessions.

use crate::error::{Result, StorageError};
use crate::Storage;
use std::collections::BTreeMap;

/// Key/value storage held in memory.
///
/// `set_failing(true)` makes every subsequent write fail, which lets callers
/// exercise their storage-failure paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
    failing: bool,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle write failures.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if self.failing {
            return Err(StorageError::Unavailable(format!("write to '{key}' refused")));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.failing {
            return Err(StorageError::Unavailable(format!("remove of '{key}' refused")));
        }
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStorage::new();
        store.set_item("a", "1").expect("set");
        assert_eq!(store.get_item("a").expect("get"), Some("1".to_string()));
        store.remove_item("a").expect("remove");
        assert_eq!(store.get_item("a").expect("get"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_failing_store_rejects_writes_but_keeps_data() {
        let mut store = MemoryStorage::new();
        store.set_item("a", "1").expect("set");
        store.set_failing(true);
        assert!(store.set_item("a", "2").is_err());
        assert!(store.remove_item("a").is_err());
        assert_eq!(store.get_item("a").expect("get"), Some("1".to_string()));
    }
}
