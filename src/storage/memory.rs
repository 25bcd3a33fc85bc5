use super::ProgressStore;
use crate::core::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory store. Clones share the same underlying map, so a caller can keep
/// a handle after moving one into the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.values.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.values.read()?.is_empty())
    }
}

impl ProgressStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read()?.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.write()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let mut store = MemoryStore::new();
        let observer = store.clone();

        store.set_string("MoonStone.version", "1.0.0").unwrap();
        assert_eq!(
            observer.get_string("MoonStone.version").unwrap().as_deref(),
            Some("1.0.0")
        );

        store.remove("MoonStone.version").unwrap();
        assert!(observer.is_empty().unwrap());
    }

    #[test]
    fn test_with_entry() {
        let store = MemoryStore::with_entry("App.version", "2.1.0");
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get_string("missing").unwrap(), None);
    }
}
