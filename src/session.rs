use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session storage is unavailable: {0}")]
    Unavailable(String),
    #[error("session storage rejected '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

/// Key/value storage scoped to one browser session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ends the session, dropping every key.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemorySessionStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "true").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("true"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("a", "1").unwrap();
        store.clear();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
