use std::collections::BTreeMap;

/// Optional key/value store for raw form snapshots, keyed by schema source
/// URL. Restored on the next load of the same URL.
pub trait PersistenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, payload: &str);
}

/// Process-local store, useful for tests and single-session hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, payload: &str) {
        self.entries.insert(key.to_string(), payload.to_string());
    }
}
