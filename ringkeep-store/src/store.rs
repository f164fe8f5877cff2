use crate::entry::StoredEntry;
use crate::role::ReplicaRole;
use std::collections::HashMap;

/// The external key→string map collaborator, narrowed to the operations
/// the KV server layer needs: create-if-absent, update-if-present, read,
/// delete, and a full scan for stabilization.
pub trait KvStore {
    fn create(&mut self, key: &str, entry: StoredEntry) -> bool;
    fn update(&mut self, key: &str, entry: StoredEntry) -> bool;
    fn read(&self, key: &str) -> Option<&StoredEntry>;
    fn delete(&mut self, key: &str) -> bool;
    fn is_empty(&self) -> bool;
    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &StoredEntry)> + '_>;
    fn entries_with_role(&self, role: ReplicaRole) -> Vec<(String, StoredEntry)> {
        self.iter()
            .filter(|(_, e)| e.role == role)
            .map(|(k, e)| (k.to_string(), e.clone()))
            .collect()
    }
}

/// Plain in-memory `KvStore` backed by a `HashMap`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    map: HashMap<String, StoredEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryStore {
    fn create(&mut self, key: &str, entry: StoredEntry) -> bool {
        if self.map.contains_key(key) {
            false
        } else {
            self.map.insert(key.to_string(), entry);
            true
        }
    }

    fn update(&mut self, key: &str, entry: StoredEntry) -> bool {
        if self.map.contains_key(key) {
            self.map.insert(key.to_string(), entry);
            true
        } else {
            false
        }
    }

    fn read(&self, key: &str) -> Option<&StoredEntry> {
        self.map.get(key)
    }

    fn delete(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &StoredEntry)> + '_> {
        Box::new(self.map.iter().map(|(k, v)| (k.as_str(), v)))
    }
}
