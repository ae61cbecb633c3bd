//! In-memory storage

use rustc_hash::FxHashMap;

use super::{SnapshotStorage, StorageError};

/// Storage kept in a hash map, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-filled with `slots`.
    pub fn with_slots<K, V>(slots: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: slots
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Borrow the raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn save(&mut self, key: &str, data: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), data.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn save_overwrites_previous_value() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.save("k", "one")?;
        storage.save("k", "two")?;

        assert_eq!(storage.load("k")?.as_deref(), Some("two"));

        Ok(())
    }

    #[test]
    fn remove_missing_key_is_ok() -> TestResult {
        let mut storage = MemoryStorage::with_slots([("a", "1")]);

        storage.remove("b")?;
        storage.remove("a")?;

        assert_eq!(storage.load("a")?, None);

        Ok(())
    }
}
