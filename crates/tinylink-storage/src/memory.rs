use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tinylink_core::repository::{Repository, Result, SlimRecord, UrlRecord};
use tinylink_core::{ShortCode, StorageError};

/// In-memory implementation of the Repository trait.
///
/// A single lock guards the whole map, so every operation (including the
/// `list_all` snapshot) observes a consistent state.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: RwLock<HashMap<ShortCode, UrlRecord>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.storage.read().get(code).cloned())
    }

    async fn set(&self, code: &ShortCode, record: SlimRecord) -> Result<()> {
        let mut storage = self.storage.write();

        match storage.entry(code.clone()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.slim.url = record.url;
                existing.slim.updated_at = record.updated_at;
            }
            Entry::Vacant(entry) => {
                entry.insert(UrlRecord::from(record));
            }
        }

        Ok(())
    }

    async fn update(&self, code: &ShortCode, record: SlimRecord) -> Result<()> {
        let mut storage = self.storage.write();
        let existing = storage
            .get_mut(code)
            .ok_or_else(|| StorageError::NotFound(code.to_string()))?;

        existing.slim.url = record.url;
        existing.slim.updated_at = record.updated_at;
        Ok(())
    }

    async fn insert(&self, code: &ShortCode, record: SlimRecord) -> Result<()> {
        match self.storage.write().entry(code.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(UrlRecord::from(record));
                Ok(())
            }
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        self.storage.write().remove(code);
        Ok(())
    }

    async fn list_all(&self) -> Result<BTreeMap<ShortCode, UrlRecord>> {
        let storage = self.storage.read();
        Ok(storage
            .iter()
            .map(|(code, record)| (code.clone(), record.clone()))
            .collect())
    }

    async fn increment_access_count(&self, code: &ShortCode) -> Result<u64> {
        let mut storage = self.storage.write();
        let record = storage
            .get_mut(code)
            .ok_or_else(|| StorageError::NotFound(code.to_string()))?;

        record.access_count += 1;
        Ok(record.access_count)
    }
}
