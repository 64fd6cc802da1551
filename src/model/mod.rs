use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

pub mod entity;

mod error;
pub use error::{StorageError, StorageResult};

mod repo;
pub use repo::{ResourceType, ResourceTyped};

pub mod seed;

mod store;
pub use store::{FileStore, MemoryStore, Store};

/// Shared handle to the backing store. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ModelManager {
    store: Arc<dyn Store>,
}

impl ModelManager {
    pub fn new<S: Store + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn contains(&self, r#type: ResourceType) -> StorageResult<bool> {
        Ok(self.store.read(r#type.storage_key())?.is_some())
    }

    /// Loads a whole collection. A missing key is an empty collection.
    pub fn load_all<T>(&self) -> StorageResult<Vec<T>>
    where
        T: ResourceTyped + DeserializeOwned,
    {
        self.load_key(T::get_resource_type().storage_key())
    }

    /// Overwrites a whole collection.
    pub fn save_all<T>(&self, items: &[T]) -> StorageResult<()>
    where
        T: ResourceTyped + Serialize,
    {
        self.save_key(T::get_resource_type().storage_key(), items)
    }

    pub fn load_owned<T>(&self, owner: Uuid) -> StorageResult<Vec<T>>
    where
        T: ResourceTyped + DeserializeOwned,
    {
        self.load_key(&T::get_resource_type().owned_key(owner))
    }

    pub fn save_owned<T>(&self, owner: Uuid, items: &[T]) -> StorageResult<()>
    where
        T: ResourceTyped + Serialize,
    {
        self.save_key(&T::get_resource_type().owned_key(owner), items)
    }

    pub fn load_record<T: DeserializeOwned>(&self, r#type: ResourceType) -> StorageResult<Option<T>> {
        match self.store.read(r#type.storage_key())? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub fn save_record<T: Serialize>(&self, r#type: ResourceType, record: &T) -> StorageResult<()> {
        let text = serde_json::to_string(record)?;
        self.store.write(r#type.storage_key(), &text)
    }

    pub fn remove_record(&self, r#type: ResourceType) -> StorageResult<()> {
        self.store.remove(r#type.storage_key())
    }

    fn load_key<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Vec<T>> {
        match self.store.read(key)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_key<T: Serialize>(&self, key: &str, items: &[T]) -> StorageResult<()> {
        let text = serde_json::to_string(items)?;
        self.store.write(key, &text)
    }
}
