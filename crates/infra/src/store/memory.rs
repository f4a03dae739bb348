//! In-memory collection for dev and tests.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Collection, StoreError};

/// `RwLock<HashMap>`-backed collection. Poisoned locks surface as backend
/// errors rather than panics, matching how a remote-store failure would
/// present.
#[derive(Debug)]
pub struct MemCollection<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> MemCollection<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for MemCollection<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> Collection<K, V> for MemCollection<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: K) -> Result<Option<V>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(map.get(&key).cloned())
    }

    async fn list(&self) -> Result<Vec<V>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(map.values().cloned().collect())
    }

    async fn upsert(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        map.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: K) -> Result<bool, StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(map.remove(&key).is_some())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(map.len() as u64)
    }
}
