//! Record storage abstractions.
//!
//! Every screen in the application is "fetch a collection, write back a
//! row", so storage is one generic keyed-collection trait per table.
//! Cross-record filtering (vacant callings, pending tasks, unassigned
//! members) happens over `list()` results in the service layer.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use memory::MemCollection;

/// Storage backend failure (network, pool, SQL).
///
/// Deterministic domain failures never originate here; this is the
/// "backend unreachable or rejected the call" arm of the error taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// A keyed record collection with a count-only query variant.
#[async_trait]
pub trait Collection<K, V>: Send + Sync {
    async fn get(&self, key: K) -> Result<Option<V>, StoreError>;
    async fn list(&self) -> Result<Vec<V>, StoreError>;
    async fn upsert(&self, key: K, value: V) -> Result<(), StoreError>;
    /// Returns whether a record was actually removed.
    async fn delete(&self, key: K) -> Result<bool, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
}

#[async_trait]
impl<K, V, S> Collection<K, V> for Arc<S>
where
    K: Send + 'static,
    V: Send + 'static,
    S: Collection<K, V> + ?Sized,
{
    async fn get(&self, key: K) -> Result<Option<V>, StoreError> {
        (**self).get(key).await
    }

    async fn list(&self) -> Result<Vec<V>, StoreError> {
        (**self).list().await
    }

    async fn upsert(&self, key: K, value: V) -> Result<(), StoreError> {
        (**self).upsert(key, value).await
    }

    async fn delete(&self, key: K) -> Result<bool, StoreError> {
        (**self).delete(key).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        (**self).count().await
    }
}
