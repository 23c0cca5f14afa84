use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Collection, DocumentStore, Query, StoreError, StoreResult};

/// Process-local store, used by tests and throwaway instances.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, Value>>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn find(&self, collection: Collection, query: &Query) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.values().find(|doc| query.matches(doc)))
            .cloned())
    }

    async fn insert(&self, collection: Collection, id: &str, doc: Value) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::Conflict(format!("{collection} {id}")));
        }
        docs.insert(id.to_owned(), doc);
        Ok(())
    }

    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        match collections.get_mut(&collection).and_then(|docs| docs.get_mut(id)) {
            Some(slot) => {
                *slot = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }
}
