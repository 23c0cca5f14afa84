//! JSON document persistence, keyed by identifier.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::fmt;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Comment, Dm, Identifiable, Identifier, Post, User};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} already exists")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    User,
    Post,
    Comment,
    Dm,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        use Collection::*;
        match self {
            User => "user",
            Post => "post",
            Comment => "comment",
            Dm => "dm",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Matches a document when any clause's field equals its string value.
#[derive(Debug, Clone, Default)]
pub struct Query {
    any_of: Vec<(String, String)>,
}

impl Query {
    pub fn by(field: &str, value: impl Into<String>) -> Self {
        Query::default().or(field, value)
    }

    pub fn or(mut self, field: &str, value: impl Into<String>) -> Self {
        self.any_of.push((field.to_owned(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, String)] {
        &self.any_of
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.any_of
            .iter()
            .any(|(field, value)| doc.get(field).and_then(Value::as_str) == Some(value.as_str()))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>>;
    async fn find(&self, collection: Collection, query: &Query) -> StoreResult<Option<Value>>;
    /// Fails with [`StoreError::Conflict`] when `id` is taken.
    async fn insert(&self, collection: Collection, id: &str, doc: Value) -> StoreResult<()>;
    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> StoreResult<bool>;
    async fn remove(&self, collection: Collection, id: &str) -> StoreResult<bool>;
}

pub trait Document: Identifiable + Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
}

impl Document for User {
    const COLLECTION: Collection = Collection::User;
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Post;
}

impl Document for Comment {
    const COLLECTION: Collection = Collection::Comment;
}

impl Document for Dm {
    const COLLECTION: Collection = Collection::Dm;
}

pub async fn get<T: Document>(store: &dyn DocumentStore, id: &str) -> StoreResult<Option<T>> {
    match store.get(T::COLLECTION, id).await? {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

/// An already resolved identifier is returned as is.
pub async fn resolve<T: Document + Clone>(
    store: &dyn DocumentStore,
    item: &Identifier<T>,
) -> StoreResult<Option<T>> {
    match item {
        Identifier::Resolved(doc) => Ok(Some((**doc).clone())),
        Identifier::Key(key) => get(store, key).await,
    }
}

pub async fn search<T: Document>(store: &dyn DocumentStore, query: &Query) -> StoreResult<Option<T>> {
    match store.find(T::COLLECTION, query).await? {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

pub async fn create_item<T: Document>(store: &dyn DocumentStore, item: &T) -> StoreResult<()> {
    store
        .insert(T::COLLECTION, item.id(), serde_json::to_value(item)?)
        .await
}

pub async fn overwrite<T: Document>(store: &dyn DocumentStore, item: &T) -> StoreResult<bool> {
    store
        .replace(T::COLLECTION, item.id(), serde_json::to_value(item)?)
        .await
}

pub async fn delete_item<T: Document>(store: &dyn DocumentStore, id: &str) -> StoreResult<bool> {
    store.remove(T::COLLECTION, id).await
}
