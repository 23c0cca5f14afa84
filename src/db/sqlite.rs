use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;

use super::{Collection, DocumentStore, Query, StoreError, StoreResult};

/// Documents as JSON text in one table, keyed by (collection, id).
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(db_pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )",
        )
        .execute(&db_pool)
        .await?;

        Ok(SqliteStore { db_pool })
    }
}

fn parse(row: Option<(String,)>) -> StoreResult<Option<Value>> {
    match row {
        Some((body,)) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query_as("SELECT body FROM documents WHERE collection=? AND id=?")
            .bind(collection.name())
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        parse(row)
    }

    async fn find(&self, collection: Collection, query: &Query) -> StoreResult<Option<Value>> {
        if query.clauses().is_empty() {
            return Ok(None);
        }

        let clauses = vec!["json_extract(body, ?) = ?"; query.clauses().len()].join(" OR ");
        let sql = format!("SELECT body FROM documents WHERE collection=? AND ({clauses}) LIMIT 1");

        let mut select = sqlx::query_as(&sql).bind(collection.name());
        for (field, value) in query.clauses() {
            select = select.bind(format!("$.{field}")).bind(value.as_str());
        }
        let row = select.fetch_optional(&self.db_pool).await?;
        parse(row)
    }

    async fn insert(&self, collection: Collection, id: &str, doc: Value) -> StoreResult<()> {
        let result = sqlx::query("INSERT INTO documents (collection,id,body) VALUES (?,?,?)")
            .bind(collection.name())
            .bind(id)
            .bind(doc.to_string())
            .execute(&self.db_pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::Conflict(format!("{collection} {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE documents SET body=? WHERE collection=? AND id=?")
            .bind(doc.to_string())
            .bind(collection.name())
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection=? AND id=?")
            .bind(collection.name())
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
