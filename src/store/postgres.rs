//! Hosted document store on PostgreSQL
//!
//! Every collection lives in one `documents` table as JSONB, keyed by
//! `(collection, id)`. `seq` records insertion order.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{missing_document, Direction, Document, DocumentStore, Fields, Query};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

const CREATE_DOCUMENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        seq BIGSERIAL PRIMARY KEY,
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        data JSONB NOT NULL DEFAULT '{}'::jsonb,
        UNIQUE (collection, id)
    )
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    /// Connect and make sure the `documents` table exists
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        sqlx::query(CREATE_DOCUMENTS).execute(&pool).await?;

        Ok(Self { pool })
    }
}

fn into_fields(collection: &str, id: &str, data: Value) -> AppResult<Fields> {
    match data {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::Store(format!(
            "Document {}/{} is not an object: {}",
            collection, id, other
        ))),
    }
}

const TYPE_RANK: &str = ") WHEN 'null' THEN 0 WHEN 'boolean' THEN 1 WHEN 'number' THEN 2 \
     WHEN 'string' THEN 3 WHEN 'array' THEN 4 ELSE 5 END";

/// Build the SELECT for a query; all user-provided parts are bound
fn select_for(query: &Query) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
    builder.push_bind(query.collection.as_str());

    for (field, value) in &query.filters {
        builder
            .push(" AND data -> ")
            .push_bind(field.as_str())
            .push(" = ")
            .push_bind(value.clone());
    }

    match &query.order_by {
        Some((field, direction)) => {
            let direction = match direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            };
            let field = field.as_str();

            builder
                .push(" AND data -> ")
                .push_bind(field)
                .push(" IS NOT NULL");

            // Same order as `compare_values`: type rank first, strings by byte order
            builder
                .push(" ORDER BY CASE jsonb_typeof(data -> ")
                .push_bind(field)
                .push(TYPE_RANK)
                .push(direction);
            builder
                .push(", (CASE WHEN jsonb_typeof(data -> ")
                .push_bind(field)
                .push(") = 'string' THEN data ->> ")
                .push_bind(field)
                .push(" END) COLLATE \"C\"")
                .push(direction);
            builder
                .push(", data -> ")
                .push_bind(field)
                .push(direction)
                .push(", seq ASC");
        }
        None => {
            builder.push(" ORDER BY seq ASC");
        }
    }

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ").push_bind(limit as i64);
    }

    builder
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn add(&self, collection: &str, fields: Fields) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Value::Object(fields))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let data: Option<Value> = sqlx::query_scalar(
            "SELECT data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match data {
            Some(data) => Ok(Some(Document::new(id, into_fields(collection, id, data)?))),
            None => Ok(None),
        }
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(missing_document(collection, id));
        }
        Ok(())
    }

    async fn query(&self, query: &Query) -> AppResult<Vec<Document>> {
        let rows = select_for(query).build().fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| -> AppResult<Document> {
                let id: String = row.try_get("id")?;
                let data: Value = row.try_get("data")?;
                let fields = into_fields(&query.collection, &id, data)?;
                Ok(Document::new(id, fields))
            })
            .collect()
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_ordering_uses_insertion_order() {
        let query = Query::collection("userProfiles").where_eq("userId", "u1");
        assert_eq!(
            select_for(&query).sql(),
            "SELECT id, data FROM documents WHERE collection = $1 AND data -> $2 = $3 ORDER BY seq ASC"
        );
    }

    #[test]
    fn test_select_with_ordering_and_limit() {
        let query = Query::collection("activities")
            .order_by("timestamp", Direction::Desc)
            .limit(10);
        assert_eq!(
            select_for(&query).sql(),
            "SELECT id, data FROM documents WHERE collection = $1 \
             AND data -> $2 IS NOT NULL \
             ORDER BY CASE jsonb_typeof(data -> $3) WHEN 'null' THEN 0 WHEN 'boolean' THEN 1 \
             WHEN 'number' THEN 2 WHEN 'string' THEN 3 WHEN 'array' THEN 4 ELSE 5 END DESC, \
             (CASE WHEN jsonb_typeof(data -> $4) = 'string' THEN data ->> $5 END) COLLATE \"C\" DESC, \
             data -> $6 DESC, seq ASC LIMIT $7"
        );
    }

    #[test]
    fn test_select_orders_strings_by_byte_order() {
        let query = Query::collection("books")
            .where_eq("available", true)
            .order_by("name", Direction::Asc);
        let builder = select_for(&query);
        let sql = builder.sql();
        assert!(sql.contains("= 'string' THEN data ->> $7 END) COLLATE \"C\" ASC"));
        assert!(sql.ends_with(", data -> $8 ASC, seq ASC"));
    }
}
