//! In-process document store
//!
//! Collections keep insertion order, which is the "store order" seen by
//! unordered queries (and therefore by first-match lookups).

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{compare_values, missing_document, Direction, Document, DocumentStore, Fields, Query};
use crate::error::AppResult;

type Collection = IndexMap<String, Fields>;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(fields: &Fields, query: &Query) -> bool {
    query
        .filters
        .iter()
        .all(|(field, expected)| fields.get(field) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, fields: Fields) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| missing_document(collection, id))?;
        existing.extend(fields);
        Ok(())
    }

    async fn query(&self, query: &Query) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<Document> = docs
            .iter()
            .filter(|(_, fields)| matches(fields, query))
            .map(|(id, fields)| Document::new(id.as_str(), fields.clone()))
            .collect();

        if let Some((field, direction)) = &query.order_by {
            found.retain(|doc| doc.get(field).is_some());
            // Stable sort, so equal keys stay in insertion order
            found.sort_by(|a, b| {
                let ordering = compare_values(&a.fields[field], &b.fields[field]);
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            found.truncate(limit);
        }

        Ok(found)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
