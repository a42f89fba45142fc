//! Activity log repository

use std::sync::Arc;

use chrono::Utc;

use super::without_reserved;
use crate::{
    error::AppResult,
    models::activity::{Activity, ACTIVITY_RESERVED},
    store::{timestamp, Direction, Document, DocumentStore, Fields, Query, ACTIVITIES},
};

#[derive(Clone)]
pub struct ActivitiesRepository {
    store: Arc<dyn DocumentStore>,
}

impl ActivitiesRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append an activity with a server-side timestamp
    pub async fn create(&self, fields: Fields) -> AppResult<String> {
        let mut doc = without_reserved(fields, ACTIVITY_RESERVED);
        doc.insert("timestamp".to_string(), timestamp(Utc::now()));

        self.store.add(ACTIVITIES, doc).await
    }

    /// Latest `limit` activities, newest first
    pub async fn recent(&self, limit: usize) -> AppResult<Vec<Activity>> {
        let query = Query::collection(ACTIVITIES)
            .order_by("timestamp", Direction::Desc)
            .limit(limit);

        self.store
            .query(&query)
            .await?
            .into_iter()
            .map(Document::decode)
            .collect()
    }
}
