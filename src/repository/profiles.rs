//! User profiles repository

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::without_reserved;
use crate::{
    error::{AppError, AppResult},
    models::profile::{UserProfile, PROFILE_RESERVED},
    store::{timestamp, DocumentStore, Fields, Query, USER_PROFILES},
};

#[derive(Clone)]
pub struct ProfilesRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProfilesRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insert a profile stamped with creation/update times
    pub async fn create(&self, user_id: &str, fields: Fields) -> AppResult<String> {
        let now = timestamp(Utc::now());
        let mut doc = Fields::new();
        doc.insert("userId".to_string(), Value::String(user_id.to_string()));
        doc.extend(without_reserved(fields, PROFILE_RESERVED));
        doc.insert("createdAt".to_string(), now.clone());
        doc.insert("updatedAt".to_string(), now);

        self.store.add(USER_PROFILES, doc).await
    }

    /// First profile for `user_id` in store order.
    ///
    /// Nothing keeps `userId` unique, so several documents may match.
    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<UserProfile> {
        let query = Query::collection(USER_PROFILES).where_eq("userId", user_id);
        let matches = self.store.query(&query).await?;

        if matches.len() > 1 {
            tracing::warn!(
                user_id = %user_id,
                count = matches.len(),
                "Several profiles share this user id; returning the first"
            );
        }

        matches
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?
            .decode()
    }

    /// Merge fields into a profile and re-stamp `updatedAt`.
    /// Neither existence nor ownership is checked beforehand.
    pub async fn update(&self, profile_id: &str, fields: Fields) -> AppResult<()> {
        let mut changes = without_reserved(fields, PROFILE_RESERVED);
        changes.insert("updatedAt".to_string(), timestamp(Utc::now()));

        self.store.update(USER_PROFILES, profile_id, changes).await
    }

    pub async fn count(&self) -> AppResult<usize> {
        Ok(self.store.query(&Query::collection(USER_PROFILES)).await?.len())
    }
}
