//! User profile service

use crate::{
    models::{Envelope, UserProfile},
    repository::Repository,
    store::Fields,
};

use super::failure;

#[derive(Clone)]
pub struct ProfilesService {
    repository: Repository,
}

impl ProfilesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a profile for `user_id`; the envelope carries the new id
    pub async fn create_profile(&self, user_id: &str, fields: Fields) -> Envelope {
        match self.repository.profiles.create(user_id, fields).await {
            Ok(id) => {
                tracing::info!(id = %id, "User profile created");
                Envelope::created(id)
            }
            Err(e) => failure("Error adding user profile", e),
        }
    }

    /// Get the first profile of `user_id`. A missing profile is a failure.
    pub async fn get_profile(&self, user_id: &str) -> Envelope<UserProfile> {
        match self.repository.profiles.get_by_user_id(user_id).await {
            Ok(profile) => Envelope::ok(profile),
            Err(e) => failure("Error getting user profile", e),
        }
    }

    /// Merge fields into a profile
    pub async fn update_profile(&self, profile_id: &str, fields: Fields) -> Envelope {
        match self.repository.profiles.update(profile_id, fields).await {
            Ok(()) => {
                tracing::info!(id = %profile_id, "User profile updated successfully");
                Envelope::done()
            }
            Err(e) => failure("Error updating user profile", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        error::AppError,
        services::test_support::{memory_repository, repository_on},
        store::MockDocumentStore,
    };

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_profile() {
        let service = ProfilesService::new(memory_repository());

        let created = service
            .create_profile("u1", fields(json!({"displayName": "Ada", "role": "member"})))
            .await;
        assert!(created.is_success());
        let id = created.id().unwrap().to_string();
        assert!(!id.is_empty());

        let found = service.get_profile("u1").await;
        let profile = found.into_data().unwrap();
        assert_eq!(profile.id, id);
        assert_eq!(profile.user_id, "u1");
        assert_eq!(profile.fields["displayName"], json!("Ada"));
        assert_eq!(profile.created_at, profile.updated_at);
    }

    #[tokio::test]
    async fn test_missing_profile_is_failure() {
        let service = ProfilesService::new(memory_repository());
        let found = service.get_profile("nobody").await;
        assert!(!found.is_success());
        assert!(found.data().is_none());
        assert_eq!(found.error(), Some("User profile not found"));
    }

    #[tokio::test]
    async fn test_duplicate_user_id_returns_first_created() {
        let service = ProfilesService::new(memory_repository());
        let first = service
            .create_profile("u1", fields(json!({"displayName": "first"})))
            .await;
        service
            .create_profile("u1", fields(json!({"displayName": "second"})))
            .await;

        let profile = service.get_profile("u1").await.into_data().unwrap();
        assert_eq!(Some(profile.id.as_str()), first.id());
        assert_eq!(profile.fields["displayName"], json!("first"));
    }

    #[tokio::test]
    async fn test_reserved_keys_are_ignored() {
        let service = ProfilesService::new(memory_repository());
        service
            .create_profile(
                "u1",
                fields(json!({"userId": "intruder", "createdAt": "garbage", "city": "Lyon"})),
            )
            .await;

        let profile = service.get_profile("u1").await.into_data().unwrap();
        assert_eq!(profile.user_id, "u1");
        assert_eq!(profile.fields["city"], json!("Lyon"));
        assert!(service.get_profile("intruder").await.error().is_some());
    }

    #[tokio::test]
    async fn test_update_merges_and_moves_updated_at_forward() {
        let service = ProfilesService::new(memory_repository());
        let id = service
            .create_profile("u1", fields(json!({"city": "Lyon", "age": 30})))
            .await
            .id()
            .unwrap()
            .to_string();
        let before = service.get_profile("u1").await.into_data().unwrap();

        let updated = service.update_profile(&id, fields(json!({"city": "Nantes"}))).await;
        assert!(updated.is_success());

        let after = service.get_profile("u1").await.into_data().unwrap();
        assert_eq!(after.fields["city"], json!("Nantes"));
        assert_eq!(after.fields["age"], json!(30));
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_update_of_missing_profile_is_failure() {
        let service = ProfilesService::new(memory_repository());
        let updated = service.update_profile("missing", fields(json!({"city": "Nantes"}))).await;
        assert_eq!(updated.error(), Some("No document to update: userProfiles/missing"));
    }

    #[tokio::test]
    async fn test_store_errors_become_failure_envelopes() {
        let mut store = MockDocumentStore::new();
        store
            .expect_add()
            .returning(|_, _| Err(AppError::Store("deadline exceeded".to_string())));
        store
            .expect_query()
            .returning(|_| Err(AppError::Store("unavailable".to_string())));
        let service = ProfilesService::new(repository_on(Arc::new(store)));

        let created = service.create_profile("u1", Fields::new()).await;
        assert_eq!(created.error(), Some("deadline exceeded"));

        let found = service.get_profile("u1").await;
        assert_eq!(found.error(), Some("unavailable"));
    }
}
