//! Analytics service: library statistics and the activity log

use serde_json::Value;

use crate::{
    error::AppResult,
    models::{Activity, Envelope, LibraryStats, UtilizationRate},
    repository::Repository,
    store::Fields,
};

use super::failure;

/// Number of entries returned by [`AnalyticsService::recent_activities`]
pub const RECENT_ACTIVITIES: usize = 10;

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Repository,
}

/// Loose truthiness of a stored flag; a missing flag is false
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

impl AnalyticsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Recount the whole inventory and profile collection
    async fn compute_stats(&self) -> AppResult<LibraryStats> {
        let books = self.repository.books.all().await?;
        let total_users = self.repository.profiles.count().await?;

        let total_books = books.len();
        let available_books = books
            .iter()
            .filter(|book| is_truthy(book.get("available")))
            .count();
        let borrowed_books = total_books - available_books;

        Ok(LibraryStats {
            total_books,
            total_users,
            available_books,
            borrowed_books,
            utilization_rate: UtilizationRate::from_counts(borrowed_books, total_books),
        })
    }

    pub async fn library_stats(&self) -> Envelope<LibraryStats> {
        match self.compute_stats().await {
            Ok(stats) => Envelope::ok(stats),
            Err(e) => failure("Error getting library stats", e),
        }
    }

    /// The ten most recent activities, newest first
    pub async fn recent_activities(&self) -> Envelope<Vec<Activity>> {
        match self.repository.activities.recent(RECENT_ACTIVITIES).await {
            Ok(activities) => Envelope::ok(activities),
            Err(e) => failure("Error getting recent activities", e),
        }
    }

    /// Append an activity; the envelope carries the new id
    pub async fn log_activity(&self, fields: Fields) -> Envelope {
        match self.repository.activities.create(fields).await {
            Ok(id) => {
                tracing::info!(id = %id, "Activity logged");
                Envelope::created(id)
            }
            Err(e) => failure("Error logging activity", e),
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
        models::CreateBook,
        services::{
            library::LibraryService,
            profiles::ProfilesService,
            test_support::{memory_repository, repository_on},
        },
        store::{Document, MockDocumentStore, BOOKS, USER_PROFILES},
    };

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_stats_on_empty_store() {
        let service = AnalyticsService::new(memory_repository());
        let stats = service.library_stats().await;
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({
                "success": true,
                "data": {
                    "totalBooks": 0,
                    "totalUsers": 0,
                    "availableBooks": 0,
                    "borrowedBooks": 0,
                    "utilizationRate": 0
                }
            })
        );
    }

    #[tokio::test]
    async fn test_stats_count_books_and_users() {
        let repository = memory_repository();
        let library = LibraryService::new(repository.clone());
        let profiles = ProfilesService::new(repository.clone());
        let analytics = AnalyticsService::new(repository);

        let mut ids = Vec::new();
        for name in ["Dune", "Emma", "Ulysses", "Beloved"] {
            let created = library
                .add_book(CreateBook { name: name.to_string(), fields: Fields::new() })
                .await;
            ids.push(created.id().unwrap().to_string());
        }
        library.borrow_book(&ids[0], "u1").await;
        profiles.create_profile("u1", Fields::new()).await;
        profiles.create_profile("u2", Fields::new()).await;
        profiles.create_profile("u2", Fields::new()).await;

        let stats = analytics.library_stats().await.into_data().unwrap();
        assert_eq!(stats.total_books, 4);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.available_books, 3);
        assert_eq!(stats.borrowed_books, 1);
        assert_eq!(stats.utilization_rate, UtilizationRate::Percent("25.00".to_string()));
    }

    #[tokio::test]
    async fn test_book_without_available_flag_counts_as_borrowed() {
        let mut store = MockDocumentStore::new();
        store.expect_query().returning(|query| {
            if query.collection == BOOKS {
                Ok(vec![
                    Document::new("b1", fields(json!({"name": "Dune", "available": true}))),
                    Document::new("b2", fields(json!({"name": "Emma"}))),
                ])
            } else {
                assert_eq!(query.collection, USER_PROFILES);
                Ok(Vec::new())
            }
        });
        let service = AnalyticsService::new(repository_on(Arc::new(store)));

        let stats = service.library_stats().await.into_data().unwrap();
        assert_eq!(stats.available_books, 1);
        assert_eq!(stats.borrowed_books, 1);
        assert_eq!(stats.utilization_rate, UtilizationRate::Percent("50.00".to_string()));
    }

    #[tokio::test]
    async fn test_recent_activities_returns_latest_ten_newest_first() {
        let service = AnalyticsService::new(memory_repository());
        for n in 0..15 {
            let logged = service.log_activity(fields(json!({"action": "visit", "n": n}))).await;
            assert!(logged.id().is_some());
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let activities = service.recent_activities().await.into_data().unwrap();
        assert_eq!(activities.len(), RECENT_ACTIVITIES);
        assert!(activities
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp));
        let numbers: Vec<_> = activities.iter().map(|a| a.fields["n"].clone()).collect();
        assert_eq!(numbers.first(), Some(&json!(14)));
        assert_eq!(numbers.last(), Some(&json!(5)));
    }

    #[tokio::test]
    async fn test_logged_timestamp_is_server_side() {
        let service = AnalyticsService::new(memory_repository());
        service
            .log_activity(fields(json!({"action": "login", "timestamp": "1999-01-01T00:00:00Z"})))
            .await;

        let activities = service.recent_activities().await.into_data().unwrap();
        assert!(activities[0].timestamp.timestamp() > 946_684_800);
        assert_eq!(activities[0].fields["action"], json!("login"));
    }

    #[tokio::test]
    async fn test_store_errors_become_failure_envelopes() {
        let mut store = MockDocumentStore::new();
        store
            .expect_query()
            .returning(|_| Err(AppError::Store("quota exceeded".to_string())));
        let service = AnalyticsService::new(repository_on(Arc::new(store)));

        assert_eq!(service.library_stats().await.error(), Some("quota exceeded"));
        assert_eq!(service.recent_activities().await.error(), Some("quota exceeded"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!("yes"))));
    }
}
