//! Data-access services
//!
//! Each service is a module boundary: whatever the repository reports is
//! logged and folded into an [`Envelope`]; no error crosses it.

pub mod analytics;
pub mod library;
pub mod profiles;

use crate::{
    error::{AppError, AppResult},
    models::Envelope,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    repository: Repository,
    pub profiles: profiles::ProfilesService,
    pub library: library::LibraryService,
    pub analytics: analytics::AnalyticsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            profiles: profiles::ProfilesService::new(repository.clone()),
            library: library::LibraryService::new(repository.clone()),
            analytics: analytics::AnalyticsService::new(repository.clone()),
            repository,
        }
    }

    /// Check the document store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.store.ping().await
    }
}

/// Log a failed operation and turn it into a failure envelope
fn failure<T>(context: &str, error: AppError) -> Envelope<T> {
    tracing::error!(error = %error, "{}", context);
    Envelope::from(error)
}
