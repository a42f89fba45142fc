//! Connection provider
//!
//! Opens the document store and the session checker once at startup. The
//! resulting [`Connection`] is handed to the repository and the route guard;
//! nothing reads it from a global.

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    guard::{session_check, SessionCheck},
    store::{DocumentStore, MemoryStore, PgStore},
};

#[derive(Clone)]
pub struct Connection {
    pub store: Arc<dyn DocumentStore>,
    pub sessions: Arc<dyn SessionCheck>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}

impl Connection {
    pub fn new(store: Arc<dyn DocumentStore>, sessions: Arc<dyn SessionCheck>) -> Self {
        Self { store, sessions }
    }

    /// Open the backends named by configuration. No retry on failure.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let url = config.database.url.as_str();
        let store: Arc<dyn DocumentStore> = if url.starts_with("memory://") {
            tracing::warn!("Using the in-memory document store; data is lost on restart");
            Arc::new(MemoryStore::new())
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Arc::new(PgStore::connect(&config.database).await?)
        } else {
            return Err(AppError::Configuration(format!(
                "Unsupported document store url: {}",
                url
            )));
        };

        Ok(Self::new(store, session_check(&config.guard)))
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    #[tokio::test]
    async fn test_open_memory_store() {
        let connection = Connection::open(&AppConfig::default()).await.unwrap();
        assert_ok!(connection.store.ping().await);
    }

    #[tokio::test]
    async fn test_open_rejects_unknown_scheme() {
        let mut config = AppConfig::default();
        config.database.url = "mongodb://localhost".to_string();
        let err = assert_err!(Connection::open(&config).await);
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
