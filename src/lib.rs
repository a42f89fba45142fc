//! Bookshelf Library Server
//!
//! User profiles, book circulation and activity analytics on top of a
//! document store, exposed as a REST JSON API, plus the route guard that
//! gates the client pages.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod guard;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub guard: Arc<guard::RouteGuard>,
}

impl AppState {
    /// Wire repository, services and route guard onto an open connection
    pub fn new(config: AppConfig, connection: connection::Connection) -> Self {
        let repository = repository::Repository::new(&connection);
        let guard = guard::RouteGuard::new(
            guard::ROUTES,
            config.guard.login_path.clone(),
            connection.sessions.clone(),
        );

        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            guard: Arc::new(guard),
        }
    }
}
