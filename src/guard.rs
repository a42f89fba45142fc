//! Route guard for client page navigation
//!
//! Each navigation either proceeds or is redirected to the login page with
//! the original target in a `redirect` query parameter so the client can
//! resume after signing in. Whether the client is signed in is read from
//! client-persisted state (a cookie), never from the server's own records.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::{GuardConfig, GuardMode},
    AppState,
};

/// A client route and its access requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

const fn route(path: &'static str, name: &'static str, requires_auth: bool) -> RouteDef {
    RouteDef { path, name, requires_auth }
}

/// Client routes of the library application
pub const ROUTES: &[RouteDef] = &[
    route("/", "Home", false),
    route("/about", "About", true),
    route("/login", "Login", false),
    route("/FireLogin", "FireLogin", false),
    route("/FireRegister", "FireRegister", false),
    route("/addbook", "AddBook", true),
    route("/query", "Query", true),
    route("/manage-books", "ManageBooks", true),
    route("/WeatherCheck", "WeatherCheck", false),
    route("/CountBookAPI", "CountBookAPI", false),
    route("/GetAllBookAPI", "GetAllBookAPI", false),
];

/// Outcome of a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allowed,
    Redirected {
        /// Login path carrying the original target
        location: String,
    },
}

/// Client-persisted key/value state
pub trait ClientStorage {
    fn get_item(&self, key: &str) -> Option<String>;
}

impl ClientStorage for CookieJar {
    fn get_item(&self, key: &str) -> Option<String> {
        self.get(key).map(|cookie| cookie.value().to_string())
    }
}

/// Decides from client state whether the client counts as signed in
pub trait SessionCheck: Send + Sync {
    fn is_authenticated(&self, storage: &dyn ClientStorage) -> bool;
}

/// Signed in when the stored value is the literal `"true"`.
///
/// The value is unsigned and has no expiry; any client can set it.
pub struct FlagSession {
    key: String,
}

impl FlagSession {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SessionCheck for FlagSession {
    fn is_authenticated(&self, storage: &dyn ClientStorage) -> bool {
        storage.get_item(&self.key).as_deref() == Some("true")
    }
}

/// Claims of a signed session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(sub: impl Into<String>, valid_for: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            exp: (now + valid_for).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(&Header::default(), self, &EncodingKey::from_secret(secret.as_bytes()))
    }

    /// Parse and verify a JWT token (signature and expiry)
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Signed in when the stored value is a valid, unexpired session token
pub struct TokenSession {
    key: String,
    secret: String,
}

impl TokenSession {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { key: key.into(), secret: secret.into() }
    }
}

impl SessionCheck for TokenSession {
    fn is_authenticated(&self, storage: &dyn ClientStorage) -> bool {
        let Some(token) = storage.get_item(&self.key) else {
            return false;
        };
        match SessionClaims::from_token(&token, &self.secret) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                false
            }
        }
    }
}

/// Session check selected by configuration
pub fn session_check(config: &GuardConfig) -> Arc<dyn SessionCheck> {
    match config.mode {
        GuardMode::Flag => Arc::new(FlagSession::new(config.flag_key.clone())),
        GuardMode::Token => Arc::new(TokenSession::new(
            config.flag_key.clone(),
            config.session_secret.clone(),
        )),
    }
}

pub struct RouteGuard {
    routes: &'static [RouteDef],
    login_path: String,
    sessions: Arc<dyn SessionCheck>,
}

impl RouteGuard {
    pub fn new(
        routes: &'static [RouteDef],
        login_path: impl Into<String>,
        sessions: Arc<dyn SessionCheck>,
    ) -> Self {
        Self { routes, login_path: login_path.into(), sessions }
    }

    /// Decide a navigation to `target` (a path with optional query/fragment)
    pub fn check(&self, target: &str, storage: &dyn ClientStorage) -> Navigation {
        if !self.requires_auth(target) || self.sessions.is_authenticated(storage) {
            return Navigation::Allowed;
        }

        Navigation::Redirected {
            location: login_location(&self.login_path, target),
        }
    }

    /// Whether any route matching the target's path requires auth
    pub fn requires_auth(&self, target: &str) -> bool {
        let path = path_of(target);
        self.routes
            .iter()
            .filter(|r| same_path(r.path, path))
            .any(|r| r.requires_auth)
    }
}

fn path_of(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

/// Case-insensitive, trailing slash optional
fn same_path(declared: &str, requested: &str) -> bool {
    let declared = declared.trim_end_matches('/');
    let requested = requested.trim_end_matches('/');
    declared.eq_ignore_ascii_case(requested)
}

fn login_location(login_path: &str, target: &str) -> String {
    let encoded = urlencoding::encode(target).replace("%2F", "/");
    format!("{}?redirect={}", login_path, encoded)
}

/// Middleware guarding the client page routes
pub async fn navigation_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let navigation = state.guard.check(&target, &jar);
    match navigation {
        Navigation::Allowed => next.run(request).await,
        Navigation::Redirected { location } => {
            tracing::info!(path = %target, "Navigation redirected to login");
            Redirect::temporary(&location).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct LocalStorage(HashMap<String, String>);

    impl LocalStorage {
        fn with(key: &str, value: &str) -> Self {
            Self(HashMap::from([(key.to_string(), value.to_string())]))
        }
    }

    impl ClientStorage for LocalStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    fn flag_guard() -> RouteGuard {
        RouteGuard::new(ROUTES, "/login", Arc::new(FlagSession::new("library_auth")))
    }

    #[test]
    fn test_guarded_route_without_flag_redirects_to_login() {
        let guard = flag_guard();
        assert_eq!(
            guard.check("/about", &LocalStorage::default()),
            Navigation::Redirected { location: "/login?redirect=/about".to_string() }
        );
    }

    #[test]
    fn test_guarded_route_with_flag_is_allowed() {
        let guard = flag_guard();
        let storage = LocalStorage::with("library_auth", "true");
        assert_eq!(guard.check("/manage-books", &storage), Navigation::Allowed);
    }

    #[test]
    fn test_flag_must_be_literal_true() {
        let guard = flag_guard();
        for value in ["false", "TRUE", "1", ""] {
            let storage = LocalStorage::with("library_auth", value);
            assert!(matches!(
                guard.check("/addbook", &storage),
                Navigation::Redirected { .. }
            ));
        }
    }

    #[test]
    fn test_open_routes_always_allowed() {
        let guard = flag_guard();
        let signed_out = LocalStorage::default();
        let signed_in = LocalStorage::with("library_auth", "true");
        for path in ["/", "/login", "/WeatherCheck", "/GetAllBookAPI", "/not-declared"] {
            assert_eq!(guard.check(path, &signed_out), Navigation::Allowed);
            assert_eq!(guard.check(path, &signed_in), Navigation::Allowed);
        }
    }

    #[test]
    fn test_matching_ignores_case_trailing_slash_and_query() {
        let guard = flag_guard();
        assert!(guard.requires_auth("/About/"));
        assert!(guard.requires_auth("/query?title=dune#results"));
        assert!(!guard.requires_auth("/queries"));
    }

    #[test]
    fn test_redirect_keeps_full_target() {
        let guard = flag_guard();
        assert_eq!(
            guard.check("/query?title=a b&x=1", &LocalStorage::default()),
            Navigation::Redirected {
                location: "/login?redirect=/query%3Ftitle%3Da%20b%26x%3D1".to_string()
            }
        );
    }

    #[test]
    fn test_token_session_accepts_signed_tokens_only() {
        let sessions = TokenSession::new("library_auth", "secret");
        let guard = RouteGuard::new(ROUTES, "/login", Arc::new(sessions));

        let token = SessionClaims::new("u1", Duration::hours(1))
            .create_token("secret")
            .unwrap();
        assert_eq!(
            guard.check("/about", &LocalStorage::with("library_auth", &token)),
            Navigation::Allowed
        );

        let forged = SessionClaims::new("u1", Duration::hours(1))
            .create_token("other-secret")
            .unwrap();
        assert!(matches!(
            guard.check("/about", &LocalStorage::with("library_auth", &forged)),
            Navigation::Redirected { .. }
        ));
        assert!(matches!(
            guard.check("/about", &LocalStorage::with("library_auth", "true")),
            Navigation::Redirected { .. }
        ));
    }

    #[test]
    fn test_token_session_rejects_expired_tokens() {
        let sessions = TokenSession::new("library_auth", "secret");
        let expired = SessionClaims::new("u1", Duration::hours(-2))
            .create_token("secret")
            .unwrap();
        assert!(!sessions.is_authenticated(&LocalStorage::with("library_auth", &expired)));
    }
}
