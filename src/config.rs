//! Configuration management for Bookshelf server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the client pages (SPA build output)
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `memory://` for the in-process store, `postgres://...` for the hosted one
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// How the route guard decides a client is signed in
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuardMode {
    /// Persisted value must equal `"true"`. Unsigned, trivially forgeable.
    Flag,
    /// Persisted value must be a JWT signed with `session_secret`.
    Token,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GuardConfig {
    pub mode: GuardMode,
    /// Key (cookie name) of the client-persisted auth value
    pub flag_key: String,
    pub login_path: String,
    pub session_secret: String,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub guard: GuardConfig,
}

/// `BOOKSHELF_` prefix; `__` separates section from key so snake_case keys survive
fn environment() -> Environment {
    Environment::with_prefix("BOOKSHELF")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (e.g. BOOKSHELF_GUARD__SESSION_SECRET)
            .add_source(environment())
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("guard.session_secret", env::var("SESSION_SECRET").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "public".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "memory://".to_string(),
            max_connections: 10,
            min_connections: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            mode: GuardMode::Flag,
            flag_key: "library_auth".to_string(),
            login_path: "/login".to_string(),
            session_secret: "change-this-secret-in-production".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_flag_guard_and_memory_store() {
        let config = AppConfig::default();
        assert_eq!(config.guard.mode, GuardMode::Flag);
        assert_eq!(config.guard.flag_key, "library_auth");
        assert_eq!(config.guard.login_path, "/login");
        assert!(config.database.url.starts_with("memory://"));
    }

    #[test]
    fn test_environment_keeps_snake_case_keys() {
        let vars: config::Map<String, String> = [
            ("BOOKSHELF_GUARD__SESSION_SECRET", "from-env"),
            ("BOOKSHELF_SERVER__STATIC_DIR", "dist"),
            ("BOOKSHELF_SERVER__PORT", "9090"),
            ("BOOKSHELF_GUARD__MODE", "token"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let config: AppConfig = Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.guard.session_secret, "from-env");
        assert_eq!(config.guard.mode, GuardMode::Token);
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.guard.flag_key, "library_auth");
    }

    #[test]
    fn test_guard_mode_deserializes_snake_case() {
        let mode: GuardMode = serde_json::from_str("\"token\"").unwrap();
        assert_eq!(mode, GuardMode::Token);
    }
}
