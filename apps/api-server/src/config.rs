//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use blog_infra::database::DatabaseConfig;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/blog_api";
pub const DEFAULT_TEST_DATABASE_URL: &str = "postgres://localhost/test_blog_api";
pub const DEFAULT_PORT: u16 = 8080;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Database used by the integration test harness.
    pub test_database_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for anything missing or unparsable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS").unwrap_or(10),
            min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS").unwrap_or(1),
            connect_timeout: parse_var(&lookup, "DB_CONNECT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(10)),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&lookup, "PORT").unwrap_or(DEFAULT_PORT),
            database,
            test_database_url: lookup("TEST_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_TEST_DATABASE_URL.to_string()),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.parse().ok())
}
