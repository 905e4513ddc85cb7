use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use incidentdesk_db::PoolConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the database URL and identity credentials has a default
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Connection pool sizing.
    pub db: PoolConfig,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Identity provider endpoint and credentials.
    pub identity: IdentityConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default   |
    /// |---------------------------|-----------|
    /// | `HOST`                    | `0.0.0.0` |
    /// | `PORT`                    | `5000`    |
    /// | `DATABASE_URL`            | required  |
    /// | `DB_MAX_CONNECTIONS`      | `20`      |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`       |
    /// | `CORS_ORIGINS`            | `*`       |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`      |
    ///
    /// Panics on missing required variables or unparseable values; this only
    /// runs at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 5000);
        let database_url = required("DATABASE_URL");

        let db = PoolConfig {
            max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            acquire_timeout: Duration::from_secs(env_or("DB_ACQUIRE_TIMEOUT_SECS", 5)),
        };

        let cors_origins = parse_origins(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);

        Self {
            host,
            port,
            database_url,
            db,
            cors_origins,
            request_timeout_secs,
            identity: IdentityConfig::from_env(),
        }
    }

    /// Whether CORS should accept requests from any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Connection settings for the hosted identity provider.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent in the `apikey` header.
    pub anon_key: String,
    /// Per-request timeout for provider calls.
    pub timeout: Duration,
}

impl IdentityConfig {
    /// | Env Var                 | Default  |
    /// |-------------------------|----------|
    /// | `IDENTITY_URL`          | required |
    /// | `IDENTITY_ANON_KEY`     | required |
    /// | `IDENTITY_TIMEOUT_SECS` | `10`     |
    pub fn from_env() -> Self {
        Self {
            url: required("IDENTITY_URL"),
            anon_key: required("IDENTITY_ANON_KEY"),
            timeout: Duration::from_secs(env_or("IDENTITY_TIMEOUT_SECS", 10)),
        }
    }
}

// The key is a credential; keep it out of startup logs.
impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` (`pretty` or `json`, default `pretty`).
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Split a comma-separated origin list, dropping empty entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn required(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
