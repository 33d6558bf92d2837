//! Server configuration read from the environment at start-up.
//!
//! `.env` is loaded by `main` through `dotenvy` before this runs, so local
//! development can keep settings in a file.

use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_DAYS: u64 = 7;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const SECS_PER_DAY: u64 = 24 * 60 * 60;
/// Longest accepted session lifetime; keeps expiry arithmetic in range for
/// both `Instant` and PostgreSQL intervals.
const MAX_SESSION_TTL_DAYS: u64 = 36_500;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` runs the server against the in-memory account store.
    pub database_url: Option<String>,
    pub session_ttl: Duration,
    /// Accounts registered with this email are created as administrators.
    pub admin_email: Option<String>,
    pub db_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_DAYS * SECS_PER_DAY),
            admin_email: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl ServerConfig {
    /// Load from `PORT`, `DATABASE_URL`, `DB_MAX_CONNECTIONS`,
    /// `SESSION_TTL_DAYS`, `ADMIN_EMAIL`.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the session
    /// lifetime exceeds 36 500 days.
    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = parse_var(&get, "PORT")?.unwrap_or(defaults.port);
        let db_max_connections = parse_var(&get, "DB_MAX_CONNECTIONS")?.unwrap_or(defaults.db_max_connections);
        let session_ttl = match parse_var::<u64, _>(&get, "SESSION_TTL_DAYS")? {
            Some(days) if days <= MAX_SESSION_TTL_DAYS => Duration::from_secs(days * SECS_PER_DAY),
            Some(days) => return Err(ConfigError::Invalid { key: "SESSION_TTL_DAYS", value: days.to_string() }),
            None => defaults.session_ttl,
        };

        Ok(Self {
            port,
            database_url: non_empty(get("DATABASE_URL")),
            session_ttl,
            admin_email: non_empty(get("ADMIN_EMAIL")).map(|e| e.to_ascii_lowercase()),
            db_max_connections,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_var<T, F>(get: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_empty(get(key)) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
