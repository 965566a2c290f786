use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_API_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8000;

/// Pool sizing. Kept small: every request is one or two short SELECTs.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Search terms shorter than this are rejected before querying.
pub const MIN_SEARCH_LEN: usize = 2;

/// closing-soon always returns at most this many events.
pub const CLOSING_SOON_MAX_ROWS: i64 = 200;

/// Inclusive `(min, max, default)` bounds for each endpoint's parameters.
pub mod limits {
    pub type Bounds = (i64, i64, i64);

    pub const TOP_MARKETS: Bounds = (1, 100, 10);
    pub const SEARCH_MARKETS: Bounds = (1, 200, 50);
    pub const EVENT_MARKETS: Bounds = (1, 500, 200);
    pub const SEARCH_TAGS: Bounds = (1, 200, 50);
    /// Hours ahead for closing-soon (one week max).
    pub const CLOSING_SOON_HOURS: Bounds = (1, 168, 48);
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub log_level: String,
    /// Pool size (DB_MAX_CONNECTIONS)
    pub db_max_connections: u32,
    /// How long a request waits for a pooled connection (DB_ACQUIRE_TIMEOUT_SECS)
    pub db_acquire_timeout: Duration,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    /// `DATABASE_URL` is the only required variable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = get("DATABASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::Config("DATABASE_URL is not set (add it to the environment or .env)".to_string())
            })?;

        let api_port = match get("API_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            None => DEFAULT_API_PORT,
        };

        Ok(Self {
            database_url,
            api_host: get("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            api_port,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            db_acquire_timeout: Duration::from_secs(
                get("DB_ACQUIRE_TIMEOUT_SECS")
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS),
            ),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_database_url_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/nba")])).unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/nba");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(cfg.db_acquire_timeout, Duration::from_secs(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/nba"),
            ("API_PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn bad_pool_settings_fall_back() {
        let cfg = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/nba"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(cfg.db_acquire_timeout.as_secs(), DEFAULT_DB_ACQUIRE_TIMEOUT_SECS);
    }
}
