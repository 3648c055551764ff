//! Server configuration from environment variables.
//!
//! 値が不正なら起動時に ConfigError で落とす（黙ってデフォルトに戻さない）。

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use nexa_core::app::workflow::DEFAULT_ANALYSIS_DELAY;
use nexa_core::impls::DEFAULT_ACTIVITY_CAPACITY;

pub const ENV_BIND: &str = "NEXA_BIND";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_MEMORY_FALLBACK: &str = "NEXA_MEMORY_FALLBACK";
pub const ENV_ANALYSIS_DELAY_MS: &str = "NEXA_ANALYSIS_DELAY_MS";
pub const ENV_ACTIVITY_CAPACITY: &str = "NEXA_ACTIVITY_CAPACITY";
pub const ENV_LOG_JSON: &str = "NEXA_LOG_JSON";

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unsupported DATABASE_URL scheme in {0:?} (expected sqlite)")]
    UnsupportedDatabaseUrl(String),
}

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database: Option<SqliteLocation>,
    pub memory_fallback: bool,
    pub analysis_delay: Duration,
    pub activity_capacity: usize,
    pub log_json: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name → value lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| invalid(ENV_BIND, &bind_raw, "socket address"))?;

        let database = match lookup(ENV_DATABASE_URL) {
            Some(raw) if !raw.trim().is_empty() => Some(parse_database_url(raw.trim())?),
            _ => None,
        };

        Ok(Self {
            bind,
            database,
            memory_fallback: env_bool(&lookup, ENV_MEMORY_FALLBACK, false)?,
            analysis_delay: env_u64(&lookup, ENV_ANALYSIS_DELAY_MS)?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_ANALYSIS_DELAY),
            activity_capacity: env_u64(&lookup, ENV_ACTIVITY_CAPACITY)?
                .map(|v| v as usize)
                .unwrap_or(DEFAULT_ACTIVITY_CAPACITY),
            log_json: env_bool(&lookup, ENV_LOG_JSON, false)?,
        })
    }
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        expected,
    }
}

fn env_bool<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
            "0" | "false" | "FALSE" | "no" | "NO" | "" => Ok(false),
            _ => Err(invalid(name, &v, "boolean")),
        },
    }
}

fn env_u64<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid(name, &v, "non-negative integer")),
    }
}

/// `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>` or a bare path.
pub fn parse_database_url(raw: &str) -> Result<SqliteLocation, ConfigError> {
    if matches!(raw, "sqlite::memory:" | "sqlite://:memory:" | ":memory:") {
        return Ok(SqliteLocation::Memory);
    }
    if let Some(path) = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
    {
        if path.is_empty() {
            return Err(invalid(ENV_DATABASE_URL, raw, "sqlite location"));
        }
        return Ok(SqliteLocation::File(PathBuf::from(path)));
    }
    if raw.contains("://") {
        return Err(ConfigError::UnsupportedDatabaseUrl(raw.to_string()));
    }
    Ok(SqliteLocation::File(PathBuf::from(raw)))
}
