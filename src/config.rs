use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other:?}, expected compact or json")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub event_buffer_size: usize,
    pub store_timeout: Duration,
    pub cors_permissive: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let store_timeout_ms: u64 =
            non_zero("STORE_TIMEOUT_MS", parse_or_default("STORE_TIMEOUT_MS", 5_000)?)?;
        // A zero-capacity broadcast channel panics on construction.
        let event_buffer_size: usize =
            non_zero("EVENT_BUFFER_SIZE", parse_or_default("EVENT_BUFFER_SIZE", 1024)?)?;

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: parse_or_default("LOG_FORMAT", LogFormat::Compact)?,
            event_buffer_size,
            store_timeout: Duration::from_millis(store_timeout_ms),
            cors_permissive: parse_or_default("CORS_PERMISSIVE", false)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

fn non_zero<T>(key: &str, value: T) -> Result<T, AppError>
where
    T: Default + PartialEq,
{
    if value == T::default() {
        return Err(AppError::Internal(format!("invalid {key}: must be > 0")));
    }
    Ok(value)
}
