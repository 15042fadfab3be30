// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr, str::FromStr};

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// 10 MiB, same ceiling the upload form advertises.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Runtime configuration, read once at startup from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub seed_sample_data: bool,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            seed_sample_data: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok(); // .env is optional

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = parse_var("BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let seed_sample_data = parse_bool("SEED_SAMPLE_DATA", true)?;
        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AppError::ConfigError(format!("MAX_UPLOAD_BYTES is invalid ('{}'): {}", raw, e))
            })?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        tracing::debug!(
            "Configuration loaded: db={}, bind={}, seed={}, max_upload={}",
            database_url,
            bind_addr,
            seed_sample_data,
            max_upload_bytes
        );

        Ok(AppConfig {
            database_url,
            bind_addr,
            seed_sample_data,
            max_upload_bytes,
        })
    }

    /// In-memory SQLite only lives as long as its connection.
    pub fn is_in_memory(&self) -> bool {
        is_memory_url(&self.database_url)
    }
}

pub fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn parse_var<T>(name: &str, default: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::ConfigError(format!("{} is invalid ('{}'): {}", name, raw, e)))
}

fn parse_bool(name: &str, default: bool) -> AppResult<bool> {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw)
            .ok_or_else(|| AppError::ConfigError(format!("{} is invalid ('{}')", name, raw))),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("nope"), None);
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://planner?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://planner.db"));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert!(config.is_in_memory());
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.seed_sample_data);
    }
}
