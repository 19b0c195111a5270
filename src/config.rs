//! Runtime configuration resolved once at startup

use crate::constants::{
    DEFAULT_PLAYLIST_URL, DEFAULT_PREPARE_TIMEOUT_SECS, DEFAULT_REFRESH_INTERVAL_MILLIS,
};
use std::time::Duration;

pub const ENV_PLAYLIST_URL: &str = "STREAMLIST_PLAYLIST_URL";
pub const ENV_REFRESH_MS: &str = "STREAMLIST_REFRESH_MS";
pub const ENV_PREPARE_TIMEOUT_SECS: &str = "STREAMLIST_PREPARE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub playlist_url: String,
    pub refresh_interval: Duration,
    pub prepare_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playlist_url: DEFAULT_PLAYLIST_URL.to_string(),
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MILLIS),
            prepare_timeout: Duration::from_secs(DEFAULT_PREPARE_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read overrides from the process environment
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("[Config] Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => log::debug!("[Config] No .env file found"),
            Err(e) => log::warn!("[Config] Failed to read .env file: {}", e),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or invalid values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_PLAYLIST_URL) {
            let url = url.trim();
            if url.is_empty() {
                log::warn!("[Config] {} is empty, keeping default", ENV_PLAYLIST_URL);
            } else {
                config.playlist_url = url.to_string();
            }
        }

        if let Some(ms) = parse_positive(&lookup, ENV_REFRESH_MS) {
            config.refresh_interval = Duration::from_millis(ms);
        }

        if let Some(secs) = parse_positive(&lookup, ENV_PREPARE_TIMEOUT_SECS) {
            config.prepare_timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn parse_positive<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            log::warn!("[Config] {} must be greater than zero, keeping default", key);
            None
        }
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("[Config] Invalid {}={:?} ({}), keeping default", key, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None);

        assert_eq!(AppConfig::default(), config);
        assert_eq!(DEFAULT_PLAYLIST_URL, config.playlist_url);
        assert_eq!(Duration::from_secs(1), config.refresh_interval);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_PLAYLIST_URL, "http://localhost:8080/list.xml"),
            (ENV_REFRESH_MS, "250"),
            (ENV_PREPARE_TIMEOUT_SECS, "3"),
        ]));

        assert_eq!("http://localhost:8080/list.xml", config.playlist_url);
        assert_eq!(Duration::from_millis(250), config.refresh_interval);
        assert_eq!(Duration::from_secs(3), config.prepare_timeout);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_PLAYLIST_URL, "   "),
            (ENV_REFRESH_MS, "fast"),
            (ENV_PREPARE_TIMEOUT_SECS, "0"),
        ]));

        assert_eq!(AppConfig::default(), config);
    }
}
