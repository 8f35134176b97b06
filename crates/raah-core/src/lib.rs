pub mod backend;
pub mod catalog;
pub mod config_file;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod model;
pub mod notify;
pub mod orchestrator;
pub mod result;
pub mod selection;

use std::time::Duration;

pub use backend::{BackendFuture, ScriptureBackend};
pub use catalog::CatalogCache;
pub use config_file::ConfigFile;
pub use error::{FetchError, Operation, ViewerError};
pub use http::HttpBackend;
pub use model::{
    Book, ChapterCount, CompareRequest, ComparisonPayload, Edition, HealthStatus, ParseError,
    VerseRow,
};
pub use notify::{Notification, NotificationSink};
pub use orchestrator::{Intent, Orchestrator, Preselection, Readiness, ViewerSnapshot};
pub use result::ComparisonResult;
pub use selection::{
    FALLBACK_CHAPTER_BOUND, MAX_EDITIONS, SelectionState, SelectionStore, Step, ToggleOutcome,
};

/// Where the comparison service listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for talking to the comparison service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Build from the config file and the `RAAH_API_BASE` / `RAAH_TIMEOUT`
    /// environment variables. Environment wins over the file.
    pub fn resolve(file: &ConfigFile) -> Self {
        Self::resolve_with(file, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let server = file.server.clone().unwrap_or_default();
        let defaults = Self::default();

        let base_url = env("RAAH_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .or(server.base_url)
            .unwrap_or(defaults.base_url);

        let env_timeout = env("RAAH_TIMEOUT").and_then(|v| match v.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(_) => {
                tracing::warn!(value = %v, "ignoring invalid RAAH_TIMEOUT");
                None
            }
        });
        let request_timeout = env_timeout
            .filter(|&secs| secs > 0)
            .or(server.timeout_secs.filter(|&secs| secs > 0))
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            base_url,
            request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::ServerConfig;

    fn file(base_url: Option<&str>, timeout_secs: Option<u64>) -> ConfigFile {
        ConfigFile {
            server: Some(ServerConfig {
                base_url: base_url.map(String::from),
                timeout_secs,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = Config::resolve_with(&ConfigFile::default(), |_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn file_values_are_used() {
        let config = Config::resolve_with(&file(Some("http://bible.local"), Some(5)), |_| None);
        assert_eq!(config.base_url, "http://bible.local");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn env_overrides_file() {
        let config = Config::resolve_with(&file(Some("http://bible.local"), Some(5)), |key| {
            match key {
                "RAAH_API_BASE" => Some("http://from-env:8080".into()),
                "RAAH_TIMEOUT" => Some("30".into()),
                _ => None,
            }
        });
        assert_eq!(config.base_url, "http://from-env:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_env_timeout_falls_back_to_file() {
        let config = Config::resolve_with(&file(None, Some(7)), |key| {
            (key == "RAAH_TIMEOUT").then(|| "soon".to_string())
        });
        assert_eq!(config.request_timeout, Duration::from_secs(7));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn zero_timeout_uses_default() {
        let config = Config::resolve_with(&file(None, Some(0)), |_| None);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn zero_env_timeout_falls_back_to_file() {
        let config = Config::resolve_with(&file(None, Some(7)), |key| {
            (key == "RAAH_TIMEOUT").then(|| "0".to_string())
        });
        assert_eq!(config.request_timeout, Duration::from_secs(7));
    }
}
