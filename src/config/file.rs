//! Orchestrator tunables loaded from TOML.
//!
//! Resolution order:
//! 1. Explicit path (if provided)
//! 2. `~/.lst-advisor/config.toml` (user)
//! 3. `/etc/lst-advisor/config.toml` (system)
//! 4. Built-in defaults
//!
//! Connection credentials are never read from this file; they come from the
//! environment (see [`super::connection`]).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::orchestrator::RetryConfig;
use crate::{AdvisorError, Result};

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub request: RequestSettings,
    #[serde(default)]
    pub context: ContextSettings,
}

/// `[retry]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Fractional jitter, e.g. 0.2 for ±20%.
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    4_000
}

fn default_jitter() -> f64 {
    0.2
}

/// `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_max_entries() -> u64 {
    256
}

fn default_ttl_secs() -> u64 {
    30 * 60
}

/// `[request]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestSettings {
    /// Wall-clock budget for one `answer()` call across all attempts.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-attempt HTTP timeout.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_http_timeout_secs() -> u64 {
    60
}

/// `[context]` section: framing text for prompts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextSettings {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
}

impl Settings {
    /// Load settings from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first existing standard
    /// file wins, and defaults are used when none exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Settings::default()),
        }
    }

    /// Parse settings from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AdvisorError::Settings(format!("Failed to read settings file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            AdvisorError::Settings(format!("Failed to parse settings file {path:?}: {e}"))
        })
    }

    fn resolve_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(AdvisorError::Settings(format!(
                "Settings file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user = home.join(".lst-advisor").join("config.toml");
            if user.exists() {
                return Ok(Some(user));
            }
        }

        let system = PathBuf::from("/etc/lst-advisor/config.toml");
        if system.exists() {
            return Ok(Some(system));
        }

        Ok(None)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.retry.max_attempts)
            .initial_delay(Duration::from_millis(self.retry.initial_delay_ms))
            .max_delay(Duration::from_millis(self.retry.max_delay_ms))
            .jitter(self.retry.jitter)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .max_entries(self.cache.max_entries)
            .ttl(Duration::from_secs(self.cache.ttl_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request.timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.request.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.retry.initial_delay_ms, 500);
        assert_eq!(settings.retry.max_delay_ms, 4_000);
        assert_eq!(settings.cache.max_entries, 256);
        assert_eq!(settings.cache.ttl_secs, 1_800);
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn parse_partial_file_keeps_defaults() {
        let toml = r#"
            [retry]
            max_attempts = 5

            [context]
            location = "Westlands, Nairobi"
        "#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.retry.initial_delay_ms, 500);
        assert_eq!(settings.cache.max_entries, 256);
        assert_eq!(
            settings.context.location.as_deref(),
            Some("Westlands, Nairobi")
        );
        assert!(settings.context.data_type.is_none());
    }

    #[test]
    fn retry_config_conversion() {
        let toml = r#"
            [retry]
            initial_delay_ms = 100
            max_delay_ms = 800
            jitter = 0.0
        "#;
        let settings: Settings = toml::from_str(toml).unwrap();
        let retry = settings.retry_config();
        assert_eq!(retry.initial_delay, Duration::from_millis(100));
        assert_eq!(retry.max_delay, Duration::from_millis(800));
        assert_eq!(retry.jitter, 0.0);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/lst.toml")))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Settings file not found"));
    }
}
