//! Connection settings for the completion service.
//!
//! Settings arrive as environment-style key/value pairs and are validated
//! once into an immutable [`Configuration`]. Validation collects every
//! missing or malformed key instead of stopping at the first, so setup
//! guidance can name them all.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use reqwest::Url;

use crate::error::ConfigError;

/// Setting keys.
pub const ENDPOINT: &str = "ENDPOINT";
pub const API_KEY: &str = "API_KEY";
pub const API_VERSION: &str = "API_VERSION";
pub const DEPLOYMENT_NAME: &str = "DEPLOYMENT_NAME";
pub const MAX_TOKENS: &str = "MAX_TOKENS";
pub const TEMPERATURE: &str = "TEMPERATURE";
pub const TOP_P: &str = "TOP_P";

/// Prefix used when reading settings from the process environment.
pub const ENV_PREFIX: &str = "AZURE_OPENAI_";

const REQUIRED: [&str; 4] = [ENDPOINT, API_KEY, API_VERSION, DEPLOYMENT_NAME];
const OPTIONAL: [&str; 3] = [MAX_TOKENS, TEMPERATURE, TOP_P];

const DEFAULT_MAX_TOKENS: u32 = 800;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TOP_P: f32 = 0.9;

/// API credential. Redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Validated connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub endpoint: Url,
    pub credential: Secret,
    pub api_version: String,
    pub deployment_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Configuration {
    /// Read settings from `AZURE_OPENAI_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: HashMap<String, String> = REQUIRED
            .iter()
            .chain(OPTIONAL.iter())
            .filter_map(|key| {
                std::env::var(format!("{ENV_PREFIX}{key}"))
                    .ok()
                    .map(|v| (key.to_string(), v))
            })
            .collect();
        validate(&raw)
    }
}

/// Validate raw settings into a [`Configuration`].
pub fn validate(raw: &HashMap<String, String>) -> Result<Configuration, ConfigError> {
    let mut bad = BTreeSet::new();

    let value = |key: &str| raw.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    for key in REQUIRED {
        if value(key).is_none() {
            bad.insert(key.to_string());
        }
    }

    let endpoint = value(ENDPOINT).and_then(|v| match Url::parse(v) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Some(url),
        _ => {
            bad.insert(ENDPOINT.to_string());
            None
        }
    });

    let deployment = value(DEPLOYMENT_NAME).and_then(|v| {
        if v.contains('/') {
            bad.insert(DEPLOYMENT_NAME.to_string());
            None
        } else {
            Some(v.to_string())
        }
    });

    let max_tokens = parse_or(value(MAX_TOKENS), DEFAULT_MAX_TOKENS, |n: &u32| *n > 0)
        .unwrap_or_else(|| {
            bad.insert(MAX_TOKENS.to_string());
            DEFAULT_MAX_TOKENS
        });
    let temperature = parse_or(value(TEMPERATURE), DEFAULT_TEMPERATURE, |t: &f32| {
        (0.0..=2.0).contains(t)
    })
    .unwrap_or_else(|| {
        bad.insert(TEMPERATURE.to_string());
        DEFAULT_TEMPERATURE
    });
    let top_p = parse_or(value(TOP_P), DEFAULT_TOP_P, |p: &f32| (0.0..=1.0).contains(p))
        .unwrap_or_else(|| {
            bad.insert(TOP_P.to_string());
            DEFAULT_TOP_P
        });

    match (
        endpoint,
        value(API_KEY),
        value(API_VERSION),
        deployment,
        bad.is_empty(),
    ) {
        (Some(endpoint), Some(key), Some(version), Some(deployment_id), true) => {
            Ok(Configuration {
                endpoint,
                credential: Secret::new(key),
                api_version: version.to_string(),
                deployment_id,
                max_tokens,
                temperature,
                top_p,
            })
        }
        _ => Err(ConfigError { missing_fields: bad }),
    }
}

/// Parse an optional setting, falling back to `default` when absent.
///
/// Returns `None` when the value is present but unparseable or fails `check`.
fn parse_or<T: std::str::FromStr>(
    value: Option<&str>,
    default: T,
    check: impl Fn(&T) -> bool,
) -> Option<T> {
    match value {
        None => Some(default),
        Some(v) => v.parse::<T>().ok().filter(|parsed| check(parsed)),
    }
}
