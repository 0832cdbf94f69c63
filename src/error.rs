//! Error types

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Connection settings are missing or malformed.
///
/// `missing_fields` lists every offending setting key (e.g. `API_KEY`), so a
/// caller can render field-specific setup guidance from a single call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing or invalid configuration: {}", join_fields(.missing_fields))]
pub struct ConfigError {
    pub missing_fields: BTreeSet<String>,
}

impl ConfigError {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            missing_fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

fn join_fields(fields: &BTreeSet<String>) -> String {
    fields.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Failure of a single call to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("authentication failed")]
    Auth,

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid response: {raw}")]
    InvalidResponse { raw: String },

    #[error("quota exceeded")]
    QuotaExceeded,
}

impl ClientError {
    /// Whether another attempt could succeed.
    ///
    /// Auth, quota and malformed-response failures are terminal.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::RateLimited { .. } | ClientError::Network(_) | ClientError::Timeout
        )
    }

    /// Server-provided wait hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ClientError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Auth => ErrorKind::Auth,
            ClientError::RateLimited { .. } => ErrorKind::RateLimited,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Timeout => ErrorKind::Timeout,
            ClientError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            ClientError::QuotaExceeded => ErrorKind::QuotaExceeded,
        }
    }
}

/// Response cache failure. Never surfaced to callers of `answer()`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("cache error: {0}")]
pub struct CacheError(pub String);

/// Flat label for the reason an answer fell back.
///
/// Used in retry state, log fields and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Auth,
    RateLimited,
    Network,
    Timeout,
    InvalidResponse,
    QuotaExceeded,
    /// The overall request budget ran out.
    BudgetExhausted,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Auth => "auth",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::BudgetExhausted => "budget_exhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crate error type.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// Input data the fallback cannot compensate for (blank question,
    /// malformed statistics). The only error `answer()` returns.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// Settings file could not be found, read or parsed.
    #[error("settings error: {0}")]
    Settings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;
