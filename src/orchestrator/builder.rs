//! Builder for configuring orchestrator instances

use std::sync::Arc;
use std::time::Duration;

use super::{ResponseOrchestrator, RetryConfig};
use crate::cache::{CacheBackend, CacheConfig, ResponseCache};
use crate::client::{AzureOpenAiClient, CompletionClient};
use crate::config::{Configuration, Settings};
use crate::context::{DEFAULT_DATA_TYPE, DEFAULT_LOCATION};
use crate::error::ConfigError;
use crate::Result;

/// Default overall budget for one `answer()` call.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default per-call HTTP timeout for the built-in client.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for [`ResponseOrchestrator`].
///
/// Without an explicit configuration, connection settings are read from
/// `AZURE_OPENAI_*` environment variables at `build()` time. A missing or
/// malformed configuration is not a build error: the orchestrator is
/// created and answers from the fallback generator.
pub struct OrchestratorBuilder {
    configuration: Option<std::result::Result<Configuration, ConfigError>>,
    client: Option<Arc<dyn CompletionClient>>,
    cache: Option<Arc<dyn CacheBackend>>,
    cache_config: CacheConfig,
    retry: RetryConfig,
    request_timeout: Duration,
    http_timeout: Duration,
    location: String,
    data_type: String,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            configuration: None,
            client: None,
            cache: None,
            cache_config: CacheConfig::default(),
            retry: RetryConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            location: DEFAULT_LOCATION.to_string(),
            data_type: DEFAULT_DATA_TYPE.to_string(),
        }
    }

    /// Use a validated connection configuration.
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(Ok(configuration));
        self
    }

    /// Use the outcome of [`crate::config::validate`] directly.
    pub fn validated(mut self, result: std::result::Result<Configuration, ConfigError>) -> Self {
        self.configuration = Some(result);
        self
    }

    /// Replace the completion client (default: Azure OpenAI over HTTPS).
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Replace the cache backend. Overrides [`cache_config`](Self::cache_config).
    pub fn cache_backend(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Size and TTL of the built-in cache.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Overall time budget for one answer, retries included (default: 15s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Per-call HTTP timeout of the built-in client (default: 60s).
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Study area named in prompts and answer footers.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Dataset description used in prompts.
    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    /// Apply tunables from a settings file.
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.retry = settings.retry_config();
        self.cache_config = settings.cache_config();
        self.request_timeout = settings.request_timeout();
        self.http_timeout = settings.http_timeout();
        if let Some(location) = &settings.context.location {
            self.location = location.clone();
        }
        if let Some(data_type) = &settings.context.data_type {
            self.data_type = data_type.clone();
        }
        self
    }

    /// Build the orchestrator.
    ///
    /// Fails only when the default HTTP client cannot be constructed.
    pub fn build(self) -> Result<ResponseOrchestrator> {
        let configuration = self
            .configuration
            .unwrap_or_else(Configuration::from_env)
            .map(Arc::new);

        let client: Arc<dyn CompletionClient> = match self.client {
            Some(client) => client,
            None => Arc::new(AzureOpenAiClient::with_timeout(self.http_timeout)?),
        };

        let cache: Arc<dyn CacheBackend> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(ResponseCache::new(&self.cache_config)),
        };

        Ok(ResponseOrchestrator {
            configuration,
            client,
            cache,
            retry: self.retry,
            request_timeout: self.request_timeout,
            location: self.location.into(),
            data_type: self.data_type,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
