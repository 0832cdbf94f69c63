//! Completion service clients.
//!
//! A [`CompletionClient`] makes exactly one network attempt per call and
//! reports failures as a [`ClientError`]. Retry policy lives in the
//! orchestrator.

pub mod azure;

pub use azure::AzureOpenAiClient;

use async_trait::async_trait;

use crate::config::Configuration;
use crate::error::ClientError;
use crate::types::Completion;

/// Client for a chat-completion service.
///
/// Implementations must be safe for concurrent use by many in-flight
/// requests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name for logging.
    fn name(&self) -> &str;

    /// Send one completion request.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &Configuration,
    ) -> Result<Completion, ClientError>;

    /// Cheap request confirming reachability and credentials.
    async fn test_connection(&self, config: &Configuration) -> bool;
}
