//! Azure OpenAI chat-completions client.
//!
//! See: <https://learn.microsoft.com/azure/ai-services/openai/reference>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use super::CompletionClient;
use crate::config::Configuration;
use crate::error::ClientError;
use crate::types::Completion;

/// Default per-request HTTP timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Token cap for connection checks.
const TEST_MAX_TOKENS: u32 = 10;

/// Client for Azure OpenAI deployments.
///
/// Holds one pooled `reqwest::Client`; cloning shares the pool.
#[derive(Clone)]
pub struct AzureOpenAiClient {
    http: Client,
}

impl AzureOpenAiClient {
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Create a client around an existing HTTP pool.
    pub fn with_http_client(http: Client) -> Self {
        Self { http }
    }

    fn completions_url(config: &Configuration) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            config.endpoint.as_str().trim_end_matches('/'),
            config.deployment_id,
            config.api_version
        )
    }

    async fn send(
        &self,
        config: &Configuration,
        request: &ChatRequest<'_>,
    ) -> Result<Completion, ClientError> {
        let response = self
            .http
            .post(Self::completions_url(config))
            .header("api-key", config.credential.expose())
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_status(status.as_u16(), &headers, &body));
        }

        parse_completion(&body)
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &Configuration,
    ) -> Result<Completion, ClientError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        };
        self.send(config, &request).await
    }

    async fn test_connection(&self, config: &Configuration) -> bool {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "Hello",
            }],
            max_tokens: TEST_MAX_TOKENS,
            temperature: config.temperature,
            top_p: config.top_p,
        };
        self.send(config, &request).await.is_ok()
    }
}

fn map_transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Network(err.to_string())
    }
}

/// Map a non-success HTTP status to a [`ClientError`].
fn map_status(status: u16, headers: &HeaderMap, body: &str) -> ClientError {
    match status {
        401 | 403 => ClientError::Auth,
        429 if mentions_quota(body) => ClientError::QuotaExceeded,
        429 => ClientError::RateLimited {
            retry_after: retry_after(headers),
        },
        408 | 504 => ClientError::Timeout,
        500..=599 => ClientError::Network(format!("server error {status}")),
        code => ClientError::InvalidResponse {
            raw: format!("status {code}: {}", truncate(body, 512)),
        },
    }
}

fn mentions_quota(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("insufficient_quota") || lower.contains("quota exceeded")
}

/// Read `retry-after-ms` (milliseconds) or `retry-after` (seconds).
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
    };
    header("retry-after-ms")
        .map(Duration::from_millis)
        .or_else(|| header("retry-after").map(Duration::from_secs))
}

fn parse_completion(body: &str) -> Result<Completion, ClientError> {
    let invalid = || ClientError::InvalidResponse {
        raw: truncate(body, 512).to_string(),
    };
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|_| invalid())?;
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(invalid)?;
    Ok(Completion {
        text,
        token_usage: parsed.usage.map(|u| u.total_tokens),
    })
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageBlock>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageBlock {
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn status_mapping() {
        let headers = HeaderMap::new();
        assert_eq!(map_status(401, &headers, ""), ClientError::Auth);
        assert_eq!(map_status(403, &headers, ""), ClientError::Auth);
        assert_eq!(map_status(504, &headers, ""), ClientError::Timeout);
        assert!(matches!(
            map_status(502, &headers, ""),
            ClientError::Network(_)
        ));
        assert!(matches!(
            map_status(404, &headers, "DeploymentNotFound"),
            ClientError::InvalidResponse { .. }
        ));
    }

    #[test]
    fn rate_limit_reads_retry_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("2"));
        assert_eq!(
            map_status(429, &headers, "{}"),
            ClientError::RateLimited {
                retry_after: Some(Duration::from_secs(2))
            }
        );
        headers.insert("retry-after-ms", HeaderValue::from_static("750"));
        assert_eq!(
            map_status(429, &headers, "{}"),
            ClientError::RateLimited {
                retry_after: Some(Duration::from_millis(750))
            }
        );
    }

    #[test]
    fn quota_body_is_terminal() {
        let body = r#"{"error":{"code":"insufficient_quota"}}"#;
        assert_eq!(
            map_status(429, &HeaderMap::new(), body),
            ClientError::QuotaExceeded
        );
    }

    #[test]
    fn parse_valid_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hi there"}}],
            "usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#;
        let completion = parse_completion(body).unwrap();
        assert_eq!(completion.text, "Hi there");
        assert_eq!(completion.token_usage, Some(7));
    }

    #[test]
    fn parse_rejects_empty_choices() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(ClientError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_completion("<html>"),
            Err(ClientError::InvalidResponse { raw }) if raw == "<html>"
        ));
    }
}
