//! Response orchestration: cache, completion with retry, and fallback.
//!
//! [`ResponseOrchestrator::answer`] is the single entry point. It never
//! surfaces configuration or service failures: those end in a rule-based
//! answer tagged [`ResponseSource::Fallback`]. Only malformed input
//! (`InvalidInput`) is returned as an error.
//!
//! # Request lifecycle
//!
//! 1. Invalid configuration goes straight to the fallback.
//! 2. A cache hit is returned unchanged.
//! 3. The context is assembled and the client is called.
//! 4. Transient failures (`RateLimited`, `Network`, `Timeout`) are retried
//!    with exponential backoff; other failures are terminal.
//! 5. Exhausted retries, terminal errors and an exhausted request budget all
//!    end in the fallback.
//! 6. The answer (LLM or fallback) is cached and returned.
//!
//! Each attempt runs as its own task. When the request budget runs out
//! mid-call the task is left running. Once the fallback is cached, a
//! successful late result replaces it for the next identical question.

mod builder;
mod format;
pub mod retry;

pub use builder::OrchestratorBuilder;
pub use retry::{RetryConfig, RetryState};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{CacheBackend, Fingerprint};
use crate::client::CompletionClient;
use crate::config::Configuration;
use crate::context::{
    AnalysisContext, build_context_for, render_system_prompt, render_user_prompt,
};
use crate::error::{ClientError, ConfigError, ErrorKind};
use crate::fallback;
use crate::telemetry;
use crate::types::{
    AiResponse, AnalysisMode, Completion, ConfigStatus, ConnectionStatus, ResponseSource,
    Statistics,
};
use crate::{AdvisorError, Result};

type PendingCall = JoinHandle<std::result::Result<Completion, ClientError>>;

/// Upper bound on the request budget when the configured one does not fit
/// on the clock.
const MAX_BUDGET: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Answers questions about temperature statistics.
///
/// Cheap to share: wrap in an `Arc` and call [`answer`](Self::answer) from
/// as many tasks as needed. The client's connection pool and the cache are
/// the only shared state.
pub struct ResponseOrchestrator {
    configuration: std::result::Result<Arc<Configuration>, ConfigError>,
    client: Arc<dyn CompletionClient>,
    cache: Arc<dyn CacheBackend>,
    retry: RetryConfig,
    request_timeout: Duration,
    location: Arc<str>,
    data_type: String,
}

impl ResponseOrchestrator {
    /// Create a builder.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Answer `question` about `statistics` in the given `mode`.
    ///
    /// Returns `InvalidInput` for a blank question or inconsistent
    /// statistics; every other failure produces a fallback answer.
    pub async fn answer(
        &self,
        question: &str,
        statistics: &Statistics,
        mode: AnalysisMode,
    ) -> Result<AiResponse> {
        if question.trim().is_empty() {
            return Err(AdvisorError::InvalidInput("question is empty".to_string()));
        }
        statistics.validate()?;

        let start = Instant::now();
        let key = Fingerprint::new(question, mode, statistics);

        let outcome = match &self.configuration {
            Err(err) => {
                debug!(missing = ?err.missing_fields, "configuration invalid, skipping completion service");
                Err((RetryState::failed(ErrorKind::Config), None))
            }
            Ok(config) => {
                if let Some(hit) = self.cached(&key).await {
                    debug!(source = hit.source.as_str(), "answer served from cache");
                    return Ok(hit);
                }
                let context = build_context_for(
                    &self.location,
                    &self.data_type,
                    statistics,
                    mode,
                    question,
                );
                self.complete_with_retry(config, &context, start).await
            }
        };

        let (response, pending) = match outcome {
            Ok(response) => (response, None),
            Err((state, pending)) => (
                self.fallback(question, statistics, mode, &state, start),
                pending,
            ),
        };

        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "source" => response.source.as_str(),
            "mode" => mode.as_str())
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "source" => response.source.as_str())
        .record(start.elapsed().as_secs_f64());

        if let Err(e) = self.cache.insert(key, response.clone()).await {
            debug!(error = %e, "failed to cache answer");
        }
        if let Some(call) = pending {
            self.cache_late_result(call, key, mode, start);
        }
        Ok(response)
    }

    /// Report whether connection settings are usable, and which are not.
    pub fn validate_configuration(&self) -> ConfigStatus {
        match &self.configuration {
            Ok(_) => ConfigStatus {
                ok: true,
                missing_fields: Default::default(),
            },
            Err(err) => ConfigStatus {
                ok: false,
                missing_fields: err.missing_fields.clone(),
            },
        }
    }

    /// Check the completion service. No request is sent when configuration
    /// is invalid.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let Ok(config) = &self.configuration else {
            return ConnectionStatus {
                ok: false,
                latency_ms: 0,
            };
        };
        let start = Instant::now();
        let ok = tokio::time::timeout(self.request_timeout, self.client.test_connection(config))
            .await
            .unwrap_or(false);
        ConnectionStatus {
            ok,
            latency_ms: elapsed_ms(start),
        }
    }

    async fn cached(&self, key: &Fingerprint) -> Option<AiResponse> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                debug!(error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Call the client until it answers, fails terminally, or the budget
    /// runs out. A call cut off by the budget is handed back still running.
    async fn complete_with_retry(
        &self,
        config: &Arc<Configuration>,
        context: &AnalysisContext,
        start: Instant,
    ) -> std::result::Result<AiResponse, (RetryState, Option<PendingCall>)> {
        let system: Arc<str> = render_system_prompt(context).into();
        let user: Arc<str> = render_user_prompt(context).into();
        let deadline = budget_deadline(start, self.request_timeout);
        let mut state = RetryState::default();

        loop {
            state.attempt += 1;
            let mut call = self.spawn_attempt(config, &system, &user);

            let err = match tokio::time::timeout_at(deadline, &mut call).await {
                Ok(Ok(Ok(completion))) => {
                    match llm_response(completion, context.mode, &self.location, start) {
                        Ok(response) => return Ok(response),
                        Err(e) => e,
                    }
                }
                Ok(Ok(Err(e))) => e,
                Ok(Err(join_err)) => {
                    ClientError::Network(format!("completion task failed: {join_err}"))
                }
                Err(_) => {
                    state.last_error = Some(ErrorKind::BudgetExhausted);
                    return Err((state, Some(call)));
                }
            };

            state.last_error = Some(err.kind());
            if !err.is_transient() || state.attempt >= self.retry.max_attempts {
                return Err((state, None));
            }

            let delay = self.retry.effective_delay(state.attempt + 1, err.retry_after());
            state.next_delay = delay;
            if delay >= deadline.saturating_duration_since(Instant::now()) {
                debug!(
                    delay_ms = millis(delay),
                    "request budget cannot cover backoff, giving up"
                );
                return Err((state, None));
            }

            metrics::counter!(telemetry::RETRIES_TOTAL).increment(1);
            warn!(
                client = self.client.name(),
                attempt = state.attempt,
                max_attempts = self.retry.max_attempts,
                delay_ms = millis(delay),
                error = %err,
                "retrying after transient error"
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn spawn_attempt(
        &self,
        config: &Arc<Configuration>,
        system: &Arc<str>,
        user: &Arc<str>,
    ) -> PendingCall {
        let client = Arc::clone(&self.client);
        let config = Arc::clone(config);
        let system = Arc::clone(system);
        let user = Arc::clone(user);
        tokio::spawn(async move { client.complete(&system, &user, &config).await })
    }

    /// Let a call cut off by the request budget finish in the background
    /// and cache its answer if it succeeds.
    fn cache_late_result(
        &self,
        call: PendingCall,
        key: Fingerprint,
        mode: AnalysisMode,
        start: Instant,
    ) {
        let cache = Arc::clone(&self.cache);
        let location = Arc::clone(&self.location);
        tokio::spawn(async move {
            let Ok(Ok(completion)) = call.await else {
                return;
            };
            match llm_response(completion, mode, &location, start) {
                Ok(response) => {
                    metrics::counter!(telemetry::LATE_COMPLETIONS_TOTAL).increment(1);
                    if let Err(e) = cache.insert(key, response).await {
                        debug!(error = %e, "failed to cache late answer");
                    }
                }
                Err(e) => debug!(error = %e, "discarding late answer"),
            }
        });
    }

    fn fallback(
        &self,
        question: &str,
        statistics: &Statistics,
        mode: AnalysisMode,
        state: &RetryState,
        start: Instant,
    ) -> AiResponse {
        let reason = state.last_error.unwrap_or(ErrorKind::Config);
        warn!(
            error_kind = %reason,
            attempts = state.attempt,
            "completion unavailable, answering from fallback"
        );
        metrics::counter!(telemetry::FALLBACKS_TOTAL, "reason" => reason.as_str()).increment(1);

        AiResponse {
            content: fallback::generate(question, statistics),
            source: ResponseSource::Fallback,
            mode,
            latency_ms: elapsed_ms(start),
            token_usage: None,
        }
    }
}

/// Validate and format a raw completion into an LLM answer.
fn llm_response(
    completion: Completion,
    mode: AnalysisMode,
    location: &str,
    start: Instant,
) -> std::result::Result<AiResponse, ClientError> {
    format::check_quality(&completion.text)?;
    if let Some(tokens) = completion.token_usage {
        metrics::counter!(telemetry::TOKENS_TOTAL).increment(u64::from(tokens));
    }
    let body = format::normalize_markdown(&completion.text);
    Ok(AiResponse {
        content: format::decorate(&body, mode, location),
        source: ResponseSource::Llm,
        mode,
        latency_ms: elapsed_ms(start),
        token_usage: completion.token_usage,
    })
}

fn budget_deadline(start: Instant, budget: Duration) -> Instant {
    start
        .checked_add(budget)
        .or_else(|| start.checked_add(MAX_BUDGET))
        .unwrap_or(start)
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn elapsed_ms(start: Instant) -> u64 {
    millis(start.elapsed())
}
