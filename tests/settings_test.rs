//! Tests for [`Settings`] file loading and how it shapes an orchestrator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use lst_advisor::client::CompletionClient;
use lst_advisor::config::{self, Configuration};
use lst_advisor::{
    AnalysisMode, ClientError, Completion, ResponseOrchestrator, Settings, Statistics,
};

fn write_settings(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(
        &dir,
        r#"
        [retry]
        max_attempts = 2
        jitter = 0.1

        [cache]
        max_entries = 32
        ttl_secs = 60

        [request]
        timeout_secs = 8
        "#,
    );

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.retry.max_attempts, 2);
    assert_eq!(settings.retry_config().jitter, 0.1);
    assert_eq!(settings.cache_config().max_entries, 32);
    assert_eq!(settings.cache_config().ttl, Duration::from_secs(60));
    assert_eq!(settings.request_timeout(), Duration::from_secs(8));
    assert_eq!(settings.http_timeout(), Duration::from_secs(60));
}

#[test]
fn malformed_file_is_a_settings_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(&dir, "[retry]\nmax_attempts = \"many\"\n");

    let err = Settings::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to parse settings file"));
}

#[test]
fn empty_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(&dir, "");

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.retry.max_attempts, 3);
    assert_eq!(settings.cache.ttl_secs, 1_800);
    assert!(settings.context.location.is_none());
}

/// Echoes a fixed answer.
struct EchoClient;

#[async_trait]
impl CompletionClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _config: &Configuration,
    ) -> Result<Completion, ClientError> {
        Ok(Completion {
            text: format!("You asked the following in full: {user_prompt}"),
            token_usage: None,
        })
    }

    async fn test_connection(&self, _config: &Configuration) -> bool {
        true
    }
}

#[tokio::test]
async fn context_settings_reach_prompts_and_footer() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(
        &dir,
        r#"
        [context]
        location = "Westlands, Nairobi"
        "#,
    );
    let settings = Settings::load(Some(&path)).unwrap();

    let raw: HashMap<String, String> = [
        ("ENDPOINT", "https://example.openai.azure.com"),
        ("API_KEY", "test-key"),
        ("API_VERSION", "2024-02-01"),
        ("DEPLOYMENT_NAME", "gpt-4o"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let advisor = ResponseOrchestrator::builder()
        .settings(&settings)
        .validated(config::validate(&raw))
        .client(Arc::new(EchoClient))
        .build()
        .unwrap();

    let stats = Statistics {
        min_temp: 20.0,
        max_temp: 30.0,
        mean_temp: 25.0,
        range_temp: 10.0,
        hot_pixel_pct: 5.0,
        total_pixels: 100,
    };
    let response = advisor
        .answer("Which area was studied?", &stats, AnalysisMode::Simple)
        .await
        .unwrap();

    assert!(!response.is_fallback());
    let footer = "*Analysis based on Westlands, Nairobi land surface temperature data. Mode: Simple*";
    assert!(response.content.ends_with(footer), "{}", response.content);
    // The echoed user prompt names the configured study area too.
    assert!(response.content.contains("Answer using the Westlands, Nairobi"));
}
