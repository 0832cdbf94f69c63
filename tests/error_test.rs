use std::time::Duration;

use lst_advisor::{AdvisorError, ClientError, ConfigError, ErrorKind, Result};

#[test]
fn test_error_display() {
    let err = AdvisorError::InvalidInput("question is empty".to_string());
    assert!(err.to_string().contains("question is empty"));
}

#[test]
fn test_config_error_names_fields() {
    let err: AdvisorError = ConfigError::new(["ENDPOINT", "API_KEY"]).into();
    assert_eq!(
        err.to_string(),
        "missing or invalid configuration: API_KEY, ENDPOINT"
    );
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(ClientError::Auth.into())
    }
    assert!(matches!(
        returns_error(),
        Err(AdvisorError::Client(ClientError::Auth))
    ));
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(ClientError::RateLimited { retry_after: None }.is_transient());
    assert!(
        ClientError::RateLimited {
            retry_after: Some(Duration::from_secs(1))
        }
        .is_transient()
    );
    assert!(ClientError::Network("connection reset".into()).is_transient());
    assert!(ClientError::Timeout.is_transient());
}

#[test]
fn terminal_errors() {
    assert!(!ClientError::Auth.is_transient());
    assert!(!ClientError::QuotaExceeded.is_transient());
    assert!(
        !ClientError::InvalidResponse {
            raw: "<html>".into()
        }
        .is_transient()
    );
}

#[test]
fn retry_after_only_from_rate_limit() {
    let hint = Duration::from_millis(1_500);
    assert_eq!(
        ClientError::RateLimited {
            retry_after: Some(hint)
        }
        .retry_after(),
        Some(hint)
    );
    assert_eq!(ClientError::Timeout.retry_after(), None);
}

#[test]
fn error_kinds_have_stable_labels() {
    assert_eq!(ClientError::Auth.kind(), ErrorKind::Auth);
    assert_eq!(ClientError::Timeout.kind().as_str(), "timeout");
    assert_eq!(
        ClientError::RateLimited { retry_after: None }.kind().to_string(),
        "rate_limited"
    );
    assert_eq!(ErrorKind::BudgetExhausted.as_str(), "budget_exhausted");
}
