//! Answer types returned to the display layer

use serde::{Deserialize, Serialize};

use super::mode::AnalysisMode;

/// Which path produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Llm,
    /// Rule-based answer; the display layer should flag degraded mode.
    Fallback,
}

impl ResponseSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseSource::Llm => "llm",
            ResponseSource::Fallback => "fallback",
        }
    }
}

/// Answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub content: String,
    pub source: ResponseSource,
    pub mode: AnalysisMode,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<u32>,
}

impl AiResponse {
    pub fn is_fallback(&self) -> bool {
        self.source == ResponseSource::Fallback
    }
}

/// Raw text returned by one completion call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<u32>,
}

/// Result of `validate_configuration()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub ok: bool,
    pub missing_fields: std::collections::BTreeSet<String>,
}

/// Result of `test_connection()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub latency_ms: u64,
}
