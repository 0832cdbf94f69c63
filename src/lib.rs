//! lst-advisor - AI answers about land surface temperature statistics
//!
//! This crate answers natural-language questions about a summary of a
//! land-surface-temperature raster. Answers come from an Azure OpenAI
//! deployment when one is configured and reachable, and from a rule-based
//! generator otherwise, so a caller always gets something to show.
//!
//! # Example
//!
//! ```rust,no_run
//! use lst_advisor::{AnalysisMode, ResponseOrchestrator, Statistics};
//!
//! #[tokio::main]
//! async fn main() -> lst_advisor::Result<()> {
//!     // Reads AZURE_OPENAI_* from the environment.
//!     let advisor = ResponseOrchestrator::builder().build()?;
//!
//!     let stats = Statistics {
//!         min_temp: 24.1,
//!         max_temp: 41.7,
//!         mean_temp: 31.2,
//!         range_temp: 17.6,
//!         hot_pixel_pct: 34.2,
//!         total_pixels: 250_000,
//!     };
//!
//!     let response = advisor
//!         .answer("Where are the hottest areas?", &stats, AnalysisMode::Simple)
//!         .await?;
//!
//!     println!("[{}] {}", response.source.as_str(), response.content);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod fallback;
pub mod orchestrator;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheBackend, CacheConfig, Fingerprint, ResponseCache};
pub use client::{AzureOpenAiClient, CompletionClient};
pub use config::{Configuration, Secret, Settings};
pub use error::{AdvisorError, CacheError, ClientError, ConfigError, ErrorKind, Result};
pub use orchestrator::{OrchestratorBuilder, ResponseOrchestrator, RetryConfig, RetryState};
pub use types::{
    AiResponse, AnalysisMode, Completion, ConfigStatus, ConnectionStatus, HotPixelSeverity,
    QuestionCategory, ResponseSource, Statistics,
};

/// Crate version.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
