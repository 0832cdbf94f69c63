//! Public types for the lst-advisor API.

mod mode;
mod response;
mod statistics;

pub use mode::{AnalysisMode, HotPixelSeverity, QuestionCategory};
pub use response::{AiResponse, Completion, ConfigStatus, ConnectionStatus, ResponseSource};
pub use statistics::Statistics;
