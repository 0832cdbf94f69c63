//! Analysis mode and question classification enums

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AdvisorError;

/// Verbosity and tone of an answer.
///
/// Modes only change prompt text; see [`crate::context::prompt`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Technical,
    #[default]
    Comprehensive,
    Simple,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 3] = [
        AnalysisMode::Technical,
        AnalysisMode::Comprehensive,
        AnalysisMode::Simple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Technical => "Technical",
            AnalysisMode::Comprehensive => "Comprehensive",
            AnalysisMode::Simple => "Simple",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AdvisorError::InvalidInput(format!("unknown analysis mode: {s}")))
    }
}

/// What kind of answer a question asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    #[default]
    General,
    Statistical,
    Comparative,
    Actionable,
    Technical,
}

/// Presentation tier for the hot-pixel share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotPixelSeverity {
    /// Below 10%.
    Low,
    /// 10% to 30% inclusive.
    Moderate,
    /// Above 30%.
    High,
}

impl HotPixelSeverity {
    pub fn from_pct(pct: f64) -> Self {
        if pct < 10.0 {
            HotPixelSeverity::Low
        } else if pct <= 30.0 {
            HotPixelSeverity::Moderate
        } else {
            HotPixelSeverity::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HotPixelSeverity::Low => "Low",
            HotPixelSeverity::Moderate => "Moderate",
            HotPixelSeverity::High => "High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!(
            "simple".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::Simple
        );
        assert_eq!(
            " TECHNICAL ".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::Technical
        );
        assert!("verbose".parse::<AnalysisMode>().is_err());
    }

    #[test]
    fn severity_tiers() {
        assert_eq!(HotPixelSeverity::from_pct(9.9), HotPixelSeverity::Low);
        assert_eq!(HotPixelSeverity::from_pct(10.0), HotPixelSeverity::Moderate);
        assert_eq!(HotPixelSeverity::from_pct(30.0), HotPixelSeverity::Moderate);
        assert_eq!(HotPixelSeverity::from_pct(30.1), HotPixelSeverity::High);
    }
}
