//! Context assembly: statistics + mode + question into prompt input.
//!
//! Everything here is a pure function of its inputs. Numbers are rendered
//! at fixed precision (two decimals for °C, one for percentages) so that
//! identical inputs always produce identical prompts and cache keys.

mod classify;
pub mod indicators;
pub mod prompt;

use serde::Serialize;

pub use classify::classify_question;
pub(crate) use classify::mentions;
pub use indicators::ClimateIndicators;
pub use prompt::{render_system_prompt, render_user_prompt};

use crate::types::{AnalysisMode, HotPixelSeverity, QuestionCategory, Statistics};

/// Default study area named in prompts.
pub const DEFAULT_LOCATION: &str = "Kilimani area, Nairobi, Kenya";

/// Default description of the dataset.
pub const DEFAULT_DATA_TYPE: &str = "Land Surface Temperature (LST) from satellite imagery";

/// Longest question forwarded to the model, in characters.
pub const MAX_QUESTION_CHARS: usize = 1_000;

/// Everything needed to render prompts for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisContext {
    pub location: String,
    pub data_type: String,
    pub statistics: Statistics,
    pub mode: AnalysisMode,
    pub question_category: QuestionCategory,
    pub question: String,
    pub severity: HotPixelSeverity,
    pub indicators: ClimateIndicators,
}

/// Assemble context using the default location and data type.
pub fn build_context(
    statistics: &Statistics,
    mode: AnalysisMode,
    question: &str,
) -> AnalysisContext {
    build_context_for(DEFAULT_LOCATION, DEFAULT_DATA_TYPE, statistics, mode, question)
}

/// Assemble context for a specific study area.
pub fn build_context_for(
    location: &str,
    data_type: &str,
    statistics: &Statistics,
    mode: AnalysisMode,
    question: &str,
) -> AnalysisContext {
    AnalysisContext {
        location: location.to_string(),
        data_type: data_type.to_string(),
        statistics: statistics.clone(),
        mode,
        question_category: classify_question(question),
        question: bound_question(question),
        severity: HotPixelSeverity::from_pct(statistics.hot_pixel_pct),
        indicators: ClimateIndicators::from_statistics(statistics),
    }
}

/// Format a temperature for prompts and fallback text.
pub fn fmt_temp(value: f64) -> String {
    format!("{value:.2}°C")
}

/// Format a percentage for prompts and fallback text.
pub fn fmt_pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// Fixed-order, fixed-precision rendering of a statistics record.
///
/// Used both in the system prompt and as the statistics part of a cache
/// fingerprint.
pub fn canonical_statistics(stats: &Statistics) -> String {
    format!(
        "min={:.2};max={:.2};mean={:.2};range={:.2};hot_pct={:.1};pixels={}",
        stats.min_temp,
        stats.max_temp,
        stats.mean_temp,
        stats.range_temp,
        stats.hot_pixel_pct,
        stats.total_pixels
    )
}

fn bound_question(question: &str) -> String {
    let trimmed = question.trim();
    match trimmed.char_indices().nth(MAX_QUESTION_CHARS) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Statistics {
        Statistics {
            min_temp: 18.2,
            max_temp: 41.7,
            mean_temp: 27.9,
            range_temp: 23.5,
            hot_pixel_pct: 34.2,
            total_pixels: 125_000,
        }
    }

    #[test]
    fn context_is_deterministic() {
        let a = build_context(&sample(), AnalysisMode::Simple, "How hot does it get?");
        let b = build_context(&sample(), AnalysisMode::Simple, "How hot does it get?");
        assert_eq!(a, b);
        assert_eq!(a.question_category, QuestionCategory::Statistical);
        assert_eq!(a.severity, HotPixelSeverity::High);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_temp(41.7), "41.70°C");
        assert_eq!(fmt_temp(18.199), "18.20°C");
        assert_eq!(fmt_pct(34.2), "34.2%");
        assert_eq!(fmt_pct(9.96), "10.0%");
    }

    #[test]
    fn canonical_statistics_rounds() {
        let mut stats = sample();
        stats.mean_temp = 27.900_000_1;
        assert_eq!(canonical_statistics(&stats), canonical_statistics(&sample()));
        assert_eq!(
            canonical_statistics(&sample()),
            "min=18.20;max=41.70;mean=27.90;range=23.50;hot_pct=34.2;pixels=125000"
        );
    }

    #[test]
    fn long_questions_are_bounded() {
        let question = "é".repeat(MAX_QUESTION_CHARS + 50);
        let ctx = build_context(&sample(), AnalysisMode::Technical, &question);
        assert_eq!(ctx.question.chars().count(), MAX_QUESTION_CHARS);
    }

    #[test]
    fn custom_location_is_kept() {
        let ctx = build_context_for(
            "Westlands",
            "LST",
            &sample(),
            AnalysisMode::Comprehensive,
            "hi",
        );
        assert_eq!(ctx.location, "Westlands");
        assert_eq!(ctx.question_category, QuestionCategory::General);
    }
}
