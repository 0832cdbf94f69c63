//! Prompt rendering.
//!
//! Mode differences are pure text: each [`AnalysisMode`] maps to one
//! [`ModeTemplate`] of instruction fragments.

use std::fmt::Write;

use super::{AnalysisContext, fmt_pct, fmt_temp};
use crate::types::{AnalysisMode, QuestionCategory};

/// Instruction fragments for one analysis mode.
#[derive(Debug)]
pub struct ModeTemplate {
    pub heading: &'static str,
    pub style: &'static [&'static str],
    /// Label shown above a formatted answer.
    pub answer_label: &'static str,
}

const TECHNICAL: ModeTemplate = ModeTemplate {
    heading: "RESPONSE STYLE - TECHNICAL MODE",
    style: &[
        "Provide technical, scientific explanations with detailed methodology",
        "Use precise environmental science terminology and statistical concepts",
        "Include relevant formulas and calculations where they help",
        "Explain measurement uncertainties and data limitations",
        "Use concepts such as heat flux, thermal conductivity and radiative forcing",
    ],
    answer_label: "Technical Analysis",
};

const COMPREHENSIVE: ModeTemplate = ModeTemplate {
    heading: "RESPONSE STYLE - COMPREHENSIVE MODE",
    style: &[
        "Balance scientific accuracy with accessibility",
        "Include technical details when relevant and explain them clearly",
        "Focus on actionable insights and practical applications",
        "Cover both immediate and long-term implications",
    ],
    answer_label: "Comprehensive Analysis",
};

const SIMPLE: ModeTemplate = ModeTemplate {
    heading: "RESPONSE STYLE - SIMPLE MODE",
    style: &[
        "Give clear, easy-to-understand explanations for a general audience",
        "Avoid technical jargon",
        "Use analogies and simple comparisons",
        "Explain what this means for people living in the area",
        "Keep the answer short and conversational while staying accurate",
    ],
    answer_label: "Simple Explanation",
};

/// Template for a mode.
pub fn mode_template(mode: AnalysisMode) -> &'static ModeTemplate {
    match mode {
        AnalysisMode::Technical => &TECHNICAL,
        AnalysisMode::Comprehensive => &COMPREHENSIVE,
        AnalysisMode::Simple => &SIMPLE,
    }
}

fn category_hint(category: QuestionCategory) -> &'static str {
    match category {
        QuestionCategory::General => "Give a short overview grounded in the statistics.",
        QuestionCategory::Statistical => {
            "The user wants numbers: quote the relevant statistics exactly as given."
        }
        QuestionCategory::Comparative => {
            "The user wants a comparison: contrast the hottest and coolest parts of the area."
        }
        QuestionCategory::Actionable => {
            "The user wants recommendations: give concrete, prioritized heat mitigation steps."
        }
        QuestionCategory::Technical => {
            "The user wants causes: explain the physical mechanisms behind the pattern."
        }
    }
}

/// Render the system prompt for a context.
pub fn render_system_prompt(ctx: &AnalysisContext) -> String {
    let stats = &ctx.statistics;
    let ind = &ctx.indicators;
    let template = mode_template(ctx.mode);

    let mut out = String::with_capacity(2_048);
    let _ = writeln!(
        out,
        "You are an expert environmental data analyst specializing in land surface \
         temperature analysis and urban heat island studies. You are analyzing data for \
         {}.",
        ctx.location
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "CONTEXT DATA:");
    let _ = writeln!(out, "Location: {}", ctx.location);
    let _ = writeln!(out, "Data Type: {}", ctx.data_type);
    let _ = writeln!(out);
    let _ = writeln!(out, "TEMPERATURE STATISTICS:");
    let _ = writeln!(out, "- Minimum temperature: {}", fmt_temp(stats.min_temp));
    let _ = writeln!(out, "- Maximum temperature: {}", fmt_temp(stats.max_temp));
    let _ = writeln!(out, "- Mean temperature: {}", fmt_temp(stats.mean_temp));
    let _ = writeln!(out, "- Temperature range: {}", fmt_temp(stats.range_temp));
    let _ = writeln!(
        out,
        "- Hot pixels: {} of the area ({} severity)",
        fmt_pct(stats.hot_pixel_pct),
        ctx.severity.as_str()
    );
    let _ = writeln!(out, "- Total pixels: {}", stats.total_pixels);
    let _ = writeln!(out);
    let _ = writeln!(out, "CLIMATE INDICATORS:");
    let _ = writeln!(
        out,
        "- Urban heat island: {} ({})",
        ind.uhi_level,
        fmt_temp(ind.uhi_intensity)
    );
    let _ = writeln!(out, "- Heat stress: {}", ind.stress_level);
    let _ = writeln!(out, "- Thermal comfort: {}", ind.thermal_comfort);
    let _ = writeln!(out, "- Environmental risk: {}", ind.risk_level);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}:", template.heading);
    for line in template.style {
        let _ = writeln!(out, "- {line}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "GUIDELINES:");
    let _ = writeln!(
        out,
        "- Always reference specific data points from the statistics above"
    );
    let _ = writeln!(
        out,
        "- Explain environmental and health implications of the temperature pattern"
    );
    let _ = writeln!(out, "- {}", category_hint(ctx.question_category));
    out.truncate(out.trim_end().len());
    out
}

/// Render the user prompt for a context.
pub fn render_user_prompt(ctx: &AnalysisContext) -> String {
    format!(
        "Question: {}\n\nAnswer using the {} land surface temperature data described above.",
        ctx.question, ctx.location
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::build_context;
    use crate::types::Statistics;

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
    fn system_prompt_embeds_statistics() {
        let ctx = build_context(&sample(), AnalysisMode::Technical, "Why?");
        let prompt = render_system_prompt(&ctx);
        assert!(prompt.contains("Maximum temperature: 41.70°C"));
        assert!(prompt.contains("Hot pixels: 34.2% of the area (High severity)"));
        assert!(prompt.contains("TECHNICAL MODE"));
        assert!(prompt.contains("Kilimani"));
        assert!(prompt.contains("explain the physical mechanisms"));
    }

    #[test]
    fn modes_render_different_prompts() {
        let prompts: Vec<String> = AnalysisMode::ALL
            .iter()
            .map(|m| render_system_prompt(&build_context(&sample(), *m, "hello")))
            .collect();
        assert_ne!(prompts[0], prompts[1]);
        assert_ne!(prompts[1], prompts[2]);
        assert_ne!(prompts[0], prompts[2]);
    }

    #[test]
    fn user_prompt_carries_question() {
        let ctx = build_context(&sample(), AnalysisMode::Simple, "  How hot does it get?  ");
        assert!(render_user_prompt(&ctx).starts_with("Question: How hot does it get?\n"));
    }
}
