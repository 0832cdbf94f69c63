//! Rule-based answers used when the completion service cannot answer.
//!
//! [`generate`] is deterministic and does no I/O. Every template opens with
//! the key figures (peak temperature and hot-pixel share) so a degraded
//! answer still carries the numbers a user most often asks about.

use std::fmt::Write;

use crate::context::{
    ClimateIndicators, classify_question, fmt_pct, fmt_temp, mentions,
};
use crate::types::{HotPixelSeverity, QuestionCategory, Statistics};

const MITIGATION_MEASURES: &[&str] = &[
    "Plant street trees and expand urban green spaces to add shade and evaporative cooling",
    "Install cool or reflective roofs and high-albedo pavements",
    "Add green roofs and vertical gardens on dense commercial blocks",
    "Replace impervious surfaces with permeable paving and vegetated swales",
    "Protect and restore water features that act as cooling corridors",
    "Prioritize shaded walkways and public cooling spots in the hottest zones",
];

const HEAT_ISLAND_DRIVERS: &[&str] = &[
    "Dark, impervious surfaces (asphalt, concrete, roofing) absorb solar radiation and re-emit it as heat",
    "Sparse vegetation limits shade and evapotranspiration cooling",
    "Dense buildings trap heat and reduce airflow at street level",
    "Waste heat from vehicles, air conditioning and industry adds to surface warming",
];

const AREA_TERMS: &[&str] = &["area", "location", "where", "place", "neighbourhood", "neighborhood"];
const SOURCE_TERMS: &[&str] = &["data", "source", "satellite", "measured", "dataset"];

/// Produce a fallback answer for `question` from `stats` alone.
pub fn generate(question: &str, stats: &Statistics) -> String {
    let indicators = ClimateIndicators::from_statistics(stats);
    let mut out = key_figures(stats);
    out.push_str("\n\n");

    match classify_question(question) {
        QuestionCategory::Statistical => statistical(&mut out, stats, &indicators),
        QuestionCategory::Comparative => comparative(&mut out, stats),
        QuestionCategory::Technical => technical(&mut out, &indicators),
        QuestionCategory::Actionable => actionable(&mut out, stats),
        QuestionCategory::General if mentions(question, SOURCE_TERMS) => {
            data_source(&mut out, stats)
        }
        QuestionCategory::General if mentions(question, AREA_TERMS) => {
            study_area(&mut out, &indicators)
        }
        QuestionCategory::General => general(&mut out, stats, &indicators),
    }

    out.truncate(out.trim_end().len());
    out
}

fn key_figures(stats: &Statistics) -> String {
    format!(
        "**Key figures**: surface temperatures peak at **{}** and **{}** of the area is classed as hot.",
        fmt_temp(stats.max_temp),
        fmt_pct(stats.hot_pixel_pct)
    )
}

fn statistical(out: &mut String, stats: &Statistics, ind: &ClimateIndicators) {
    let _ = writeln!(out, "**Statistical summary**:");
    let _ = writeln!(out, "- Minimum temperature: {}", fmt_temp(stats.min_temp));
    let _ = writeln!(out, "- Maximum temperature: {}", fmt_temp(stats.max_temp));
    let _ = writeln!(out, "- Mean temperature: {}", fmt_temp(stats.mean_temp));
    let _ = writeln!(out, "- Temperature range: {}", fmt_temp(stats.range_temp));
    let _ = writeln!(out, "- Hot pixels: {}", fmt_pct(stats.hot_pixel_pct));
    let _ = writeln!(out, "- Pixels analysed: {}", stats.total_pixels);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "This corresponds to **{}** with **{}** environmental risk.",
        ind.stress_level, ind.risk_level
    );
}

fn comparative(out: &mut String, stats: &Statistics) {
    let above_mean = stats.max_temp - stats.mean_temp;
    let below_mean = stats.mean_temp - stats.min_temp;
    let _ = writeln!(out, "**Hottest vs coolest zones**:");
    let _ = writeln!(
        out,
        "- The hottest surfaces reach {}, {} above the area average of {}.",
        fmt_temp(stats.max_temp),
        fmt_temp(above_mean),
        fmt_temp(stats.mean_temp)
    );
    let _ = writeln!(
        out,
        "- The coolest surfaces sit at {}, {} below the average.",
        fmt_temp(stats.min_temp),
        fmt_temp(below_mean)
    );
    let _ = writeln!(
        out,
        "- Overall spread between the two extremes: {}.",
        fmt_temp(stats.range_temp)
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Hot-pixel severity is **{}**. Cooler zones usually match vegetation, water or shade, \
         while the hottest match dense built-up surfaces.",
        HotPixelSeverity::from_pct(stats.hot_pixel_pct).as_str()
    );
}

fn technical(out: &mut String, ind: &ClimateIndicators) {
    let _ = writeln!(
        out,
        "**Why some areas run hotter**: the data shows a **{}** urban heat island \
         (intensity {}). Typical drivers:",
        ind.uhi_level,
        fmt_temp(ind.uhi_intensity)
    );
    for driver in HEAT_ISLAND_DRIVERS {
        let _ = writeln!(out, "- {driver}");
    }
}

fn actionable(out: &mut String, stats: &Statistics) {
    let _ = writeln!(out, "**Recommended heat mitigation measures**:");
    for measure in MITIGATION_MEASURES {
        let _ = writeln!(out, "- {measure}");
    }
    if HotPixelSeverity::from_pct(stats.hot_pixel_pct) == HotPixelSeverity::High {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "With more than 30% of the area classed as hot, start with the hottest built-up blocks."
        );
    }
}

fn data_source(out: &mut String, stats: &Statistics) {
    let _ = writeln!(
        out,
        "**Data source**: land surface temperature (LST) is derived from satellite thermal \
         imagery and measures the temperature of the ground surface, not the air."
    );
    let _ = writeln!(out, "- Well suited to locating urban heat islands");
    let _ = writeln!(out, "- Differs from air temperature reported by weather stations");
    let _ = writeln!(
        out,
        "- The current dataset covers {} measurement points",
        stats.total_pixels
    );
}

fn study_area(out: &mut String, ind: &ClimateIndicators) {
    let _ = writeln!(
        out,
        "**Study area**: surface temperatures vary with land use across the area:"
    );
    let _ = writeln!(out, "- Commercial zones and road networks run warmest");
    let _ = writeln!(out, "- Residential areas show mixed patterns");
    let _ = writeln!(out, "- Green spaces and water provide natural cooling");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Overall the area shows a **{}** heat island with **{}** conditions.",
        ind.uhi_level, ind.thermal_comfort
    );
}

fn general(out: &mut String, stats: &Statistics, ind: &ClimateIndicators) {
    let _ = writeln!(out, "**Overview**:");
    let _ = writeln!(
        out,
        "- Temperatures range over {} (from {} to {})",
        fmt_temp(stats.range_temp),
        fmt_temp(stats.min_temp),
        fmt_temp(stats.max_temp)
    );
    let _ = writeln!(out, "- Average temperature: {}", fmt_temp(stats.mean_temp));
    let _ = writeln!(out, "- Heat island level: {}", ind.uhi_level);
    let _ = writeln!(out, "- Thermal comfort: {}", ind.thermal_comfort);
    let _ = writeln!(out, "- Environmental risk: {}", ind.risk_level);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Ask about temperatures, hot spots, comparisons or mitigation measures for more detail."
    );
}
