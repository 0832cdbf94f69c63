//! Climate indicators derived from temperature statistics.

use serde::Serialize;

use crate::types::Statistics;

/// Qualitative labels for a statistics record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateIndicators {
    /// Urban heat island intensity, `max - min` in °C.
    pub uhi_intensity: f64,
    pub uhi_level: &'static str,
    pub stress_level: &'static str,
    pub thermal_comfort: &'static str,
    pub risk_level: &'static str,
}

impl ClimateIndicators {
    pub fn from_statistics(stats: &Statistics) -> Self {
        let uhi_intensity = stats.max_temp - stats.min_temp;
        Self {
            uhi_intensity,
            uhi_level: uhi_level(uhi_intensity),
            stress_level: stress_level(stats.mean_temp),
            thermal_comfort: thermal_comfort(stats.mean_temp),
            risk_level: risk_level(stats),
        }
    }
}

fn uhi_level(intensity: f64) -> &'static str {
    if intensity > 10.0 {
        "Very Strong"
    } else if intensity > 7.0 {
        "Strong"
    } else if intensity > 5.0 {
        "Moderate"
    } else if intensity > 3.0 {
        "Weak"
    } else {
        "Very Weak"
    }
}

fn stress_level(mean: f64) -> &'static str {
    if mean > 35.0 {
        "Extreme Heat Stress"
    } else if mean > 30.0 {
        "High Heat Stress"
    } else if mean > 25.0 {
        "Moderate Heat Stress"
    } else if mean > 20.0 {
        "Low Heat Stress"
    } else {
        "No Heat Stress"
    }
}

fn thermal_comfort(mean: f64) -> &'static str {
    if (18.0..=24.0).contains(&mean) {
        "Optimal Comfort"
    } else if (15.0..18.0).contains(&mean) || (mean > 24.0 && mean <= 27.0) {
        "Acceptable Comfort"
    } else if (12.0..15.0).contains(&mean) || (mean > 27.0 && mean <= 30.0) {
        "Slight Discomfort"
    } else {
        "Significant Discomfort"
    }
}

fn risk_level(stats: &Statistics) -> &'static str {
    let mut points = 0;

    points += match stats.max_temp {
        t if t > 40.0 => 3,
        t if t > 35.0 => 2,
        t if t > 30.0 => 1,
        _ => 0,
    };
    points += match stats.range_temp {
        r if r > 15.0 => 2,
        r if r > 10.0 => 1,
        _ => 0,
    };
    points += match stats.hot_pixel_pct {
        p if p > 30.0 => 2,
        p if p > 10.0 => 1,
        _ => 0,
    };

    match points {
        p if p >= 5 => "High Risk",
        p if p >= 3 => "Moderate Risk",
        p if p >= 1 => "Low Risk",
        _ => "Minimal Risk",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(min: f64, max: f64, mean: f64, pct: f64) -> Statistics {
        Statistics {
            min_temp: min,
            max_temp: max,
            mean_temp: mean,
            range_temp: max - min,
            hot_pixel_pct: pct,
            total_pixels: 1_000,
        }
    }

    #[test]
    fn hot_city_indicators() {
        let ind = ClimateIndicators::from_statistics(&stats(18.2, 41.7, 27.9, 34.2));
        assert_eq!(ind.uhi_level, "Very Strong");
        assert_eq!(ind.stress_level, "Moderate Heat Stress");
        assert_eq!(ind.thermal_comfort, "Slight Discomfort");
        assert_eq!(ind.risk_level, "High Risk");
    }

    #[test]
    fn mild_area_indicators() {
        let ind = ClimateIndicators::from_statistics(&stats(19.0, 22.0, 20.5, 2.0));
        assert_eq!(ind.uhi_level, "Very Weak");
        assert_eq!(ind.stress_level, "Low Heat Stress");
        assert_eq!(ind.thermal_comfort, "Optimal Comfort");
        assert_eq!(ind.risk_level, "Minimal Risk");
    }

    #[test]
    fn comfort_band_edges() {
        assert_eq!(thermal_comfort(24.0), "Optimal Comfort");
        assert_eq!(thermal_comfort(24.5), "Acceptable Comfort");
        assert_eq!(thermal_comfort(14.0), "Slight Discomfort");
        assert_eq!(thermal_comfort(31.0), "Significant Discomfort");
        assert_eq!(thermal_comfort(5.0), "Significant Discomfort");
    }
}
