//! Temperature statistics supplied by the data-loading collaborator

use serde::{Deserialize, Serialize};

use crate::{AdvisorError, Result};

/// Summary statistics of one land-surface-temperature raster.
///
/// Temperatures are in °C. `hot_pixel_pct` is the share of pixels above the
/// heat threshold, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(alias = "minTemp")]
    pub min_temp: f64,
    #[serde(alias = "maxTemp")]
    pub max_temp: f64,
    #[serde(alias = "meanTemp")]
    pub mean_temp: f64,
    #[serde(alias = "rangeTemp", alias = "temp_range")]
    pub range_temp: f64,
    #[serde(alias = "hotPixelPct")]
    pub hot_pixel_pct: f64,
    #[serde(alias = "totalPixels")]
    pub total_pixels: u64,
}

impl Statistics {
    /// Parse a statistics record from JSON.
    ///
    /// Missing or mistyped fields are reported as `InvalidInput`, not as a
    /// raw JSON error: there is no answer to give without the data.
    pub fn from_json(json: &str) -> Result<Self> {
        let stats: Statistics = serde_json::from_str(json)
            .map_err(|e| AdvisorError::InvalidInput(format!("statistics: {e}")))?;
        stats.validate()?;
        Ok(stats)
    }

    /// Check that the record is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let temps = [
            ("min_temp", self.min_temp),
            ("max_temp", self.max_temp),
            ("mean_temp", self.mean_temp),
            ("range_temp", self.range_temp),
            ("hot_pixel_pct", self.hot_pixel_pct),
        ];
        if let Some((name, _)) = temps.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} is not a finite number")));
        }
        if self.min_temp > self.max_temp {
            return Err(invalid(format!(
                "min_temp ({}) exceeds max_temp ({})",
                self.min_temp, self.max_temp
            )));
        }
        if self.mean_temp < self.min_temp || self.mean_temp > self.max_temp {
            return Err(invalid(format!(
                "mean_temp ({}) outside [{}, {}]",
                self.mean_temp, self.min_temp, self.max_temp
            )));
        }
        if self.range_temp < 0.0 {
            return Err(invalid("range_temp is negative".to_string()));
        }
        if !(0.0..=100.0).contains(&self.hot_pixel_pct) {
            return Err(invalid(format!(
                "hot_pixel_pct ({}) outside [0, 100]",
                self.hot_pixel_pct
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> AdvisorError {
    AdvisorError::InvalidInput(format!("statistics: {msg}"))
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
    fn sample_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_nan() {
        let stats = Statistics {
            mean_temp: f64::NAN,
            ..sample()
        };
        let err = stats.validate().unwrap_err().to_string();
        assert!(err.contains("mean_temp"));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let stats = Statistics {
            min_temp: 50.0,
            ..sample()
        };
        assert!(matches!(
            stats.validate(),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_percentage_out_of_range() {
        let stats = Statistics {
            hot_pixel_pct: 100.5,
            ..sample()
        };
        assert!(stats.validate().is_err());
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"{"minTemp":18.2,"maxTemp":41.7,"meanTemp":27.9,
            "rangeTemp":23.5,"hotPixelPct":34.2,"totalPixels":125000}"#;
        assert_eq!(Statistics::from_json(json).unwrap(), sample());
    }

    #[test]
    fn missing_field_is_invalid_input() {
        let json = r#"{"min_temp":18.2,"max_temp":41.7}"#;
        let err = Statistics::from_json(json).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(_)));
        assert!(err.to_string().contains("mean_temp"));
    }
}
