// Threshold configuration for alerting
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{kind} thresholds must be strictly increasing ({bounds}), got {values:?}")]
    ThresholdOrder {
        kind: &'static str,
        bounds: &'static str,
        values: [f64; 4],
    },

    #[error("{kind} threshold {name} is not a finite number")]
    NonFinite { kind: &'static str, name: &'static str },

    #[error("invalid setting {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },
}

/// Optimal band with critical outer limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeThresholds {
    pub critical_low: f64,
    pub min: f64,
    pub max: f64,
    pub critical_high: f64,
}

impl RangeThresholds {
    fn validate(&self, kind: &'static str) -> Result<(), ConfigError> {
        let values = [self.critical_low, self.min, self.max, self.critical_high];
        let names = ["critical_low", "min", "max", "critical_high"];
        check_ascending(
            kind,
            "critical_low < min < max < critical_high",
            values,
            names,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvThresholds {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
    pub very_high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let values = [self.low, self.moderate, self.high, self.very_high];
        let names = ["low", "moderate", "high", "very_high"];
        check_ascending("uv", "low < moderate < high < very_high", values, names)
    }

    /// Display tier of a UV reading. Each threshold is the inclusive lower
    /// bound of the next tier.
    pub fn level(&self, value: f64) -> UvLevel {
        if value >= self.very_high {
            UvLevel::Extreme
        } else if value >= self.high {
            UvLevel::VeryHigh
        } else if value >= self.moderate {
            UvLevel::High
        } else if value >= self.low {
            UvLevel::Moderate
        } else {
            UvLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    #[serde(default = "default_temperature")]
    pub temperature: RangeThresholds,
    #[serde(default = "default_humidity")]
    pub humidity: RangeThresholds,
    #[serde(default = "default_uv")]
    pub uv: UvThresholds,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            humidity: default_humidity(),
            uv: default_uv(),
        }
    }
}

impl ThresholdSet {
    /// Check the ordering every alert rule relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.temperature.validate("temperature")?;
        self.humidity.validate("humidity")?;
        self.uv.validate()
    }
}

fn check_ascending(
    kind: &'static str,
    bounds: &'static str,
    values: [f64; 4],
    names: [&'static str; 4],
) -> Result<(), ConfigError> {
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(ConfigError::NonFinite { kind, name: names[idx] });
    }
    if values.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOrder { kind, bounds, values })
    }
}

fn default_temperature() -> RangeThresholds {
    RangeThresholds {
        critical_low: 10.0,
        min: 18.0,
        max: 28.0,
        critical_high: 35.0,
    }
}

fn default_humidity() -> RangeThresholds {
    RangeThresholds {
        critical_low: 20.0,
        min: 40.0,
        max: 80.0,
        critical_high: 90.0,
    }
}

fn default_uv() -> UvThresholds {
    UvThresholds {
        low: 3.0,
        moderate: 6.0,
        high: 8.0,
        very_high: 11.0,
    }
}
