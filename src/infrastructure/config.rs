use crate::domain::thresholds::{ConfigError, ThresholdSet};
use crate::domain::window::{InvalidWindow, Window};
use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "GARDEN";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub influx: InfluxSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub thresholds: ThresholdSet,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub default_window_minutes: u32,
    pub default_refresh_secs: u64,
    pub min_refresh_secs: u64,
    pub max_refresh_secs: u64,
    pub raw_sample_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_window_minutes: 60,
            default_refresh_secs: 30,
            min_refresh_secs: 10,
            max_refresh_secs: 60,
            raw_sample_limit: 50,
        }
    }
}

impl DashboardSettings {
    pub fn default_window(&self) -> Result<Window, InvalidWindow> {
        Window::minutes(self.default_window_minutes)
    }

    /// Clamp a requested refresh period into the configured bounds
    pub fn refresh_period(&self, requested_secs: Option<u64>) -> Duration {
        let secs = requested_secs
            .unwrap_or(self.default_refresh_secs)
            .clamp(self.min_refresh_secs, self.max_refresh_secs);
        Duration::from_secs(secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.default_window().map_err(|e| ConfigError::InvalidSetting {
            name: "dashboard.default_window_minutes",
            message: e.to_string(),
        })?;
        if self.min_refresh_secs == 0 || self.min_refresh_secs > self.max_refresh_secs {
            return Err(ConfigError::InvalidSetting {
                name: "dashboard.min_refresh_secs",
                message: format!(
                    "refresh bounds must satisfy 0 < min <= max, got {}..{}",
                    self.min_refresh_secs, self.max_refresh_secs
                ),
            });
        }
        if self.raw_sample_limit == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "dashboard.raw_sample_limit",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl AppConfig {
    /// Reject settings the dashboard cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.influx.bucket.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "influx.bucket",
                message: "must not be empty".to_string(),
            });
        }
        self.thresholds.validate()?;
        self.dashboard.validate()
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Load `config/dashboard.*`, then apply `GARDEN__SECTION__KEY` overrides
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?;

    let app_config: AppConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;
    app_config.validate()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [influx]
        url = "http://localhost:8086"
        token = "dev-token"
        org = "garden"
        bucket = "homeiot"

        [dashboard]
        default_window_minutes = 120

        [thresholds.uv]
        low = 2
        moderate = 5
        high = 7
        very_high = 10
    "#;

    fn from_toml(source: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let cfg = from_toml(SAMPLE);
        assert_eq!(cfg.influx.timeout_secs, 10);
        assert_eq!(cfg.server.bind.port(), 8080);
        assert_eq!(cfg.dashboard.default_window().unwrap().as_minutes(), 120);
        assert_eq!(cfg.dashboard.raw_sample_limit, 50);
        assert_eq!(cfg.thresholds.uv.high, 7.0);
        assert_eq!(cfg.thresholds.temperature.min, 18.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_refresh_period_is_clamped() {
        let settings = DashboardSettings::default();
        assert_eq!(settings.refresh_period(None), Duration::from_secs(30));
        assert_eq!(settings.refresh_period(Some(1)), Duration::from_secs(10));
        assert_eq!(settings.refresh_period(Some(600)), Duration::from_secs(60));
        assert_eq!(settings.refresh_period(Some(45)), Duration::from_secs(45));
    }

    #[test]
    fn test_misordered_thresholds_fail_validation() {
        let mut cfg = from_toml(SAMPLE);
        cfg.thresholds.temperature.max = 12.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOrder { kind: "temperature", .. })
        ));
    }

    #[test]
    fn test_zero_window_fails_validation() {
        let mut cfg = from_toml(SAMPLE);
        cfg.dashboard.default_window_minutes = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSetting { name: "dashboard.default_window_minutes", .. })
        ));
    }

    #[test]
    fn test_inverted_refresh_bounds_fail_validation() {
        let mut cfg = from_toml(SAMPLE);
        cfg.dashboard.min_refresh_secs = 90;
        assert!(cfg.validate().is_err());
    }
}
