// Dashboard domain model - everything one refresh cycle hands to the UI
use super::recommendation::{Alert, Evaluation, Recommendation, SystemStatus};
use super::sensor::SensorKind;
use super::statistics::Statistics;
use super::telemetry::{Series, UvSeries};
use super::thresholds::UvLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SensorPanel {
    pub kind: SensorKind,
    pub unit: &'static str,
    pub icon: &'static str,
    pub series: Series,
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UvPanel {
    /// Field the statistics were computed over
    pub field: SensorKind,
    pub icon: &'static str,
    pub rows: UvSeries,
    pub statistics: Option<Statistics>,
    pub level: Option<UvLevel>,
}

/// A sensor kind whose query failed this cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchWarning {
    pub kind: SensorKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub window_minutes: u32,
    pub temperature: SensorPanel,
    pub humidity: SensorPanel,
    pub uv: UvPanel,
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<Alert>,
    pub status: SystemStatus,
    pub warnings: Vec<FetchWarning>,
    /// False when no panel has samples to chart
    pub has_data: bool,
}

impl DashboardSnapshot {
    pub fn new(
        window_minutes: u32,
        temperature: SensorPanel,
        humidity: SensorPanel,
        uv: UvPanel,
        evaluation: Evaluation,
        warnings: Vec<FetchWarning>,
    ) -> Self {
        let status = evaluation.status();
        let has_data =
            !temperature.series.is_empty() || !humidity.series.is_empty() || !uv.rows.is_empty();
        Self {
            generated_at: Utc::now(),
            window_minutes,
            temperature,
            humidity,
            uv,
            recommendations: evaluation.recommendations,
            alerts: evaluation.alerts,
            status,
            warnings,
            has_data,
        }
    }
}

/// Raw data view of a single sensor kind
#[derive(Debug, Clone, Serialize)]
pub struct SensorSamples {
    pub kind: SensorKind,
    pub unit: &'static str,
    pub icon: &'static str,
    pub window_minutes: u32,
    /// Most recent samples, ascending
    pub samples: Series,
    /// Computed over the whole window, not just the returned tail
    pub statistics: Option<Statistics>,
    pub warning: Option<FetchWarning>,
}
