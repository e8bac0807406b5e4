// Dashboard service - one fetch, summarize, evaluate cycle
use crate::application::sample_repository::SampleRepository;
use crate::domain::dashboard::{
    DashboardSnapshot, FetchWarning, SensorPanel, SensorSamples, UvPanel,
};
use crate::domain::recommendation::evaluate;
use crate::domain::sensor::SensorKind;
use crate::domain::statistics::summarize;
use crate::domain::telemetry::{Series, UvSeries};
use crate::domain::thresholds::ThresholdSet;
use crate::domain::window::Window;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn SampleRepository>,
    thresholds: ThresholdSet,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn SampleRepository>, thresholds: ThresholdSet) -> Self {
        Self {
            repository,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Run a full cycle for `window`.
    ///
    /// Queries run one after another. A failed query is reported as a warning
    /// for that sensor kind and the rest of the snapshot is still built.
    pub async fn run_cycle(&self, window: Window) -> DashboardSnapshot {
        let started = Instant::now();
        let mut warnings = Vec::new();

        let temperature = self
            .fetch_series(SensorKind::Temperature, window, &mut warnings)
            .await;
        let humidity = self
            .fetch_series(SensorKind::Humidity, window, &mut warnings)
            .await;
        let uv_rows = self.fetch_uv(window, &mut warnings).await;

        let temperature = self.panel(SensorKind::Temperature, temperature);
        let humidity = self.panel(SensorKind::Humidity, humidity);
        let uv = self.uv_panel(uv_rows);

        let evaluation = evaluate(
            temperature.statistics.as_ref(),
            humidity.statistics.as_ref(),
            uv.statistics.as_ref(),
            &self.thresholds,
        );

        let snapshot = DashboardSnapshot::new(
            window.as_minutes(),
            temperature,
            humidity,
            uv,
            evaluation,
            warnings,
        );

        tracing::info!(
            window = %window,
            alerts = snapshot.alerts.len(),
            status = ?snapshot.status,
            warnings = snapshot.warnings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dashboard cycle complete"
        );

        snapshot
    }

    /// Most recent `limit` samples of one kind, with statistics over the whole window
    pub async fn sensor_samples(
        &self,
        kind: SensorKind,
        window: Window,
        limit: usize,
    ) -> SensorSamples {
        let mut warnings = Vec::new();
        let series = self.fetch_series(kind, window, &mut warnings).await;
        let info = kind.info();

        SensorSamples {
            kind,
            unit: info.unit,
            icon: info.icon,
            window_minutes: window.as_minutes(),
            statistics: summarize(series.values()),
            samples: series.tail(limit),
            warning: warnings.pop(),
        }
    }

    async fn fetch_series(
        &self,
        kind: SensorKind,
        window: Window,
        warnings: &mut Vec<FetchWarning>,
    ) -> Series {
        match self.repository.fetch(kind, window).await {
            Ok(series) => {
                tracing::debug!(kind = %kind, samples = series.len(), "fetched series");
                series
            }
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "sensor query failed");
                warnings.push(FetchWarning {
                    kind,
                    message: e.to_string(),
                });
                Series::empty()
            }
        }
    }

    async fn fetch_uv(&self, window: Window, warnings: &mut Vec<FetchWarning>) -> UvSeries {
        match self.repository.fetch_uv(window).await {
            Ok(rows) => {
                tracing::debug!(rows = rows.rows().len(), "fetched uv rows");
                rows
            }
            Err(e) => {
                tracing::warn!(kind = "uv", error = %e, "sensor query failed");
                warnings.push(FetchWarning {
                    kind: SensorKind::UvIndex,
                    message: e.to_string(),
                });
                UvSeries::empty()
            }
        }
    }

    fn panel(&self, kind: SensorKind, series: Series) -> SensorPanel {
        let info = kind.info();
        SensorPanel {
            kind,
            unit: info.unit,
            icon: info.icon,
            statistics: summarize(series.values()),
            series,
        }
    }

    fn uv_panel(&self, rows: UvSeries) -> UvPanel {
        let field = rows.preferred_field();
        let statistics = summarize(rows.values(field));
        // raw readings are not on the index scale
        let level = match field {
            SensorKind::UvIndex => statistics.map(|s| self.thresholds.uv.level(s.max)),
            _ => None,
        };

        UvPanel {
            field,
            icon: field.info().icon,
            rows,
            statistics,
            level,
        }
    }
}
