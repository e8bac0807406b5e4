// HTTP request handlers
use crate::application::refresh::RefreshScheduler;
use crate::domain::sensor::{SensorInfo, SensorKind};
use crate::infrastructure::chunked_json::stream_from_scheduler;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub window: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    pub window: Option<i64>,
    /// Seconds between refreshes
    pub refresh: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SamplesQuery {
    pub window: Option<i64>,
    pub limit: Option<usize>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Configured alert thresholds
pub async fn get_thresholds(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    json_response(
        state.dashboard_service.thresholds(),
        accepts_brotli(&headers),
    )
    .await
    .into_response()
}

/// Sensor catalogue
pub async fn list_sensors(headers: HeaderMap) -> Response {
    let sensors: Vec<SensorInfo> = SensorKind::ALL.iter().map(|k| k.info()).collect();
    json_response(&sensors, accepts_brotli(&headers))
        .await
        .into_response()
}

/// Run one dashboard cycle
pub async fn get_dashboard(
    headers: HeaderMap,
    Query(query): Query<WindowQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let window = match state.resolve_window(query.window) {
        Ok(window) => window,
        Err(rejection) => return rejection.into_response(),
    };

    let snapshot = state.dashboard_service.run_cycle(window).await;
    json_response(&snapshot, accepts_brotli(&headers))
        .await
        .into_response()
}

/// Stream a fresh snapshot every refresh period until the client disconnects
pub async fn stream_dashboard(
    headers: HeaderMap,
    Query(query): Query<StreamQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let window = match state.resolve_window(query.window) {
        Ok(window) => window,
        Err(rejection) => return rejection.into_response(),
    };
    let period = state.settings.refresh_period(query.refresh);

    let scheduler = RefreshScheduler::new(state.dashboard_service.clone(), window, period);
    let (handle, rx) = scheduler.start();
    stream_from_scheduler(handle, rx, accepts_brotli(&headers)).into_response()
}

/// Raw data view for a single sensor kind
pub async fn sensor_samples(
    Path(kind): Path<String>,
    headers: HeaderMap,
    Query(query): Query<SamplesQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let kind: SensorKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return (StatusCode::NOT_FOUND, format!("{}", e)).into_response(),
    };
    let window = match state.resolve_window(query.window) {
        Ok(window) => window,
        Err(rejection) => return rejection.into_response(),
    };
    let limit = query
        .limit
        .unwrap_or(state.settings.raw_sample_limit)
        .max(1);

    let view = state
        .dashboard_service
        .sensor_samples(kind, window, limit)
        .await;
    json_response(&view, accepts_brotli(&headers))
        .await
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::dashboard_service::tests::StubRepository;
    use crate::domain::thresholds::ThresholdSet;
    use crate::domain::window::Window;
    use crate::infrastructure::config::DashboardSettings;

    fn state(repo: StubRepository) -> Arc<AppState> {
        Arc::new(AppState {
            dashboard_service: DashboardService::new(Arc::new(repo), ThresholdSet::default()),
            settings: DashboardSettings::default(),
            default_window: Window::minutes(60).unwrap(),
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_uses_default_window() {
        let response = get_dashboard(
            HeaderMap::new(),
            Query(WindowQuery::default()),
            State(state(StubRepository::healthy(&[15.0], &[55.0], &[5.0]))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["window_minutes"], 60);
        assert_eq!(body["status"], "attention");
        assert_eq!(body["alerts"][0]["message"], "temperature too low");
        assert_eq!(body["recommendations"][0]["advice"], "warm_up");
        assert_eq!(body["uv"]["field"], "uv_index");
    }

    #[tokio::test]
    async fn test_dashboard_without_data_has_null_statistics() {
        let response = get_dashboard(
            HeaderMap::new(),
            Query(WindowQuery { window: Some(720) }),
            State(state(StubRepository::empty())),
        )
        .await;

        let body = body_json(response).await;
        assert_eq!(body["status"], "optimal");
        assert!(body["temperature"]["statistics"].is_null());
        assert!(body["humidity"]["statistics"].is_null());
        assert!(body["uv"]["statistics"].is_null());
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_window() {
        let response = get_dashboard(
            HeaderMap::new(),
            Query(WindowQuery { window: Some(0) }),
            State(state(StubRepository::empty())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_sensor_is_not_found() {
        let response = sensor_samples(
            Path("pressure".to_string()),
            HeaderMap::new(),
            Query(SamplesQuery::default()),
            State(state(StubRepository::empty())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sensor_samples_respects_limit() {
        let temps: Vec<f64> = (0..20).map(|i| 20.0 + i as f64 / 10.0).collect();
        let response = sensor_samples(
            Path("temperature".to_string()),
            HeaderMap::new(),
            Query(SamplesQuery {
                window: None,
                limit: Some(5),
            }),
            State(state(StubRepository::healthy(&temps, &[], &[]))),
        )
        .await;

        let body = body_json(response).await;
        assert_eq!(body["samples"].as_array().unwrap().len(), 5);
        assert_eq!(body["statistics"]["count"], 20);
        assert_eq!(body["unit"], "°C");
    }

    #[tokio::test]
    async fn test_list_sensors() {
        let body = body_json(list_sensors(HeaderMap::new()).await).await;
        let sensors = body.as_array().unwrap();
        assert_eq!(sensors.len(), 5);
        assert_eq!(sensors[0]["kind"], "temperature");
        assert_eq!(sensors[0]["measurement"], "airSensor");
    }

    #[tokio::test]
    async fn test_thresholds_endpoint() {
        let response =
            get_thresholds(HeaderMap::new(), State(state(StubRepository::empty()))).await;
        let body = body_json(response).await;
        assert_eq!(body["temperature"]["min"], 18.0);
        assert_eq!(body["uv"]["high"], 8.0);
    }
}
