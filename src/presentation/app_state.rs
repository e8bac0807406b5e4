// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::domain::window::Window;
use crate::infrastructure::config::DashboardSettings;
use axum::http::StatusCode;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub settings: DashboardSettings,
    pub default_window: Window,
}

impl AppState {
    /// Requested window, or the configured default when absent
    pub fn resolve_window(&self, requested: Option<i64>) -> Result<Window, (StatusCode, String)> {
        match requested {
            None => Ok(self.default_window),
            Some(minutes) => {
                Window::try_from(minutes).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
            }
        }
    }
}
