// Repository trait for sensor sample access
use crate::domain::sensor::SensorKind;
use crate::domain::telemetry::{Series, UvSeries};
use crate::domain::window::Window;
use async_trait::async_trait;
use thiserror::Error;

/// Why a query against the time-series store did not complete
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not reach the time-series store: {0}")]
    Connectivity(String),

    #[error("store answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode store response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait SampleRepository: Send + Sync {
    /// Samples of one field over the most recent `window`, ascending by time.
    /// An empty series means the store had no rows, not a failure.
    async fn fetch(&self, kind: SensorKind, window: Window) -> Result<Series, FetchError>;

    /// Both UV fields in one request, outer-joined on timestamp
    async fn fetch_uv(&self, window: Window) -> Result<UvSeries, FetchError>;
}
