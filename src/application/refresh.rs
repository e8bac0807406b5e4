// Refresh scheduler - periodic dashboard cycles with clean cancellation
use crate::application::dashboard_service::DashboardService;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::window::Window;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};

const SNAPSHOT_BUFFER: usize = 4;

pub struct RefreshScheduler {
    service: DashboardService,
    window: Window,
    period: Duration,
}

/// Controls a running scheduler. Dropping the handle cancels it.
pub struct RefreshHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl RefreshHandle {
    /// Stop future ticks. A cycle already running finishes and is still delivered.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the scheduler task to exit
    pub async fn stopped(&mut self) {
        if let Err(e) = (&mut self.task).await {
            tracing::error!(error = %e, "refresh task ended abnormally");
        }
    }
}

impl RefreshScheduler {
    pub fn new(service: DashboardService, window: Window, period: Duration) -> Self {
        Self {
            service,
            window,
            period,
        }
    }

    /// Spawn the scheduler. The first cycle runs immediately, then once per period.
    pub fn start(self) -> (RefreshHandle, mpsc::Receiver<DashboardSnapshot>) {
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let window = self.window;
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycles = 0u64;

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let snapshot = self.service.run_cycle(self.window).await;
                cycles += 1;

                tokio::select! {
                    biased;
                    sent = tx.send(snapshot) => {
                        if sent.is_err() {
                            tracing::debug!("snapshot receiver dropped");
                            break;
                        }
                    }
                    _ = cancelled.cancelled() => break,
                }
            }

            tracing::info!(cycles, window = %window, "refresh scheduler stopped");
        });

        tracing::info!(
            window = %window,
            period_secs = period.as_secs(),
            "refresh scheduler started"
        );

        let handle = RefreshHandle {
            _guard: token.clone().drop_guard(),
            token,
            task,
        };
        (handle, rx)
    }
}
