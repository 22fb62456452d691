use crate::backoff::RefreshBackoff;
use listwarden_application::services::FilteringSettings;
use listwarden_application::use_cases::RefreshFiltersUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Background loop driving scheduled filter refreshes.
///
/// The first cycle runs right away. The pause before the next one comes
/// from `RefreshBackoff`, so a failing network is retried quickly at first
/// and then less and less often.
pub struct FilterRefreshJob {
    refresh: Arc<RefreshFiltersUseCase>,
    settings: Arc<FilteringSettings>,
    backoff: RefreshBackoff,
    shutdown: CancellationToken,
}

impl FilterRefreshJob {
    pub fn new(refresh: Arc<RefreshFiltersUseCase>, settings: Arc<FilteringSettings>) -> Self {
        Self {
            refresh,
            settings,
            backoff: RefreshBackoff::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_backoff(mut self, backoff: RefreshBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Run one cycle (unless periodic refresh is disabled) and return the
    /// delay before the next.
    pub async fn tick(&self, backoff: &mut RefreshBackoff) -> Duration {
        if self.settings.update_interval_hours() == 0 {
            debug!("FilterRefreshJob: periodic refresh disabled");
            return backoff.record(None);
        }

        let outcome = self.refresh.run_scheduled().await;
        match &outcome {
            Some(summary) if summary.network_error => {
                warn!("FilterRefreshJob: no filter could be downloaded")
            }
            Some(summary) if summary.updated > 0 => {
                info!(updated = summary.updated, "FilterRefreshJob: filters updated")
            }
            _ => {}
        }
        backoff.record(outcome.as_ref())
    }

    pub async fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            initial_delay_secs = self.backoff.current().as_secs(),
            "Starting filter refresh job"
        );

        tokio::spawn(async move {
            let mut backoff = self.backoff;

            loop {
                if self.shutdown.is_cancelled() {
                    break;
                }

                let delay = self.tick(&mut backoff).await;
                debug!(delay_secs = delay.as_secs(), "FilterRefreshJob: next cycle scheduled");

                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            info!("FilterRefreshJob: shutting down");
        })
    }
}
