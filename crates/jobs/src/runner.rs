use crate::FilterRefreshJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
///
/// # Example
///
/// ```rust,ignore
/// let handles = JobRunner::new()
///     .with_filter_refresh(FilterRefreshJob::new(refresh, settings).with_cancellation(token))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    filter_refresh: Option<FilterRefreshJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            filter_refresh: None,
        }
    }

    pub fn with_filter_refresh(mut self, job: FilterRefreshJob) -> Self {
        self.filter_refresh = Some(job);
        self
    }

    /// Start all registered background jobs. The returned handles finish
    /// once each job observed its cancellation token.
    pub async fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");
        let mut handles = Vec::new();

        if let Some(job) = self.filter_refresh {
            handles.push(Arc::new(job).start().await);
        }

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
