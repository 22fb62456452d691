use chrono::Utc;
use futures::stream::{self, StreamExt};
use listwarden_domain::{DomainError, FilterKind, RefreshFlags, RefreshSummary};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::ports::{FetchOutcome, FetchRequest, FilterContentStore, FilterFetcher};
use crate::services::{FetchResult, FilterActivator, FilterStore, FilteringSettings};

/// Outcome of refreshing one collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionRefresh {
    /// Filters whose content changed and was committed.
    pub updated: usize,
    /// Filters that were due and attempted.
    pub attempted: Vec<FetchRequest>,
    /// Per attempted filter: whether its content changed.
    pub changed: Vec<bool>,
    /// Every attempted fetch failed.
    pub network_error: bool,
}

/// Clears the running flag when a cycle ends, however it ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Refresh orchestrator with single-flight control.
///
/// Two primitives compose: `running` is a non-blocking advisory flag that
/// lets plain requests fail fast, and `refresh_lock` serializes the body of
/// every cycle. Important requests skip the flag and queue on the lock, so at
/// most one cycle body runs at a time.
pub struct RefreshFiltersUseCase {
    store: Arc<FilterStore>,
    fetcher: Arc<dyn FilterFetcher>,
    content: Arc<dyn FilterContentStore>,
    activator: Arc<FilterActivator>,
    settings: Arc<FilteringSettings>,
    fetch_concurrency: usize,
    running: AtomicBool,
    refresh_lock: Mutex<()>,
    shutdown: CancellationToken,
}

impl RefreshFiltersUseCase {
    pub fn new(
        store: Arc<FilterStore>,
        fetcher: Arc<dyn FilterFetcher>,
        content: Arc<dyn FilterContentStore>,
        activator: Arc<FilterActivator>,
        settings: Arc<FilteringSettings>,
    ) -> Self {
        Self {
            store,
            fetcher,
            content,
            activator,
            settings,
            fetch_concurrency: 1,
            running: AtomicBool::new(false),
            refresh_lock: Mutex::new(()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    /// Stop starting new downloads once `token` is cancelled. Downloads
    /// already in flight finish normally.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Manual refresh. Returns the number of filters whose content changed.
    ///
    /// A plain request fails with `RefreshInProgress` while another cycle is
    /// running; an `important` one waits for it and then runs.
    #[instrument(skip(self))]
    pub async fn execute(&self, flags: RefreshFlags, important: bool) -> Result<usize, DomainError> {
        let claimed = self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !claimed && !important {
            return Err(DomainError::RefreshInProgress);
        }

        let _lock = self.refresh_lock.lock().await;
        self.running.store(true, Ordering::Release);
        let _guard = RunningGuard(&self.running);

        let summary = self.refresh_if_necessary(flags).await;
        Ok(summary.updated)
    }

    /// Scheduled refresh of both collections, expiry-gated.
    ///
    /// Returns `None` without doing anything if a cycle is already running.
    pub async fn run_scheduled(&self) -> Option<RefreshSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Filter refresh already running, skipping scheduled cycle");
            return None;
        }

        let _lock = self.refresh_lock.lock().await;
        let _guard = RunningGuard(&self.running);

        Some(self.refresh_if_necessary(RefreshFlags::all()).await)
    }

    /// One refresh cycle over the collections selected by `flags`.
    ///
    /// Reactivates the serving engine only if some filter changed, then drops
    /// the `.old` backups of changed filters. `network_error` is set only if
    /// both collections were attempted and both failed entirely.
    pub async fn refresh_if_necessary(&self, flags: RefreshFlags) -> RefreshSummary {
        debug!("Filters: updating...");

        let mut updated = 0;
        let mut changed_ids = Vec::new();
        let mut block_failed = false;
        let mut allow_failed = false;

        for kind in [FilterKind::Blocklist, FilterKind::Allowlist] {
            if !flags.includes(kind) {
                continue;
            }

            let result = self.refresh_collection(kind, flags.force).await;
            match kind {
                FilterKind::Blocklist => block_failed = result.network_error,
                FilterKind::Allowlist => allow_failed = result.network_error,
            }

            updated += result.updated;
            changed_ids.extend(
                result
                    .attempted
                    .iter()
                    .zip(&result.changed)
                    .filter(|(_, changed)| **changed)
                    .map(|(req, _)| req.id),
            );
        }

        if block_failed && allow_failed {
            warn!("Filters: every download failed");
            return RefreshSummary {
                updated: 0,
                network_error: true,
            };
        }

        if updated > 0 {
            if let Err(e) = self.activator.activate(false).await {
                error!(error = %e, "Couldn't activate updated filters");
            }
            for id in changed_ids {
                self.content.remove_backup(id).await;
            }
        }

        debug!(updated, "Filters: update finished");
        RefreshSummary {
            updated,
            network_error: false,
        }
    }

    /// Fetch every due filter of `kind` and commit the successes.
    ///
    /// The store lock is held only while snapshotting and while committing,
    /// never across network I/O. Failed filters keep their metadata and are
    /// retried next cycle.
    pub async fn refresh_collection(&self, kind: FilterKind, force: bool) -> CollectionRefresh {
        let requests = self
            .store
            .due_for_refresh(kind, force, self.settings.update_interval_hours(), Utc::now())
            .await;

        if requests.is_empty() {
            return CollectionRefresh::default();
        }

        let fetcher = &self.fetcher;
        let shutdown = &self.shutdown;
        let outcomes: Vec<_> = stream::iter(requests.iter().cloned())
            .map(|request| async move {
                let outcome = if shutdown.is_cancelled() {
                    Err(DomainError::FetchFailed("shutting down".to_string()))
                } else {
                    fetcher.fetch(&request).await
                };
                (outcome, Utc::now())
            })
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        let mut failed = 0;
        let mut results = Vec::with_capacity(requests.len());
        let mut changed = Vec::with_capacity(requests.len());

        for (request, (outcome, fetched_at)) in requests.iter().zip(outcomes) {
            match outcome {
                Ok(outcome) => {
                    changed.push(outcome.is_changed());
                    results.push(FetchResult {
                        request: request.clone(),
                        outcome,
                        fetched_at,
                    });
                }
                Err(e) => {
                    failed += 1;
                    changed.push(false);
                    warn!(
                        filter_id = request.id,
                        url = %request.url,
                        error = %e,
                        "Failed to update filter"
                    );
                }
            }
        }

        if failed == requests.len() {
            return CollectionRefresh {
                network_error: true,
                ..CollectionRefresh::default()
            };
        }

        let updated = self.store.commit(kind, &results).await;
        if updated > 0 {
            info!(kind = kind.as_str(), updated, "Filters updated");
        }

        CollectionRefresh {
            updated,
            attempted: requests,
            changed,
            network_error: false,
        }
    }
}
