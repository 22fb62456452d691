#![allow(dead_code)]

use async_trait::async_trait;
use listwarden_application::ports::{
    FetchOutcome, FetchRequest, FilterContentStore, FilterDescriptor, FilterFetcher,
    LoadedContent, ServingEnginePort,
};
use listwarden_application::services::{FilterActivator, FilterStore, FilteringSettings};
use listwarden_application::use_cases::RefreshFiltersUseCase;
use listwarden_domain::{ContentStats, DomainError, Filter, FilterId, FilterKind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Mock FilterFetcher
// ============================================================================

/// Serves every URL with fresh content, or fails every request.
#[derive(Default)]
pub struct MockFetcher {
    offline: AtomicBool,
    calls: AtomicUsize,
    next_checksum: AtomicU32,
}

impl MockFetcher {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FilterFetcher for MockFetcher {
    async fn fetch(&self, _request: &FetchRequest) -> Result<FetchOutcome, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(DomainError::FetchFailed("network unreachable".to_string()));
        }
        let checksum = self.next_checksum.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(FetchOutcome::Changed(ContentStats {
            rule_count: 10,
            checksum,
            title: None,
        }))
    }
}

// ============================================================================
// Mock FilterContentStore / ServingEnginePort
// ============================================================================

#[derive(Default)]
pub struct NullContentStore;

#[async_trait]
impl FilterContentStore for NullContentStore {
    fn content_path(&self, id: FilterId) -> PathBuf {
        PathBuf::from(format!("/data/filters/{}.txt", id))
    }

    async fn load(&self, id: FilterId) -> Result<LoadedContent, DomainError> {
        Err(DomainError::IoError(format!("{}.txt: no such file", id)))
    }

    async fn remove(&self, _id: FilterId) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_backup(&self, _id: FilterId) {}
}

#[derive(Default)]
pub struct CountingEngine {
    activations: AtomicUsize,
}

impl CountingEngine {
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServingEnginePort for CountingEngine {
    async fn set_filters(
        &self,
        _blocklists: Vec<FilterDescriptor>,
        _allowlists: Vec<FilterDescriptor>,
        _run_async: bool,
    ) -> Result<(), DomainError> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub fetcher: Arc<MockFetcher>,
    pub engine: Arc<CountingEngine>,
    pub settings: Arc<FilteringSettings>,
    pub refresh: Arc<RefreshFiltersUseCase>,
}

impl Harness {
    /// One block-list and one allow-list filter, both never downloaded.
    pub fn new(update_interval_hours: u32) -> Self {
        let fetcher = Arc::new(MockFetcher::default());
        let engine = Arc::new(CountingEngine::default());
        let content = Arc::new(NullContentStore);
        let settings = Arc::new(FilteringSettings::new(true, update_interval_hours));
        let store = Arc::new(FilterStore::new(
            content.clone(),
            vec![Filter::new(1, "http://x/block.txt".into(), "".into(), true, FilterKind::Blocklist)],
            vec![Filter::new(2, "http://x/allow.txt".into(), "".into(), true, FilterKind::Allowlist)],
            vec![],
        ));
        let activator = Arc::new(FilterActivator::new(store.clone(), engine.clone(), settings.clone()));
        let refresh = Arc::new(RefreshFiltersUseCase::new(
            store,
            fetcher.clone(),
            content,
            activator,
            settings.clone(),
        ));

        Self {
            fetcher,
            engine,
            settings,
            refresh,
        }
    }
}
