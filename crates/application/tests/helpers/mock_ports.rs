#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use listwarden_application::ports::{
    FetchOutcome, FetchRequest, FilterContentStore, FilterDescriptor, FilterFetcher,
    FilterListRepository, FilterListSnapshot, LoadedContent, ServingEnginePort,
};
use listwarden_application::services::{FilterActivator, FilterStore, FilteringSettings};
use listwarden_application::use_cases::RefreshFiltersUseCase;
use listwarden_domain::{ContentStats, DomainError, Filter, FilterId, FilterKind};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// Mock FilterContentStore
// ============================================================================

#[derive(Default)]
pub struct MockContentStore {
    files: RwLock<HashMap<FilterId, LoadedContent>>,
    removed: RwLock<Vec<FilterId>>,
    backups_removed: RwLock<Vec<FilterId>>,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, id: FilterId, rule_count: usize, checksum: u32) {
        self.files.write().await.insert(
            id,
            LoadedContent {
                stats: ContentStats {
                    rule_count,
                    checksum,
                    title: None,
                },
                modified: Some(Utc::now()),
            },
        );
    }

    pub async fn has_file(&self, id: FilterId) -> bool {
        self.files.read().await.contains_key(&id)
    }

    pub async fn removed(&self) -> Vec<FilterId> {
        self.removed.read().await.clone()
    }

    pub async fn backups_removed(&self) -> Vec<FilterId> {
        self.backups_removed.read().await.clone()
    }
}

#[async_trait]
impl FilterContentStore for MockContentStore {
    fn content_path(&self, id: FilterId) -> PathBuf {
        PathBuf::from(format!("/data/filters/{}.txt", id))
    }

    async fn load(&self, id: FilterId) -> Result<LoadedContent, DomainError> {
        self.files
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::IoError(format!("{}.txt: no such file", id)))
    }

    async fn remove(&self, id: FilterId) -> Result<(), DomainError> {
        self.files.write().await.remove(&id);
        self.removed.write().await.push(id);
        Ok(())
    }

    async fn remove_backup(&self, id: FilterId) {
        self.backups_removed.write().await.push(id);
    }
}

// ============================================================================
// Mock FilterFetcher
// ============================================================================

#[derive(Clone)]
pub enum MockResponse {
    Content { rule_count: usize, checksum: u32, title: Option<String> },
    Fail(DomainError),
}

pub struct MockFetcher {
    responses: RwLock<HashMap<String, MockResponse>>,
    delay: RwLock<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            delay: RwLock::new(Duration::ZERO),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn serve(&self, url: &str, rule_count: usize, checksum: u32) {
        self.responses.write().await.insert(
            url.to_string(),
            MockResponse::Content {
                rule_count,
                checksum,
                title: None,
            },
        );
    }

    pub async fn serve_titled(&self, url: &str, rule_count: usize, checksum: u32, title: &str) {
        self.responses.write().await.insert(
            url.to_string(),
            MockResponse::Content {
                rule_count,
                checksum,
                title: Some(title.to_string()),
            },
        );
    }

    pub async fn fail(&self, url: &str, error: DomainError) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), MockResponse::Fail(error));
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FilterFetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().await.get(request.url.as_ref()).cloned();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match response {
            Some(MockResponse::Content {
                rule_count,
                checksum,
                title,
            }) => {
                if request.checksum == Some(checksum) {
                    Ok(FetchOutcome::Unchanged)
                } else {
                    Ok(FetchOutcome::Changed(ContentStats {
                        rule_count,
                        checksum,
                        title,
                    }))
                }
            }
            Some(MockResponse::Fail(e)) => Err(e),
            None => Err(DomainError::HttpStatus(404)),
        }
    }
}

// ============================================================================
// Mock ServingEnginePort
// ============================================================================

#[derive(Debug, Clone)]
pub struct Activation {
    pub blocklists: Vec<FilterDescriptor>,
    pub allowlists: Vec<FilterDescriptor>,
    pub run_async: bool,
}

#[derive(Default)]
pub struct MockServingEngine {
    activations: RwLock<Vec<Activation>>,
}

impl MockServingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn activations(&self) -> Vec<Activation> {
        self.activations.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.activations.read().await.len()
    }
}

#[async_trait]
impl ServingEnginePort for MockServingEngine {
    async fn set_filters(
        &self,
        blocklists: Vec<FilterDescriptor>,
        allowlists: Vec<FilterDescriptor>,
        run_async: bool,
    ) -> Result<(), DomainError> {
        self.activations.write().await.push(Activation {
            blocklists,
            allowlists,
            run_async,
        });
        Ok(())
    }
}

// ============================================================================
// Mock FilterListRepository
// ============================================================================

#[derive(Default)]
pub struct MockFilterListRepository {
    saved: RwLock<Vec<FilterListSnapshot>>,
    settings: RwLock<Option<(bool, u32)>>,
}

impl MockFilterListRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn last(&self) -> Option<FilterListSnapshot> {
        self.saved.read().await.last().cloned()
    }

    pub async fn saves(&self) -> usize {
        self.saved.read().await.len()
    }

    pub async fn saved_settings(&self) -> Option<(bool, u32)> {
        *self.settings.read().await
    }
}

#[async_trait]
impl FilterListRepository for MockFilterListRepository {
    async fn save(&self, snapshot: &FilterListSnapshot) -> Result<(), DomainError> {
        self.saved.write().await.push(snapshot.clone());
        Ok(())
    }

    async fn save_settings(&self, enabled: bool, update_interval_hours: u32) -> Result<(), DomainError> {
        *self.settings.write().await = Some((enabled, update_interval_hours));
        Ok(())
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub fn block(id: FilterId, url: &str) -> Filter {
    Filter::new(id, url.into(), "".into(), true, FilterKind::Blocklist)
}

pub fn allow(id: FilterId, url: &str) -> Filter {
    Filter::new(id, url.into(), "".into(), true, FilterKind::Allowlist)
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::hours(hours)
}

pub struct Harness {
    pub content: Arc<MockContentStore>,
    pub fetcher: Arc<MockFetcher>,
    pub engine: Arc<MockServingEngine>,
    pub repository: Arc<MockFilterListRepository>,
    pub settings: Arc<FilteringSettings>,
    pub store: Arc<FilterStore>,
    pub activator: Arc<FilterActivator>,
    pub refresh: Arc<RefreshFiltersUseCase>,
}

impl Harness {
    pub fn new(blocklists: Vec<Filter>, allowlists: Vec<Filter>) -> Self {
        Self::with_content(Arc::new(MockContentStore::new()), blocklists, allowlists)
    }

    pub fn with_content(
        content: Arc<MockContentStore>,
        blocklists: Vec<Filter>,
        allowlists: Vec<Filter>,
    ) -> Self {
        let fetcher = Arc::new(MockFetcher::new());
        let engine = Arc::new(MockServingEngine::new());
        let repository = Arc::new(MockFilterListRepository::new());
        let settings = Arc::new(FilteringSettings::new(true, 24));
        let store = Arc::new(FilterStore::new(
            content.clone(),
            blocklists,
            allowlists,
            vec!["||custom.example^".to_string()],
        ));
        let activator = Arc::new(FilterActivator::new(
            store.clone(),
            engine.clone(),
            settings.clone(),
        ));
        let refresh = Arc::new(
            RefreshFiltersUseCase::new(
                store.clone(),
                fetcher.clone(),
                content.clone(),
                activator.clone(),
                settings.clone(),
            )
            .with_fetch_concurrency(2),
        );

        Self {
            content,
            fetcher,
            engine,
            repository,
            settings,
            store,
            activator,
            refresh,
        }
    }

    pub async fn filter(&self, url: &str, kind: FilterKind) -> Filter {
        self.store
            .get(url, kind)
            .await
            .unwrap_or_else(|| panic!("no filter with url {}", url))
    }

    pub async fn all_ids(&self) -> HashSet<FilterId> {
        let mut ids: HashSet<FilterId> = self
            .store
            .list(FilterKind::Blocklist)
            .await
            .iter()
            .map(|f| f.id)
            .collect();
        ids.extend(self.store.list(FilterKind::Allowlist).await.iter().map(|f| f.id));
        ids
    }
}
