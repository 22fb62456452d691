use crate::filters::content::scan_bytes;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use listwarden_application::ports::{FilterDescriptor, FilterSource, ServingEnginePort};
use listwarden_domain::{DomainError, FilterId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// One installed filter with its rules held by value.
#[derive(Debug, Clone)]
pub struct LoadedFilter {
    pub id: FilterId,
    pub rules: Arc<str>,
    pub rule_count: usize,
}

/// The filter set currently answering DNS queries.
#[derive(Debug, Default)]
pub struct ActiveFilterSet {
    pub generation: u64,
    pub blocklists: Vec<LoadedFilter>,
    pub allowlists: Vec<LoadedFilter>,
}

impl ActiveFilterSet {
    pub fn total_rules(&self) -> usize {
        self.blocklists
            .iter()
            .chain(self.allowlists.iter())
            .map(|f| f.rule_count)
            .sum()
    }
}

/// Serving engine that reads each activation into memory and swaps it in
/// atomically.
///
/// Readers holding the previous set keep it until they drop their guard;
/// content files can therefore be replaced on disk at any time. When
/// several activations overlap, the most recently requested one wins.
pub struct InMemoryServingEngine {
    active: Arc<ArcSwap<ActiveFilterSet>>,
    requested: AtomicU64,
}

impl InMemoryServingEngine {
    pub fn new() -> Self {
        Self {
            active: Arc::new(ArcSwap::from_pointee(ActiveFilterSet::default())),
            requested: AtomicU64::new(0),
        }
    }

    pub fn active(&self) -> Arc<ActiveFilterSet> {
        self.active.load_full()
    }

    async fn build(
        generation: u64,
        blocklists: Vec<FilterDescriptor>,
        allowlists: Vec<FilterDescriptor>,
    ) -> ActiveFilterSet {
        ActiveFilterSet {
            generation,
            blocklists: load_all(blocklists).await,
            allowlists: load_all(allowlists).await,
        }
    }

    fn install(active: &ArcSwap<ActiveFilterSet>, set: ActiveFilterSet) {
        let set = Arc::new(set);
        let previous = active.rcu(|current| {
            if current.generation < set.generation {
                Arc::clone(&set)
            } else {
                Arc::clone(current)
            }
        });

        if previous.generation < set.generation {
            info!(
                generation = set.generation,
                blocklists = set.blocklists.len(),
                allowlists = set.allowlists.len(),
                rules = set.total_rules(),
                "Filter set activated"
            );
        }
    }
}

impl Default for InMemoryServingEngine {
    fn default() -> Self {
        Self::new()
    }
}

async fn load_all(descriptors: Vec<FilterDescriptor>) -> Vec<LoadedFilter> {
    let mut loaded = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let rules: Arc<str> = match descriptor.source {
            FilterSource::Inline(text) => text,
            FilterSource::File(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into(),
                Err(e) => {
                    warn!(id = descriptor.id, path = %path.display(), error = %e, "Filter content unavailable");
                    continue;
                }
            },
        };
        let rule_count = scan_bytes(rules.as_bytes()).rule_count;
        loaded.push(LoadedFilter {
            id: descriptor.id,
            rules,
            rule_count,
        });
    }
    loaded
}

#[async_trait]
impl ServingEnginePort for InMemoryServingEngine {
    async fn set_filters(
        &self,
        blocklists: Vec<FilterDescriptor>,
        allowlists: Vec<FilterDescriptor>,
        run_async: bool,
    ) -> Result<(), DomainError> {
        let generation = self.requested.fetch_add(1, Ordering::SeqCst) + 1;

        if run_async {
            let active = Arc::clone(&self.active);
            tokio::spawn(async move {
                let set = Self::build(generation, blocklists, allowlists).await;
                Self::install(&active, set);
            });
            return Ok(());
        }

        let set = Self::build(generation, blocklists, allowlists).await;
        Self::install(&self.active, set);
        Ok(())
    }
}
