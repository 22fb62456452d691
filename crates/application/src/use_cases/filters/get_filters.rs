use listwarden_domain::{Filter, FilterKind};
use std::sync::Arc;

use crate::services::{FilterStore, FilteringSettings};

/// Everything the administrative boundary shows about filtering.
#[derive(Debug, Clone)]
pub struct FiltersOverview {
    pub enabled: bool,
    pub update_interval_hours: u32,
    pub blocklists: Vec<Filter>,
    pub allowlists: Vec<Filter>,
    pub user_rules: Vec<String>,
}

pub struct GetFiltersUseCase {
    store: Arc<FilterStore>,
    settings: Arc<FilteringSettings>,
}

impl GetFiltersUseCase {
    pub fn new(store: Arc<FilterStore>, settings: Arc<FilteringSettings>) -> Self {
        Self { store, settings }
    }

    pub async fn execute(&self) -> FiltersOverview {
        let runtime = self.settings.snapshot();
        let snapshot = self.store.snapshot().await;

        FiltersOverview {
            enabled: runtime.enabled,
            update_interval_hours: runtime.update_interval_hours,
            blocklists: self.store.list(FilterKind::Blocklist).await,
            allowlists: self.store.list(FilterKind::Allowlist).await,
            user_rules: snapshot.user_rules,
        }
    }
}
