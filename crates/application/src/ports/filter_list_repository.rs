use async_trait::async_trait;
use listwarden_domain::{DomainError, FilterEntry};

/// The persisted shape of both filter collections plus the user rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterListSnapshot {
    pub filters: Vec<FilterEntry>,
    pub whitelist_filters: Vec<FilterEntry>,
    pub user_rules: Vec<String>,
}

/// Persists filter subscriptions and the filtering switches after
/// administrative edits.
#[async_trait]
pub trait FilterListRepository: Send + Sync {
    async fn save(&self, snapshot: &FilterListSnapshot) -> Result<(), DomainError>;

    async fn save_settings(&self, enabled: bool, update_interval_hours: u32) -> Result<(), DomainError>;
}
