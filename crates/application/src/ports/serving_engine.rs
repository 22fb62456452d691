use async_trait::async_trait;
use listwarden_domain::{DomainError, FilterId};
use std::path::PathBuf;
use std::sync::Arc;

/// Where the serving engine reads a filter's rules from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSource {
    /// Rules held in memory (the user filter).
    Inline(Arc<str>),
    /// Rules in a content file that is only ever replaced by rename.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub id: FilterId,
    pub source: FilterSource,
}

/// Port to the DNS-time matching engine.
///
/// `set_filters` replaces the active filter set. The engine keeps serving
/// the previous set until the new one is fully installed. With
/// `run_async` the call may return before installation finishes.
#[async_trait]
pub trait ServingEnginePort: Send + Sync {
    async fn set_filters(
        &self,
        blocklists: Vec<FilterDescriptor>,
        allowlists: Vec<FilterDescriptor>,
        run_async: bool,
    ) -> Result<(), DomainError>;
}
