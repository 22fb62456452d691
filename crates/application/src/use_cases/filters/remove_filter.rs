use listwarden_domain::{DomainError, Filter, FilterKind};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::persist;
use crate::ports::{FilterContentStore, FilterListRepository};
use crate::services::{FilterActivator, FilterStore};

pub struct RemoveFilterUseCase {
    store: Arc<FilterStore>,
    content: Arc<dyn FilterContentStore>,
    repository: Arc<dyn FilterListRepository>,
    activator: Arc<FilterActivator>,
}

impl RemoveFilterUseCase {
    pub fn new(
        store: Arc<FilterStore>,
        content: Arc<dyn FilterContentStore>,
        repository: Arc<dyn FilterListRepository>,
        activator: Arc<FilterActivator>,
    ) -> Self {
        Self {
            store,
            content,
            repository,
            activator,
        }
    }

    /// Unsubscribe and delete the content file.
    ///
    /// The engine is reactivated before the file goes away; an engine still
    /// holding the old file open keeps reading it until it lets go.
    #[instrument(skip(self))]
    pub async fn execute(&self, url: &str, kind: FilterKind) -> Result<Filter, DomainError> {
        let removed = self
            .store
            .remove(url, kind)
            .await
            .ok_or_else(|| DomainError::FilterNotFound(url.to_string()))?;

        persist(&self.store, self.repository.as_ref()).await;
        self.activator.activate(true).await?;

        if let Err(e) = self.content.remove(removed.id).await {
            warn!(filter_id = removed.id, error = %e, "Couldn't remove filter file");
        }

        info!(filter_id = removed.id, url, kind = kind.as_str(), "Filter removed");
        Ok(removed)
    }
}
