use chrono::Utc;
use listwarden_domain::{validators, DomainError, Filter, FilterKind};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::persist;
use crate::ports::{FetchOutcome, FetchRequest, FilterContentStore, FilterFetcher, FilterListRepository};
use crate::services::{FilterActivator, FilterStore};

/// Subscribe to a new list.
///
/// The list is downloaded before it is added: a filter whose initial load
/// fails is never registered.
pub struct AddFilterUseCase {
    store: Arc<FilterStore>,
    fetcher: Arc<dyn FilterFetcher>,
    content: Arc<dyn FilterContentStore>,
    repository: Arc<dyn FilterListRepository>,
    activator: Arc<FilterActivator>,
}

impl AddFilterUseCase {
    pub fn new(
        store: Arc<FilterStore>,
        fetcher: Arc<dyn FilterFetcher>,
        content: Arc<dyn FilterContentStore>,
        repository: Arc<dyn FilterListRepository>,
        activator: Arc<FilterActivator>,
    ) -> Self {
        Self {
            store,
            fetcher,
            content,
            repository,
            activator,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        url: String,
        name: String,
        kind: FilterKind,
    ) -> Result<Filter, DomainError> {
        validators::validate_url(&url).map_err(DomainError::InvalidUrl)?;
        validators::validate_filter_name(&name).map_err(DomainError::InvalidFilterName)?;

        if self.store.exists(&url).await {
            return Err(DomainError::UrlAlreadyExists(url));
        }

        let id = self.store.next_filter_id().await;
        let request = FetchRequest {
            id,
            url: Arc::from(url.as_str()),
            name: Arc::from(name.as_str()),
            checksum: None,
        };

        let outcome = self.fetcher.fetch(&request).await.map_err(|e| {
            warn!(url = %url, error = %e, "Couldn't fetch new filter");
            DomainError::UpdateFailed(format!("{}: {}", url, e))
        })?;

        let mut filter = Filter::new(id, request.url, request.name, true, kind);
        filter.last_updated = Some(Utc::now());
        if let FetchOutcome::Changed(stats) = &outcome {
            if let Some(title) = &stats.title {
                filter.name = Arc::from(title.as_str());
            }
            filter.apply_stats(stats);
        }

        if !self.store.add(filter.clone()).await {
            // Another request added the same URL while we were downloading.
            if let Err(e) = self.content.remove(id).await {
                warn!(filter_id = id, error = %e, "Couldn't remove orphaned filter file");
            }
            return Err(DomainError::UrlAlreadyExists(url));
        }

        persist(&self.store, self.repository.as_ref()).await;
        self.activator.activate(true).await?;

        info!(
            filter_id = filter.id,
            url = %filter.url,
            rules = filter.rule_count,
            kind = kind.as_str(),
            "Filter added"
        );

        Ok(filter)
    }
}
