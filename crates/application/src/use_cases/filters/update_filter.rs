use listwarden_domain::{
    validators, DomainError, FilterKind, FilterProperties, PropertyChange, RefreshFlags,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::persist;
use crate::ports::FilterListRepository;
use crate::services::{FilterActivator, FilterStore};
use crate::use_cases::RefreshFiltersUseCase;

/// Edit a filter's URL, name or enabled state.
pub struct UpdateFilterUseCase {
    store: Arc<FilterStore>,
    repository: Arc<dyn FilterListRepository>,
    activator: Arc<FilterActivator>,
    refresh: Arc<RefreshFiltersUseCase>,
}

impl UpdateFilterUseCase {
    pub fn new(
        store: Arc<FilterStore>,
        repository: Arc<dyn FilterListRepository>,
        activator: Arc<FilterActivator>,
        refresh: Arc<RefreshFiltersUseCase>,
    ) -> Self {
        Self {
            store,
            repository,
            activator,
            refresh,
        }
    }

    /// # Errors
    ///
    /// * `DomainError::FilterNotFound` - no filter with `url` in `kind`
    /// * `DomainError::UrlAlreadyExists` - the new URL is used by another filter
    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        url: &str,
        props: FilterProperties,
        kind: FilterKind,
    ) -> Result<PropertyChange, DomainError> {
        validators::validate_url(&props.url).map_err(DomainError::InvalidUrl)?;
        validators::validate_filter_name(&props.name).map_err(DomainError::InvalidFilterName)?;

        let new_url = props.url.clone();
        let change = self.store.set_properties(url, props, kind).await;

        if change.url_exists {
            return Err(DomainError::UrlAlreadyExists(new_url.to_string()));
        }
        if !change.found {
            return Err(DomainError::FilterNotFound(url.to_string()));
        }

        persist(&self.store, self.repository.as_ref()).await;

        let mut activated = false;
        if change.update_required {
            // The invalidated filter is due; nothing else is forced. Refreshing
            // reactivates on its own when content changed.
            let updated = self.refresh.execute(RefreshFlags::only(kind), true).await?;
            activated = updated > 0;
        }

        if change.needs_activation() && !activated {
            self.activator.activate(true).await?;
        }

        info!(url, new_url = %new_url, ?change, "Filter properties updated");
        Ok(change)
    }
}
