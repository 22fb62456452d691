use listwarden_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{FilterStore, FilteringSettings};
use crate::ports::ServingEnginePort;

/// Pushes the current enabled-filter set to the serving engine.
pub struct FilterActivator {
    store: Arc<FilterStore>,
    engine: Arc<dyn ServingEnginePort>,
    settings: Arc<FilteringSettings>,
}

impl FilterActivator {
    pub fn new(
        store: Arc<FilterStore>,
        engine: Arc<dyn ServingEnginePort>,
        settings: Arc<FilteringSettings>,
    ) -> Self {
        Self {
            store,
            engine,
            settings,
        }
    }

    /// With filtering switched off globally an empty set is pushed.
    #[instrument(skip(self))]
    pub async fn activate(&self, run_async: bool) -> Result<(), DomainError> {
        let (blocklists, allowlists) = if self.settings.filtering_enabled() {
            self.store.activation_set().await
        } else {
            (Vec::new(), Vec::new())
        };

        debug!(
            blocklists = blocklists.len(),
            allowlists = allowlists.len(),
            "Activating filters"
        );

        self.engine
            .set_filters(blocklists, allowlists, run_async)
            .await
    }
}
