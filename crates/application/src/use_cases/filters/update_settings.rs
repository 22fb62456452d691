use listwarden_domain::{validators, DomainError};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::ports::FilterListRepository;
use crate::services::{FilterActivator, FilteringRuntime, FilteringSettings};

/// Change the global filtering switch and the refresh interval.
pub struct UpdateFilteringSettingsUseCase {
    settings: Arc<FilteringSettings>,
    repository: Arc<dyn FilterListRepository>,
    activator: Arc<FilterActivator>,
}

impl UpdateFilteringSettingsUseCase {
    pub fn new(
        settings: Arc<FilteringSettings>,
        repository: Arc<dyn FilterListRepository>,
        activator: Arc<FilterActivator>,
    ) -> Self {
        Self {
            settings,
            repository,
            activator,
        }
    }

    /// # Errors
    ///
    /// * `DomainError::ConfigError` - the interval exceeds the allowed maximum
    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        enabled: Option<bool>,
        update_interval_hours: Option<u32>,
    ) -> Result<FilteringRuntime, DomainError> {
        if let Some(hours) = update_interval_hours {
            validators::validate_update_interval(hours).map_err(DomainError::ConfigError)?;
            self.settings.set_update_interval_hours(hours);
        }

        let mut switched = false;
        if let Some(enabled) = enabled {
            if enabled != self.settings.filtering_enabled() {
                self.settings.set_filtering_enabled(enabled);
                switched = true;
            }
        }

        let current = self.settings.snapshot();
        if let Err(e) = self
            .repository
            .save_settings(current.enabled, current.update_interval_hours)
            .await
        {
            error!(error = %e, "Couldn't save filtering settings");
        }

        if switched {
            self.activator.activate(true).await?;
        }

        info!(
            enabled = current.enabled,
            update_interval_hours = current.update_interval_hours,
            "Filtering settings updated"
        );
        Ok(current)
    }
}
