use super::UseCases;
use listwarden_application::ports::{FilterContentStore, FilterFetcher, FilterListRepository};
use listwarden_application::services::{FilterActivator, FilterStore, FilteringSettings};
use listwarden_application::use_cases::RefreshFiltersUseCase;
use listwarden_domain::Config;
use listwarden_infrastructure::engine::InMemoryServingEngine;
use listwarden_infrastructure::filters::{
    DiskFilterContentStore, FilterDirectory, HttpFilterFetcher, TomlFilterListRepository,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Every long-lived component of the filter-list lifecycle, wired together.
pub struct FilteringServices {
    pub settings: Arc<FilteringSettings>,
    pub store: Arc<FilterStore>,
    pub engine: Arc<InMemoryServingEngine>,
    pub activator: Arc<FilterActivator>,
    pub refresh: Arc<RefreshFiltersUseCase>,
    pub repository: Arc<dyn FilterListRepository>,
    pub use_cases: UseCases,
}

impl FilteringServices {
    pub async fn new(
        config: &Config,
        config_path: &Path,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let filtering = &config.filtering;

        let directory = FilterDirectory::new(&filtering.data_dir);
        directory.ensure_exists().await?;
        let stale = directory.remove_stale_temp_files().await;
        if stale > 0 {
            info!(removed = stale, "Removed interrupted downloads");
        }

        let content: Arc<dyn FilterContentStore> =
            Arc::new(DiskFilterContentStore::new(directory.clone()));
        let fetcher: Arc<dyn FilterFetcher> = Arc::new(HttpFilterFetcher::new(
            directory,
            Duration::from_secs(filtering.fetch_timeout_secs),
        )?);
        let repository: Arc<dyn FilterListRepository> =
            Arc::new(TomlFilterListRepository::new(config_path));
        let engine = Arc::new(InMemoryServingEngine::new());

        let settings = Arc::new(FilteringSettings::from_config(filtering));
        let store = Arc::new(FilterStore::from_config(content.clone(), filtering));
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
            .with_fetch_concurrency(filtering.fetch_concurrency)
            .with_cancellation(shutdown),
        );

        let use_cases = UseCases::new(
            &store,
            &fetcher,
            &content,
            &repository,
            &activator,
            &refresh,
            &settings,
        );

        info!("Filtering services initialized");

        Ok(Self {
            settings,
            store,
            engine,
            activator,
            refresh,
            repository,
            use_cases,
        })
    }

    /// Write the current lists to the config file.
    pub async fn persist(&self) {
        let snapshot = self.store.snapshot().await;
        if let Err(e) = self.repository.save(&snapshot).await {
            error!(error = %e, "Couldn't save filter lists");
        }
    }
}
