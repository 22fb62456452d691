use listwarden_application::ports::{FilterContentStore, FilterFetcher, FilterListRepository};
use listwarden_application::services::{FilterActivator, FilterStore, FilteringSettings};
use listwarden_application::use_cases::{
    AddFilterUseCase, GetFiltersUseCase, RefreshFiltersUseCase, RemoveFilterUseCase,
    SetUserRulesUseCase, UpdateFilterUseCase, UpdateFilteringSettingsUseCase,
};
use std::sync::Arc;

pub struct UseCases {
    pub add_filter: Arc<AddFilterUseCase>,
    pub remove_filter: Arc<RemoveFilterUseCase>,
    pub update_filter: Arc<UpdateFilterUseCase>,
    pub set_user_rules: Arc<SetUserRulesUseCase>,
    pub get_filters: Arc<GetFiltersUseCase>,
    pub update_settings: Arc<UpdateFilteringSettingsUseCase>,
}

impl UseCases {
    pub fn new(
        store: &Arc<FilterStore>,
        fetcher: &Arc<dyn FilterFetcher>,
        content: &Arc<dyn FilterContentStore>,
        repository: &Arc<dyn FilterListRepository>,
        activator: &Arc<FilterActivator>,
        refresh: &Arc<RefreshFiltersUseCase>,
        settings: &Arc<FilteringSettings>,
    ) -> Self {
        Self {
            add_filter: Arc::new(AddFilterUseCase::new(
                store.clone(),
                fetcher.clone(),
                content.clone(),
                repository.clone(),
                activator.clone(),
            )),
            remove_filter: Arc::new(RemoveFilterUseCase::new(
                store.clone(),
                content.clone(),
                repository.clone(),
                activator.clone(),
            )),
            update_filter: Arc::new(UpdateFilterUseCase::new(
                store.clone(),
                repository.clone(),
                activator.clone(),
                refresh.clone(),
            )),
            set_user_rules: Arc::new(SetUserRulesUseCase::new(
                store.clone(),
                repository.clone(),
                activator.clone(),
            )),
            get_filters: Arc::new(GetFiltersUseCase::new(store.clone(), settings.clone())),
            update_settings: Arc::new(UpdateFilteringSettingsUseCase::new(
                settings.clone(),
                repository.clone(),
                activator.clone(),
            )),
        }
    }
}
