pub mod filters;
pub mod refresh;

pub use filters::{
    AddFilterUseCase, FiltersOverview, GetFiltersUseCase, RemoveFilterUseCase,
    SetUserRulesUseCase, UpdateFilterUseCase, UpdateFilteringSettingsUseCase,
};
pub use refresh::{CollectionRefresh, RefreshFiltersUseCase};
