mod refresh_filters;

pub use refresh_filters::{CollectionRefresh, RefreshFiltersUseCase};
