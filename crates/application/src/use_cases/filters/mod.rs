mod add_filter;
mod get_filters;
mod remove_filter;
mod set_user_rules;
mod update_filter;
mod update_settings;

pub use add_filter::AddFilterUseCase;
pub use get_filters::{FiltersOverview, GetFiltersUseCase};
pub use remove_filter::RemoveFilterUseCase;
pub use set_user_rules::SetUserRulesUseCase;
pub use update_filter::UpdateFilterUseCase;
pub use update_settings::UpdateFilteringSettingsUseCase;

use crate::ports::FilterListRepository;
use crate::services::FilterStore;
use tracing::error;

/// Write the current filter lists through `repository`.
///
/// The in-memory edit already happened; a failed save is logged and the next
/// successful save catches up.
async fn persist(store: &FilterStore, repository: &dyn FilterListRepository) {
    let snapshot = store.snapshot().await;
    if let Err(e) = repository.save(&snapshot).await {
        error!(error = %e, "Couldn't save filter lists");
    }
}
