use listwarden_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

use super::persist;
use crate::ports::FilterListRepository;
use crate::services::{FilterActivator, FilterStore};

pub struct SetUserRulesUseCase {
    store: Arc<FilterStore>,
    repository: Arc<dyn FilterListRepository>,
    activator: Arc<FilterActivator>,
}

impl SetUserRulesUseCase {
    pub fn new(
        store: Arc<FilterStore>,
        repository: Arc<dyn FilterListRepository>,
        activator: Arc<FilterActivator>,
    ) -> Self {
        Self {
            store,
            repository,
            activator,
        }
    }

    #[instrument(skip(self, rules), fields(count = rules.len()))]
    pub async fn execute(&self, rules: Vec<String>) -> Result<(), DomainError> {
        let rules: Vec<String> = rules
            .into_iter()
            .map(|r| r.trim_end_matches(['\r', '\n']).to_string())
            .collect();
        let count = rules.len();

        self.store.set_user_rules(rules).await;
        persist(&self.store, self.repository.as_ref()).await;
        self.activator.activate(true).await?;

        info!(count, "User rules updated");
        Ok(())
    }
}
