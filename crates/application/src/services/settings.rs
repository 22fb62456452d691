use arc_swap::ArcSwap;
use listwarden_domain::FilteringConfig;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteringRuntime {
    pub enabled: bool,
    pub update_interval_hours: u32,
}

/// Externally owned settings read by the filter lifecycle.
///
/// Readers never block; writers swap in a new value.
pub struct FilteringSettings {
    current: ArcSwap<FilteringRuntime>,
}

impl FilteringSettings {
    pub fn new(enabled: bool, update_interval_hours: u32) -> Self {
        Self {
            current: ArcSwap::from_pointee(FilteringRuntime {
                enabled,
                update_interval_hours,
            }),
        }
    }

    pub fn from_config(config: &FilteringConfig) -> Self {
        Self::new(config.enabled, config.update_interval_hours)
    }

    pub fn snapshot(&self) -> FilteringRuntime {
        **self.current.load()
    }

    pub fn filtering_enabled(&self) -> bool {
        self.current.load().enabled
    }

    pub fn update_interval_hours(&self) -> u32 {
        self.current.load().update_interval_hours
    }

    pub fn set_filtering_enabled(&self, enabled: bool) {
        self.current.rcu(|cur| {
            Arc::new(FilteringRuntime {
                enabled,
                ..**cur
            })
        });
    }

    pub fn set_update_interval_hours(&self, hours: u32) {
        self.current.rcu(|cur| {
            Arc::new(FilteringRuntime {
                update_interval_hours: hours,
                ..**cur
            })
        });
    }
}
