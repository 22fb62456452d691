use serde::{Deserialize, Serialize};

use crate::filter::{Filter, FilterId, FilterKind};

/// One persisted filter subscription.
///
/// Field ordering mirrors the serialized layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterEntry {
    #[serde(default)]
    pub id: FilterId,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub url: String,
    #[serde(default)]
    pub name: String,
}

impl FilterEntry {
    pub fn into_filter(self, kind: FilterKind) -> Filter {
        Filter::new(
            self.id,
            self.url.as_str().into(),
            self.name.as_str().into(),
            self.enabled,
            kind,
        )
    }
}

impl From<&Filter> for FilterEntry {
    fn from(f: &Filter) -> Self {
        Self {
            id: f.id,
            enabled: f.enabled,
            url: f.url.to_string(),
            name: f.name.to_string(),
        }
    }
}

/// Filter-list lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilteringConfig {
    /// Global filtering switch; when off an empty filter set is activated
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory holding `filters/<id>.txt` content files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Hours between refreshes of a single filter (0 disables periodic refresh)
    #[serde(default = "default_update_interval_hours")]
    pub update_interval_hours: u32,

    /// Per-request timeout for filter downloads
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of filters downloaded at once
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Administrator's custom rules, one per line
    #[serde(default)]
    pub user_rules: Vec<String>,

    /// Block-list subscriptions (seeded with defaults on first run)
    #[serde(default = "default_filters")]
    pub filters: Vec<FilterEntry>,

    /// Allow-list subscriptions
    #[serde(default)]
    pub whitelist_filters: Vec<FilterEntry>,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            data_dir: default_data_dir(),
            update_interval_hours: default_update_interval_hours(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fetch_concurrency: default_fetch_concurrency(),
            user_rules: vec![],
            filters: default_filters(),
            whitelist_filters: vec![],
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_update_interval_hours() -> u32 {
    24
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_fetch_concurrency() -> usize {
    4
}

/// Block-lists installed on first run.
pub fn default_filters() -> Vec<FilterEntry> {
    let entry = |id: FilterId, enabled: bool, url: &str, name: &str| FilterEntry {
        id,
        enabled,
        url: url.to_string(),
        name: name.to_string(),
    };

    vec![
        entry(
            1,
            true,
            "https://adguardteam.github.io/AdGuardSDNSFilter/Filters/filter.txt",
            "AdGuard DNS filter",
        ),
        entry(2, false, "https://adaway.org/hosts.txt", "AdAway Default Blocklist"),
        entry(
            3,
            false,
            "https://someonewhocares.org/hosts/zero/hosts",
            "Dan Pollock's List",
        ),
        entry(
            4,
            false,
            "https://raw.githubusercontent.com/StevenBlack/hosts/master/hosts",
            "Steven Black's Unified Hosts",
        ),
    ]
}
