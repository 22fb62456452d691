use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type FilterId = i64;

/// The user-rules pseudo-filter always carries this id.
pub const USER_FILTER_ID: FilterId = 0;

/// Which collection a filter lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Blocklist,
    Allowlist,
}

impl FilterKind {
    pub fn is_allowlist(self) -> bool {
        matches!(self, FilterKind::Allowlist)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Blocklist => "blocklist",
            FilterKind::Allowlist => "allowlist",
        }
    }
}

/// Metadata derived from one full read of a filter's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub rule_count: usize,
    pub checksum: u32,
    /// First `! Title:` header found in the content, if any.
    pub title: Option<String>,
}

/// A subscribed block-list or allow-list, or the synthetic user filter.
///
/// `rule_count`, `checksum` and `last_updated` are cached from the content
/// file (or `inline_data` for the user filter) and are only ever set from a
/// content read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub id: FilterId,
    pub url: Arc<str>,
    pub name: Arc<str>,
    pub enabled: bool,
    pub rule_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub checksum: u32,
    pub kind: FilterKind,
    #[serde(skip)]
    pub inline_data: Option<Arc<str>>,
}

impl Filter {
    pub fn new(id: FilterId, url: Arc<str>, name: Arc<str>, enabled: bool, kind: FilterKind) -> Self {
        Self {
            id,
            url,
            name,
            enabled,
            rule_count: 0,
            last_updated: None,
            checksum: 0,
            kind,
            inline_data: None,
        }
    }

    /// Builds the user filter from the administrator's custom rule lines.
    pub fn user(rules: &[String]) -> Self {
        let mut filter = Self::new(
            USER_FILTER_ID,
            Arc::from(""),
            Arc::from("User rules"),
            true,
            FilterKind::Blocklist,
        );
        filter.inline_data = Some(Arc::from(rules.join("\n").as_str()));
        filter
    }

    pub fn is_user_filter(&self) -> bool {
        self.id == USER_FILTER_ID
    }

    /// Name of the content file relative to the filter directory.
    pub fn content_file_name(id: FilterId) -> String {
        format!("{}.txt", id)
    }

    /// Clears cached content metadata; the file itself stays on disk.
    pub fn unload(&mut self) {
        self.rule_count = 0;
        self.checksum = 0;
    }

    /// Forgets everything known about the current content so the next
    /// refresh re-fetches it regardless of expiry.
    pub fn invalidate(&mut self) {
        self.unload();
        self.last_updated = None;
    }

    /// Checksum of the content on disk, if that content is known to belong
    /// to the current URL.
    pub fn known_checksum(&self) -> Option<u32> {
        self.last_updated.map(|_| self.checksum)
    }

    pub fn apply_stats(&mut self, stats: &ContentStats) {
        self.rule_count = stats.rule_count;
        self.checksum = stats.checksum;
    }

    /// Whether the expiry window measured from `last_updated` has passed.
    pub fn is_due(&self, now: DateTime<Utc>, interval_hours: u32) -> bool {
        match self.last_updated {
            None => true,
            Some(updated) => Duration::try_hours(i64::from(interval_hours))
                .and_then(|interval| updated.checked_add_signed(interval))
                .is_some_and(|expires| expires <= now),
        }
    }
}

/// The administrator-editable part of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterProperties {
    pub url: Arc<str>,
    pub name: Arc<str>,
    pub enabled: bool,
}
