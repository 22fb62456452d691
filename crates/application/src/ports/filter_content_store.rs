use async_trait::async_trait;
use chrono::{DateTime, Utc};
use listwarden_domain::{ContentStats, DomainError, FilterId};
use std::path::PathBuf;

/// Stats read back from a filter's content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedContent {
    pub stats: ContentStats,
    /// Modification time of the file, used as `last_updated`.
    pub modified: Option<DateTime<Utc>>,
}

/// Access to the per-filter content files (`<data-dir>/filters/<id>.txt`).
#[async_trait]
pub trait FilterContentStore: Send + Sync {
    /// Canonical content path for `id`.
    fn content_path(&self, id: FilterId) -> PathBuf;

    /// Read the content file and derive rule count and checksum.
    async fn load(&self, id: FilterId) -> Result<LoadedContent, DomainError>;

    /// Delete the content file. A missing file is not an error.
    async fn remove(&self, id: FilterId) -> Result<(), DomainError>;

    /// Delete the `.old` backup a rename-replace may have left behind.
    async fn remove_backup(&self, id: FilterId);
}
