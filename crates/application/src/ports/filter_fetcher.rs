use async_trait::async_trait;
use listwarden_domain::{ContentStats, DomainError, FilterId};
use std::sync::Arc;

/// The minimal copy of a filter needed to re-fetch it without holding the
/// store lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: FilterId,
    pub url: Arc<str>,
    pub name: Arc<str>,
    /// Checksum of the content currently on disk. `None` when there is no
    /// content for this URL yet, in which case any valid body is promoted.
    pub checksum: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New content was promoted to the filter's content path.
    Changed(ContentStats),
    /// Byte-identical to the current content; only the file timestamp moved.
    Unchanged,
}

impl FetchOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, FetchOutcome::Changed(_))
    }
}

/// Download, validate and persist one filter's content.
///
/// Implementations must never leave partially written data at the filter's
/// content path: new content is written aside and renamed over the old file
/// only after the whole body was received and validated. On error the old
/// file and metadata are untouched.
#[async_trait]
pub trait FilterFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, DomainError>;
}
