use super::content::scan_reader;
use super::directory::FilterDirectory;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use listwarden_application::ports::{FilterContentStore, LoadedContent};
use listwarden_domain::{DomainError, FilterId};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{debug, warn};

const READ_BUFFER: usize = 64 * 1024;

pub struct DiskFilterContentStore {
    directory: FilterDirectory,
}

impl DiskFilterContentStore {
    pub fn new(directory: FilterDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &FilterDirectory {
        &self.directory
    }
}

#[async_trait]
impl FilterContentStore for DiskFilterContentStore {
    fn content_path(&self, id: FilterId) -> PathBuf {
        self.directory.content_path(id)
    }

    async fn load(&self, id: FilterId) -> Result<LoadedContent, DomainError> {
        let path = self.directory.content_path(id);
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| DomainError::IoError(format!("{}: {}", path.display(), e)))?;

        let modified = file
            .metadata()
            .await
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let stats = scan_reader(BufReader::with_capacity(READ_BUFFER, file)).await?;
        debug!(id, rules = stats.rule_count, "Filter content loaded");

        Ok(LoadedContent { stats, modified })
    }

    async fn remove(&self, id: FilterId) -> Result<(), DomainError> {
        let path = self.directory.content_path(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::IoError(format!("{}: {}", path.display(), e))),
        }
    }

    async fn remove_backup(&self, id: FilterId) {
        let path = self.directory.backup_path(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(id, "Removed filter backup"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove filter backup"),
        }
    }
}
