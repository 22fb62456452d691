use listwarden_domain::{DomainError, Filter, FilterId};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Prefix of in-flight download files inside the filter directory.
pub const TEMP_PREFIX: &str = ".fetch-";
pub const TEMP_SUFFIX: &str = ".tmp";

/// Layout of `<data_dir>/filters`: one `<id>.txt` per filter, an optional
/// `<id>.txt.old` backup, and temporary download files.
#[derive(Debug, Clone)]
pub struct FilterDirectory {
    root: PathBuf,
}

impl FilterDirectory {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join("filters"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn content_path(&self, id: FilterId) -> PathBuf {
        self.root.join(Filter::content_file_name(id))
    }

    pub fn backup_path(&self, id: FilterId) -> PathBuf {
        self.root
            .join(format!("{}.old", Filter::content_file_name(id)))
    }

    pub async fn ensure_exists(&self) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DomainError::IoError(format!("create {}: {}", self.root.display(), e))
        })
    }

    /// Set the modification time of a content file.
    pub async fn touch(&self, id: FilterId, when: SystemTime) -> std::io::Result<()> {
        let path = self.content_path(id);
        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::options().write(true).open(&path)?;
            file.set_modified(when)
        })
        .await
        .map_err(std::io::Error::other)?
    }

    /// Delete download leftovers from an interrupted run.
    pub async fn remove_stale_temp_files(&self) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %self.root.display(), error = %e, "Filter directory not readable");
                return 0;
            }
        };

        let mut removed = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !(name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)) {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(file = %name, error = %e, "Failed to remove stale download"),
            }
        }
        removed
    }
}
