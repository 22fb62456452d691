use super::content::{scan_reader, ContentSniffer};
use super::directory::{FilterDirectory, TEMP_PREFIX, TEMP_SUFFIX};
use async_trait::async_trait;
use listwarden_application::ports::{FetchOutcome, FetchRequest, FilterFetcher};
use listwarden_domain::{ContentStats, DomainError};
use reqwest::StatusCode;
use std::io::SeekFrom;
use std::time::{Duration, SystemTime};
use tokio::io::{AsyncSeekExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("Listwarden/", env!("CARGO_PKG_VERSION"), " (filter-refresh)");

/// Downloads filter lists into the filter directory.
///
/// The body is streamed into a temporary file next to the content files and
/// only renamed over `<id>.txt` once it passed validation and its checksum
/// differs from the loaded one. A failed download never touches the current
/// content file.
pub struct HttpFilterFetcher {
    client: reqwest::Client,
    directory: FilterDirectory,
}

impl HttpFilterFetcher {
    pub fn new(directory: FilterDirectory, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::FetchFailed(e.to_string()))?;

        Ok(Self::with_client(client, directory))
    }

    pub fn with_client(client: reqwest::Client, directory: FilterDirectory) -> Self {
        Self { client, directory }
    }

    async fn mark_unchanged(&self, request: &FetchRequest) {
        if let Err(e) = self.directory.touch(request.id, SystemTime::now()).await {
            debug!(id = request.id, error = %e, "Could not update modification time");
        }
    }
}

#[async_trait]
impl FilterFetcher for HttpFilterFetcher {
    #[instrument(skip(self, request), fields(id = request.id, url = %request.url))]
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, DomainError> {
        let named = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(self.directory.path())?;
        // Dropping `temp_path` on any early return deletes the file.
        let (file, temp_path) = named.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut response = self
            .client
            .get(request.url.as_ref())
            .send()
            .await
            .map_err(|e| DomainError::FetchFailed(e.to_string()))?;

        if response.status() != StatusCode::OK {
            warn!(status = response.status().as_u16(), "Unexpected HTTP status");
            return Err(DomainError::HttpStatus(response.status().as_u16()));
        }

        let mut sniffer = ContentSniffer::new();
        let mut hasher = crc32fast::Hasher::new();
        let mut total: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| DomainError::FetchFailed(e.to_string()))?
        {
            sniffer.feed(&chunk)?;
            hasher.update(&chunk);
            file.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        sniffer.finish()?;
        file.flush().await?;

        let checksum = hasher.finalize();
        if request.checksum == Some(checksum) {
            debug!(bytes = total, "Filter content unchanged");
            drop(file);
            self.mark_unchanged(request).await;
            return Ok(FetchOutcome::Unchanged);
        }

        file.seek(SeekFrom::Start(0)).await?;
        let scanned = scan_reader(BufReader::new(&mut file)).await?;
        file.sync_all().await?;
        drop(file);

        let target = self.directory.content_path(request.id);
        temp_path
            .persist(&target)
            .map_err(|e| DomainError::IoError(format!("{}: {}", target.display(), e.error)))?;

        info!(
            rules = scanned.rule_count,
            bytes = total,
            "Filter content downloaded"
        );

        Ok(FetchOutcome::Changed(ContentStats {
            rule_count: scanned.rule_count,
            checksum,
            title: scanned.title,
        }))
    }
}
