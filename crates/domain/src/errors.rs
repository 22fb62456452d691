use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Filter not found: {0}")]
    FilterNotFound(String),

    #[error("Filter URL already exists: {0}")]
    UrlAlreadyExists(String),

    #[error("Invalid filter URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid filter name: {0}")]
    InvalidFilterName(String),

    #[error("Filters update procedure is already running")]
    RefreshInProgress,

    #[error("Got status code != 200: {0}")]
    HttpStatus(u16),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Data contains non-printable characters")]
    NonPrintableContent,

    #[error("Data is HTML, not plain text")]
    HtmlContent,

    #[error("Couldn't update filter: {0}")]
    UpdateFailed(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::IoError(e.to_string())
    }
}
