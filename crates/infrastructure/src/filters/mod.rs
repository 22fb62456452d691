pub mod content;
pub mod content_store;
pub mod directory;
pub mod fetcher;
pub mod repository;

pub use content_store::DiskFilterContentStore;
pub use directory::FilterDirectory;
pub use fetcher::HttpFilterFetcher;
pub use repository::TomlFilterListRepository;
