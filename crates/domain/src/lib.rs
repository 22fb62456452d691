//! Listwarden Domain Layer
pub mod config;
pub mod errors;
pub mod filter;
pub mod filter_status;
pub mod refresh;
pub mod validators;

pub use config::{CliOverrides, Config, ConfigError, FilterEntry, FilteringConfig, LoggingConfig};
pub use errors::DomainError;
pub use filter::{ContentStats, Filter, FilterId, FilterKind, FilterProperties, USER_FILTER_ID};
pub use filter_status::PropertyChange;
pub use refresh::{RefreshFlags, RefreshSummary};
