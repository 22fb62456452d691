//! Configuration module for Listwarden
//!
//! - `root`: Main configuration and CLI overrides
//! - `filtering`: Filter lists, refresh cadence and fetch limits
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod filtering;
pub mod logging;
pub mod root;

pub use errors::ConfigError;
pub use filtering::{FilterEntry, FilteringConfig};
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
