pub mod backoff;
pub mod filter_refresh;
pub mod runner;

pub use backoff::RefreshBackoff;
pub use filter_refresh::FilterRefreshJob;
pub use runner::JobRunner;
