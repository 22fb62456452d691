mod activation;
mod filter_store;
mod settings;

pub use activation::FilterActivator;
pub use filter_store::{FetchResult, FilterStore};
pub use settings::{FilteringRuntime, FilteringSettings};
