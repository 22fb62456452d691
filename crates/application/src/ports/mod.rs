mod filter_content_store;
mod filter_fetcher;
mod filter_list_repository;
mod serving_engine;

pub use filter_content_store::{FilterContentStore, LoadedContent};
pub use filter_fetcher::{FetchOutcome, FetchRequest, FilterFetcher};
pub use filter_list_repository::{FilterListRepository, FilterListSnapshot};
pub use serving_engine::{FilterDescriptor, FilterSource, ServingEnginePort};
