//! Listwarden Infrastructure Layer
//!
//! Adapters for the application ports: HTTP download of filter lists, the
//! on-disk content directory, TOML persistence of the filter lists and an
//! in-memory serving engine.
pub mod engine;
pub mod filters;
