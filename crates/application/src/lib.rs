//! Listwarden Application Layer
//!
//! Ports to the outside world plus the filter registry, activation bridge,
//! refresh orchestrator and administrative use cases built on top of them.
pub mod ports;
pub mod services;
pub mod use_cases;
