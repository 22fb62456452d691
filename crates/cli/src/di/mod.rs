pub mod filtering;
pub mod use_cases;

pub use filtering::FilteringServices;
pub use use_cases::UseCases;
