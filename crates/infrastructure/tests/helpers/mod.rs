pub mod list_server;

pub use list_server::MockListServer;
