//! Integration tests with mock HTTP server

pub mod executor;
pub mod mock_server;
pub mod session;
