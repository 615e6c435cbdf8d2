//! Integration tests against a local mock HTTP server.

mod integration;
