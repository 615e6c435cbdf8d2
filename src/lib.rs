//! # app-api-client
//!
//! 单页应用与后端之间的 HTTP 通信核心：统一信封协议、标准化错误与会话状态机。
//!
//! Client core mediating all communication between an application and its
//! backend over HTTP, plus the session state machine built on it.
//!
//! ## Overview
//!
//! - **Envelope protocol**: every response body is
//!   `{"success": true, "message", "data"?}` or
//!   `{"success": false, "error": {"code", "message"}}`; see [`envelope`].
//! - **Normalized errors**: every failure is an [`AppError`] whose
//!   [`ErrorKind`] is derived from the HTTP status, never from backend codes.
//! - **Request lifecycle**: timeouts, caller cancellation and network
//!   failures are told apart ([`error_code::TIMEOUT`],
//!   [`error_code::CANCELLED`], [`error_code::NETWORK_ERROR`]).
//! - **Session**: [`AuthSessionStore`] coalesces concurrent refreshes and
//!   fails closed to `Anonymous`; [`AuthGuard`] gates protected views.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use app_api_client::{ApiClient, AuthSessionStore, ConfigHandle, Session};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> app_api_client::Result<()> {
//!     let config = ConfigHandle::default();
//!     config.configure("https://api.example.com/v1/", Some(Duration::from_secs(10)));
//!
//!     let client = ApiClient::new(config)?;
//!     let store = AuthSessionStore::new(client.clone());
//!     store.subscribe(|session| println!("session: {:?}", session));
//!
//!     if let Session::Anonymous = store.bootstrap().await {
//!         store.login("ada@example.com", "secret").await?;
//!     }
//!
//!     let strategies = client.get("/strategies").await?;
//!     println!("{:?}", strategies);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Base URL / timeout snapshot behind a swappable handle |
//! | [`error_code`] | Status → kind mapping and canonical codes |
//! | [`envelope`] | Envelope parsing and unwrapping |
//! | [`transport`] | Transport seam, reqwest transport, cancellation tokens |
//! | [`client`] | Request executor |
//! | [`session`] | Session store and view guard |
//! | [`types`] | `User`, `PagedData` |

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod error_code;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, RequestOptions};
pub use config::{ClientConfig, ConfigHandle};
pub use envelope::{
    is_success_envelope, parse_envelope, unwrap_envelope, unwrap_paged_envelope, Envelope,
    EnvelopeError,
};
pub use error::{AppError, ErrorKind};
pub use error_code::is_auth_error;
pub use session::{AuthGuard, AuthSessionStore, GuardOutcome, Session};
pub use transport::{CancelReason, CancelToken};
pub use types::{PagedData, User};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, AppError>;
