//! 类型模块：会话用户与分页载荷等核心数据类型。
//!
//! # Types Module
//!
//! Strongly-typed representations of the payloads the client core itself
//! understands. Business payloads (strategies, backtests, accounts) are
//! decoded by callers through [`ApiClient::fetch`](crate::ApiClient::fetch).
//!
//! | Type | Description |
//! |------|-------------|
//! | [`User`] | The authenticated user returned by `GET /users/me` |
//! | [`LoginRequest`] | Body of `POST /auth/login` |
//! | [`PagedData`] | Paged list payload (`items`, `total`, `page`, `pageSize`) |

pub mod paged;
pub mod user;

pub use paged::PagedData;
pub use user::{LoginRequest, User};
