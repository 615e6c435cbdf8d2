//! Session state and view gating built on [`ApiClient`](crate::ApiClient).

pub mod guard;
pub mod store;

pub use guard::{login_redirect, sanitize_next, AuthGuard, GuardOutcome, DEFAULT_LOGIN_PATH};
pub use store::{AuthSessionStore, Session, SubscriptionId};
