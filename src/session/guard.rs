use super::store::{AuthSessionStore, Session};
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// What a protected view should do for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show the loading indicator; children stay suspended.
    Loading,
    /// Navigate to the login page. Issued once per anonymous episode.
    Redirect { location: String },
    /// Render the protected children.
    Render,
    /// Render nothing (a redirect is already under way).
    Blank,
}

/// Gate for protected views. Never issues network calls of its own.
#[derive(Debug)]
pub struct AuthGuard {
    login_path: String,
    redirected: AtomicBool,
}

impl AuthGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            redirected: AtomicBool::new(false),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide for `session`. `next` is the path to return to after login.
    pub fn evaluate(&self, session: &Session, next: Option<&str>) -> GuardOutcome {
        match session {
            Session::Loading => GuardOutcome::Loading,
            Session::Authenticated(_) => {
                self.redirected.store(false, Ordering::Relaxed);
                GuardOutcome::Render
            }
            Session::Anonymous => {
                if self.redirected.swap(true, Ordering::Relaxed) {
                    GuardOutcome::Blank
                } else {
                    GuardOutcome::Redirect {
                        location: login_redirect(&self.login_path, next),
                    }
                }
            }
        }
    }

    pub fn check(&self, store: &AuthSessionStore, next: Option<&str>) -> GuardOutcome {
        self.evaluate(&store.session(), next)
    }
}

impl Default for AuthGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

/// Accept only same-origin relative paths.
///
/// The candidate must start with a single `/`. `//host` and `/\host` are
/// protocol-relative to browsers and are rejected.
pub fn sanitize_next(candidate: &str) -> Option<&str> {
    if !candidate.starts_with('/') || candidate.starts_with("//") || candidate.starts_with("/\\") {
        return None;
    }
    Some(candidate)
}

/// Login location, carrying `next` only when it survives [`sanitize_next`].
pub fn login_redirect(login_path: &str, next: Option<&str>) -> String {
    match next.and_then(sanitize_next) {
        Some(next) => {
            let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
            let sep = if login_path.contains('?') { '&' } else { '?' };
            format!("{}{}next={}", login_path, sep, encoded)
        }
        None => login_path.to_string(),
    }
}
