//! Cancellation tokens tagged with the reason they fired.

use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;

/// Why a request was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The executor's own timer expired.
    Timeout,
    /// The caller (or environment teardown) cancelled the request.
    CallerCancelled,
}

/// A cancellation token that remembers the first reason it was cancelled with.
///
/// Clones share state. [`CancelToken::child`] derives a token that is
/// cancelled together with its parent but records its own reason, so one
/// request timing out never marks sibling requests as timed out.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
    parent: Option<Arc<OnceLock<CancelReason>>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            reason: Arc::new(OnceLock::new()),
            parent: Some(self.reason.clone()),
        }
    }

    /// Cancel on behalf of the caller.
    pub fn cancel(&self) {
        self.cancel_with(CancelReason::CallerCancelled);
    }

    pub(crate) fn expire(&self) {
        self.cancel_with(CancelReason::Timeout);
    }

    fn cancel_with(&self, reason: CancelReason) {
        // First reason wins.
        let _ = self.reason.set(reason);
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reason recorded on this token, else the parent's; `None` if not cancelled.
    pub fn reason(&self) -> Option<CancelReason> {
        if !self.token.is_cancelled() {
            return None;
        }
        self.reason
            .get()
            .or_else(|| self.parent.as_ref().and_then(|p| p.get()))
            .copied()
            .or(Some(CancelReason::CallerCancelled))
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
