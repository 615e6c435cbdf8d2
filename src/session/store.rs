//! 会话状态机：刷新合并、失败即匿名、订阅通知。
//!
//! Auth session state machine.
//!
//! ```text
//!            refresh()                 ok
//!   Loading ───────────► /users/me ──────────► Authenticated(user)
//!      ▲                     │ any error
//!      │ refresh()           ▼
//!      └──────────────── Anonymous ◄────────── logout()
//! ```
//!
//! Only one `/users/me` round trip is in flight at a time: concurrent callers
//! share the pending outcome, and the slot is cleared when it settles. The
//! round trip runs as its own task, so it settles even if every caller stops
//! waiting. Every failure, not only `auth`, collapses to `Anonymous` so the
//! store never stalls in `Loading`.

use crate::client::{ApiClient, RequestOptions};
use crate::error::AppError;
use crate::error_code;
use crate::types::{LoginRequest, User};
use crate::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

pub const ME_PATH: &str = "/users/me";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// The client's belief about the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Loading,
    Authenticated(User),
    Anonymous,
}

impl Session {
    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Session::Loading => "loading",
            Session::Authenticated(_) => "authenticated",
            Session::Anonymous => "anonymous",
        }
    }
}

pub type SubscriptionId = u64;

type Callback = Arc<dyn Fn(&Session) + Send + Sync>;
type RefreshFuture = Shared<BoxFuture<'static, std::result::Result<User, AppError>>>;

struct Core {
    session: Session,
    inflight: Option<RefreshFuture>,
    /// Bumped by logout/reset; a refresh settling under an older epoch is discarded.
    epoch: u64,
    /// Bumped on every committed transition.
    version: u64,
}

impl Core {
    fn commit(&mut self, next: Session) -> u64 {
        debug!(from = self.session.label(), to = next.label(), "session transition");
        self.session = next;
        self.version += 1;
        self.version
    }
}

struct Inner {
    client: ApiClient,
    core: Mutex<Core>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
    next_id: AtomicU64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    /// Notify for the transition committed as `version`, unless a later one
    /// has already superseded it.
    fn notify_committed(&self, version: u64, session: &Session) {
        if lock(&self.core).version != version {
            debug!("skipping superseded session notification");
            return;
        }
        self.notify(session);
    }

    /// Run subscribers outside every lock so they may call back into the store.
    fn notify(&self, session: &Session) {
        let callbacks: Vec<Callback> = lock(&self.subscribers)
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb(session);
        }
    }
}

/// Session store shared by the presentation layer.
///
/// Cheap to clone; clones share the same state. Only the store's own
/// operations mutate the session; everything else reads or subscribes.
#[derive(Clone)]
pub struct AuthSessionStore {
    inner: Arc<Inner>,
}

impl AuthSessionStore {
    /// New store in the `Loading` state. Call [`bootstrap`](Self::bootstrap) to resolve it.
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                core: Mutex::new(Core {
                    session: Session::Loading,
                    inflight: None,
                    epoch: 0,
                    version: 0,
                }),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn session(&self) -> Session {
        lock(&self.inner.core).session.clone()
    }

    /// Register a callback invoked synchronously on every committed transition.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.subscribers).push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = lock(&self.inner.subscribers);
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    /// Resolve the initial `Loading` state.
    pub async fn bootstrap(&self) -> Session {
        self.refresh().await
    }

    /// Re-read the current user from the backend.
    ///
    /// Concurrent callers share one round trip, spawned on the current Tokio
    /// runtime. Returns the session after the refresh settles.
    pub async fn refresh(&self) -> Session {
        let _ = self.refresh_user().await;
        self.session()
    }

    async fn refresh_user(&self) -> Result<User> {
        let (pending, entered_loading) = {
            let mut core = lock(&self.inner.core);
            if let Some(pending) = core.inflight.clone() {
                debug!("joining in-flight session refresh");
                (pending, None)
            } else {
                // The task cannot commit before this lock is released.
                let task = tokio::spawn(Self::round_trip(self.inner.clone(), core.epoch));
                let pending = async move {
                    task.await.unwrap_or_else(|e| {
                        Err(error_code::network_error(format!("session refresh aborted: {}", e)))
                    })
                }
                .boxed()
                .shared();
                core.inflight = Some(pending.clone());
                let entered = if core.session.is_loading() {
                    None
                } else {
                    Some(core.commit(Session::Loading))
                };
                (pending, entered)
            }
        };

        if let Some(version) = entered_loading {
            self.inner.notify_committed(version, &Session::Loading);
        }
        pending.await
    }

    async fn round_trip(inner: Arc<Inner>, epoch: u64) -> Result<User> {
        let outcome = inner
            .client
            .fetch::<User>(ME_PATH, RequestOptions::get())
            .await;

        let next = {
            let mut core = lock(&inner.core);
            if core.epoch != epoch {
                debug!("discarding stale session refresh");
                None
            } else {
                core.inflight = None;
                let next = match &outcome {
                    Ok(user) => Session::Authenticated(user.clone()),
                    Err(e) if e.is_auth() => {
                        debug!(code = e.code.as_str(), "no active session");
                        Session::Anonymous
                    }
                    Err(e) => {
                        warn!(
                            kind = e.kind.as_str(),
                            code = e.code.as_str(),
                            "session refresh failed; treating as anonymous"
                        );
                        Session::Anonymous
                    }
                };
                let version = core.commit(next.clone());
                Some((version, next))
            }
        };

        if let Some((version, next)) = next {
            inner.notify_committed(version, &next);
        }
        outcome
    }

    /// Log in, then refresh to obtain the canonical user.
    ///
    /// A rejected login leaves the session untouched. If the follow-up
    /// refresh fails the session ends `Anonymous` and that error is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.inner
            .client
            .post(LOGIN_PATH, &LoginRequest { email, password })
            .await?;
        info!("login accepted");

        // A refresh that started before the login cannot see the new cookie.
        let stale = lock(&self.inner.core).inflight.clone();
        if let Some(stale) = stale {
            let _ = stale.await;
        }
        self.refresh_user().await
    }

    /// Log out. The server call is best-effort; the session always ends `Anonymous`.
    pub async fn logout(&self) {
        if let Err(e) = self
            .inner
            .client
            .request(LOGOUT_PATH, RequestOptions::post())
            .await
        {
            debug!(code = e.code.as_str(), "logout request failed; ignoring");
        }

        let version = {
            let mut core = lock(&self.inner.core);
            core.epoch += 1;
            core.inflight = None;
            core.commit(Session::Anonymous)
        };
        info!("logged out");
        self.inner.notify_committed(version, &Session::Anonymous);
    }

    /// Return to `Loading`, dropping subscribers and any in-flight refresh.
    /// Intended for test isolation; nothing is notified.
    pub fn reset(&self) {
        {
            let mut core = lock(&self.inner.core);
            core.epoch += 1;
            core.version += 1;
            core.inflight = None;
            core.session = Session::Loading;
        }
        lock(&self.inner.subscribers).clear();
    }
}
