//! Process-wide request configuration.
//!
//! [`ConfigHandle`] is the injected context object that replaces an ambient
//! global: every [`ApiClient`](crate::ApiClient) built from the same handle
//! reads the same snapshot, and `configure` swaps the snapshot atomically
//! (last write wins).

use arc_swap::ArcSwap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A configuration snapshot.
///
/// `base_url` never carries surrounding whitespace or a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    /// Build a snapshot from the environment.
    ///
    /// - `APP_API_BASE_URL` (default `http://localhost:8080`)
    /// - `APP_API_TIMEOUT_MS` (default 30000)
    ///
    /// Unparsable or zero timeouts fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("APP_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = lookup("APP_API_TIMEOUT_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        Self::new(&base_url, timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

/// Trim surrounding whitespace, then strip exactly one trailing slash.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
}

/// Shared, swappable configuration snapshot.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    current: Arc<ArcSwap<ClientConfig>>,
}

impl ConfigHandle {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Replace the current snapshot. An omitted timeout falls back to the default.
    pub fn configure(&self, base_url: &str, timeout: Option<Duration>) {
        let next = ClientConfig::new(base_url, timeout);
        tracing::debug!(
            base_url = next.base_url.as_str(),
            timeout_ms = next.timeout.as_millis() as u64,
            "client configuration replaced"
        );
        self.current.store(Arc::new(next));
    }

    pub fn get_config(&self) -> Arc<ClientConfig> {
        self.current.load_full()
    }

    /// Restore the default snapshot. Intended for test isolation.
    pub fn reset(&self) {
        self.current.store(Arc::new(ClientConfig::default()));
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}
