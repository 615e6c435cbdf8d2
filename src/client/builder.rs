use crate::client::core::ApiClient;
use crate::config::ConfigHandle;
use crate::transport::{HttpTransport, Transport};
use crate::{error_code, Result};
use std::sync::Arc;

/// Builder for [`ApiClient`].
///
/// Keep this surface small: a configuration handle and, optionally, a
/// transport override (primarily for tests).
pub struct ApiClientBuilder {
    config: Option<ConfigHandle>,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            transport: None,
        }
    }

    /// Share an existing configuration handle. Defaults to a handle read from the environment.
    pub fn config(mut self, config: ConfigHandle) -> Self {
        self.config = Some(config);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let config = self
            .config
            .unwrap_or_else(|| ConfigHandle::new(crate::ClientConfig::from_env()));
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new().map_err(|e| {
                error_code::network_error(format!("failed to initialise HTTP transport: {}", e))
            })?),
        };
        Ok(ApiClient { config, transport })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
