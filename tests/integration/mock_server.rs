//! Mock HTTP server setup for integration tests

use app_api_client::{ApiClient, ConfigHandle};
use mockito::{Mock, Server, ServerGuard};
use serde_json::Value;
use std::io::Write;
use std::time::Duration;

/// Test fixture that owns a mock server and a client pointed at it.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub config: ConfigHandle,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let config = ConfigHandle::default();
        // Trailing slash on purpose: configure must normalize it away.
        config.configure(&format!("{}/", server.url()), Some(Duration::from_secs(5)));
        Self { server, config }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.config.clone()).expect("client")
    }

    /// Mock a JSON envelope response.
    pub async fn mock_envelope(&mut self, method: &str, path: &str, status: usize, body: Value) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Mock a JSON envelope response whose body is held back for `delay`.
    pub async fn mock_slow_envelope(
        &mut self,
        method: &str,
        path: &str,
        body: Value,
        delay: Duration,
        expect: usize,
    ) -> Mock {
        let body = body.to_string();
        self.server
            .mock(method, path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(move |w| {
                std::thread::sleep(delay);
                w.write_all(body.as_bytes())
            })
            .expect(expect)
            .create_async()
            .await
    }
}

pub fn success(data: Value) -> Value {
    serde_json::json!({"success": true, "message": "ok", "data": data})
}

pub fn failure(code: &str, message: &str) -> Value {
    serde_json::json!({"success": false, "error": {"code": code, "message": message}})
}

pub fn user(id: &str) -> Value {
    serde_json::json!({
        "id": id,
        "email": "ada@example.com",
        "displayName": "Ada",
        "isActive": true,
        "emailVerified": true,
        "role": "user",
        "level": 1
    })
}
