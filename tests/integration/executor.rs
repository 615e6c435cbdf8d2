//! Request executor against a real socket.

use crate::integration::mock_server::{failure, success, MockServerFixture};
use app_api_client::error_code::{HTTP_ERROR, NETWORK_ERROR, TIMEOUT};
use app_api_client::{ApiClient, ConfigHandle, ErrorKind, PagedData, RequestOptions};
use mockito::Matcher;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn test_success_envelope_round_trip() {
    let mut fx = MockServerFixture::new().await;
    let mock = fx
        .server
        .mock("GET", "/users/123")
        .match_header("accept", "application/json")
        .match_header("x-request-id", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success(json!({"userId": "123"})).to_string())
        .create_async()
        .await;

    let data = fx.client().get("/users/123").await.unwrap();
    assert_eq!(data, Some(json!({"userId": "123"})));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_envelope_404() {
    let mut fx = MockServerFixture::new().await;
    let _m = fx
        .server
        .mock("GET", "/users/404")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_header("x-request-id", "srv-abc")
        .with_body(failure("USER_NOT_FOUND", "not found").to_string())
        .create_async()
        .await;

    let err = fx.client().get("/users/404").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.code, "USER_NOT_FOUND");
    assert_eq!(err.message, "not found");
    assert_eq!(err.http_status, Some(404));
    assert_eq!(err.request_id.as_deref(), Some("srv-abc"));
}

#[tokio::test]
async fn test_status_classification() {
    let mut fx = MockServerFixture::new().await;
    let cases = [
        (401, ErrorKind::Auth),
        (403, ErrorKind::Auth),
        (409, ErrorKind::Conflict),
        (410, ErrorKind::NotFound),
        (422, ErrorKind::Validation),
        (500, ErrorKind::Server),
        (429, ErrorKind::Unknown),
    ];
    for (status, kind) in cases {
        let path = format!("/status/{}", status);
        let _m = fx
            .mock_envelope("GET", &path, status, failure("E", "failed"))
            .await;
        let err = fx.client().get(&path).await.unwrap_err();
        assert_eq!(err.kind, kind, "status {}", status);
    }
}

#[tokio::test]
async fn test_204_without_body_is_none() {
    let mut fx = MockServerFixture::new().await;
    let _m = fx
        .server
        .mock("DELETE", "/strategies/9")
        .with_status(204)
        .create_async()
        .await;

    let out = fx.client().delete("/strategies/9").await.unwrap();
    assert_eq!(out, None);
}

#[tokio::test]
async fn test_non_json_failure_is_unknown() {
    let mut fx = MockServerFixture::new().await;
    let _m = fx
        .server
        .mock("GET", "/gateway")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let err = fx.client().get("/gateway").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unknown);
    assert_eq!(err.code, HTTP_ERROR);
    assert_eq!(err.http_status, Some(502));
}

#[tokio::test]
async fn test_body_sent_only_when_supplied() {
    let mut fx = MockServerFixture::new().await;
    let post = fx
        .server
        .mock("POST", "/backtests")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"strategyId": "s1", "from": "2024-01-01"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success(json!({"id": "bt-1"})).to_string())
        .create_async()
        .await;
    let get = fx
        .server
        .mock("GET", "/backtests/bt-1")
        .match_header("content-type", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success(json!({"id": "bt-1"})).to_string())
        .create_async()
        .await;

    let client = fx.client();
    client
        .post("/backtests", &json!({"strategyId": "s1", "from": "2024-01-01"}))
        .await
        .unwrap();
    client.get("/backtests/bt-1").await.unwrap();
    post.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn test_paged_payload() {
    let mut fx = MockServerFixture::new().await;
    let _m = fx
        .server
        .mock("GET", Matcher::Regex("^/accounts".into()))
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            success(json!({"items": [{"id": "a3"}], "total": 3, "page": 2, "pageSize": 2})).to_string(),
        )
        .create_async()
        .await;

    let page: PagedData<Value> = fx
        .client()
        .fetch_paged("/accounts", RequestOptions::get().query("page", "2"))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 3);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mut fx = MockServerFixture::new().await;
    let _m = fx
        .mock_slow_envelope("GET", "/slow", success(json!(1)), Duration::from_millis(800), 1)
        .await;

    let err = fx
        .client()
        .request("/slow", RequestOptions::get().timeout(Duration::from_millis(100)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.code, TIMEOUT);
}

#[tokio::test]
async fn test_refused_connection_is_network_error() {
    let config = ConfigHandle::default();
    config.configure("http://127.0.0.1:1", Some(Duration::from_secs(5)));
    let client = ApiClient::new(config).unwrap();

    let err = client.get("/users/me").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.code, NETWORK_ERROR);
    assert!(err.request_id.is_some());
}
