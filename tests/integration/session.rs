//! Session store against a real socket, including the cookie round trip.

use crate::integration::mock_server::{failure, success, user, MockServerFixture};
use app_api_client::{AuthGuard, AuthSessionStore, GuardOutcome, Session};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_concurrent_refreshes_issue_one_request() {
    let mut fx = MockServerFixture::new().await;
    let me = fx
        .mock_slow_envelope("GET", "/users/me", success(user("u-1")), Duration::from_millis(200), 1)
        .await;

    let store = AuthSessionStore::new(fx.client());
    let (a, b, c) = tokio::join!(store.refresh(), store.refresh(), store.bootstrap());
    assert!(a.is_authenticated());
    assert_eq!(a, b);
    assert_eq!(b, c);
    me.assert_async().await;
}

#[tokio::test]
async fn test_login_sets_cookie_for_follow_up_refresh() {
    let mut fx = MockServerFixture::new().await;
    let login = fx
        .server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"email": "ada@example.com", "password": "pw"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("set-cookie", "sid=abc123; Path=/; HttpOnly")
        .with_body(json!({"success": true, "message": "logged in"}).to_string())
        .create_async()
        .await;
    let me = fx
        .server
        .mock("GET", "/users/me")
        .match_header("cookie", Matcher::Regex("sid=abc123".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success(user("u-9")).to_string())
        .create_async()
        .await;

    let store = AuthSessionStore::new(fx.client());
    let user = store.login("ada@example.com", "pw").await.unwrap();
    assert_eq!(user.id, "u-9");
    assert!(store.session().is_authenticated());
    login.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn test_guard_follows_store() {
    let mut fx = MockServerFixture::new().await;
    let _me = fx
        .mock_envelope("GET", "/users/me", 401, failure("UNAUTHORIZED", "login required"))
        .await;

    let store = AuthSessionStore::new(fx.client());
    let guard = AuthGuard::default();
    assert_eq!(guard.check(&store, Some("/backtests")), GuardOutcome::Loading);

    assert_eq!(store.bootstrap().await, Session::Anonymous);
    assert_eq!(
        guard.check(&store, Some("/backtests")),
        GuardOutcome::Redirect {
            location: "/login?next=%2Fbacktests".into()
        }
    );
    assert_eq!(guard.check(&store, Some("/backtests")), GuardOutcome::Blank);
}

#[tokio::test]
async fn test_logout_with_server_down_still_anonymous() {
    let mut fx = MockServerFixture::new().await;
    let _me = fx
        .mock_envelope("GET", "/users/me", 200, success(user("u-1")))
        .await;
    let _out = fx
        .mock_envelope("POST", "/auth/logout", 503, failure("UNAVAILABLE", "down"))
        .await;

    let store = AuthSessionStore::new(fx.client());
    assert!(store.bootstrap().await.is_authenticated());
    store.logout().await;
    assert_eq!(store.session(), Session::Anonymous);
}
