#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Access guard behavior through the real router.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use medassist_test_utils::{cookie_header, session_cookie};

use common::{TestApp, expires_session_cookie, location};

#[tokio::test]
async fn dashboard_without_cookie_redirects_to_login() {
    let app = TestApp::new().await;
    let response = app.get("/dashboard", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn every_protected_prefix_requires_a_session() {
    let app = TestApp::new().await;
    for path in [
        "/services",
        "/equipment/beds",
        "/partners",
        "/pricing",
        "/blog/2026/10",
        "/testimonials",
        "/team",
        "/messages",
        "/appointments",
        "/admins",
    ] {
        let response = app.get(path, None).await;
        assert_eq!(location(&response), Some("/login"), "path {path}");
    }
}

#[tokio::test]
async fn empty_cookie_is_not_a_session() {
    let app = TestApp::new().await;
    let response = app.get("/dashboard", Some("user-session=")).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn login_with_cookie_redirects_to_dashboard() {
    let app = TestApp::new().await;
    let response = app.get("/login", Some(&session_cookie("abc123"))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn root_with_cookie_redirects_to_dashboard() {
    let app = TestApp::new().await;
    let response = app.get("/", Some(&session_cookie("abc123"))).await;
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn root_without_cookie_goes_to_default_locale() {
    let app = TestApp::new().await;
    let response = app.get("/", None).await;
    assert_eq!(location(&response), Some("/fr"));

    let app = TestApp::with_env(&[("DEFAULT_LOCALE", "en")]).await;
    let response = app.get("/", None).await;
    assert_eq!(location(&response), Some("/en"));
}

#[tokio::test]
async fn public_pages_are_allowed_without_cookie() {
    let app = TestApp::new().await;
    for path in ["/login", "/forgot-password", "/en/about", "/en/services", "/ar"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn favicon_bypasses_guard_with_or_without_cookie() {
    let app = TestApp::new().await;
    for cookie in [None, Some("user-session=abc")] {
        let response = app.get("/favicon.ico", cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/x-icon"
        );
    }
}

#[tokio::test]
async fn static_assets_bypass_guard() {
    let app = TestApp::new().await;
    let response = app.get("/static/css/site.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");

    let response = app.get("/static/../Cargo.toml", None).await;
    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_is_never_redirected() {
    let app = TestApp::new().await;
    let response = app.get("/api/appointments", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(location(&response).is_none());
}

#[tokio::test]
async fn segment_matching_leaves_lookalike_paths_neutral() {
    let app = TestApp::new().await;
    let response = app.get("/servicesXYZ", None).await;
    assert_ne!(location(&response), Some("/login"));
}

#[tokio::test]
async fn raw_matching_protects_lookalike_paths() {
    let app = TestApp::with_env(&[("GUARD_PREFIX_MATCH", "raw")]).await;
    let response = app.get("/servicesXYZ", None).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn custom_exclusion_pattern_is_honored() {
    let app = TestApp::with_env(&[("GUARD_EXCLUDE_PATTERN", r"^/(api|static|favicon\.ico|dashboard)")]).await;
    let response = app.get("/dashboard", None).await;
    // Bypassed by the guard; the handler itself then finds no admin.
    assert!(expires_session_cookie(&response));
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn stale_cookie_at_dashboard_is_expired() {
    let app = TestApp::new().await;
    let stale = session_cookie("no-such-session");

    let response = app.get("/dashboard", Some(&stale)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert!(expires_session_cookie(&response));

    // Once the browser drops the cookie, the login page renders.
    let response = app.get("/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_expires_cookie_and_redirects() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, cookie_header(&[("user-session", "whatever")]))
        .body(Body::empty())
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert!(expires_session_cookie(&response));
}
