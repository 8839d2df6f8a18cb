use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use asxtrade_server::{
    api::app_router,
    build_state,
    config::{BootstrapUser, Config},
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router(password: &str) -> (axum::Router, TempDir) {
    let tmp = tempdir().unwrap();

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();

    let mut secret_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut secret_bytes);

    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        secret_key: Some(BASE64.encode(secret_bytes)),
        session_ttl: Duration::from_secs(600),
        reference_stock: "ANZ".to_string(),
        bootstrap_user: Some(BootstrapUser {
            username: "admin".to_string(),
            password_hash,
        }),
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

fn login_request(username: &str, password: &str, next: Option<&str>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "username": username, "password": password, "next": next }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn login_and_access_protected_route() {
    let password = "super-secret";
    let (app, _tmp) = build_test_router(password).await;

    // No session: redirected to the login page
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/show/portfolio")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let login_response = app
        .clone()
        .oneshot(login_request("admin", password, Some("/show/portfolio")))
        .await
        .unwrap();
    assert_eq!(login_response.status(), StatusCode::OK);
    let cookie = login_response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    let body = to_bytes(login_response.into_body(), usize::MAX).await.unwrap();
    let payload: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["next"], "/show/portfolio");
    let token = payload["accessToken"].as_str().unwrap().to_string();

    // Cookie session
    let session = cookie.split(';').next().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/show/portfolio")
                .header(header::COOKIE, session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Bearer token works for API clients
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/show/portfolio")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_user_cannot_log_in() {
    let (app, _tmp) = build_test_router("super-secret").await;
    let response = app
        .oneshot(login_request("mallory", "super-secret", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_offsite_next() {
    let (app, _tmp) = build_test_router("super-secret").await;
    let response = app
        .oneshot(login_request("admin", "super-secret", Some("https://evil.example/")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let (app, _tmp) = build_test_router("super-secret").await;
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn garbage_tokens_are_treated_as_anonymous() {
    let (app, _tmp) = build_test_router("super-secret").await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
