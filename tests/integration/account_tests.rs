//! Registration and login integration tests.
//!
//! Tests verify:
//! - Registration succeeds once per username
//! - A duplicate registration is rejected and leaves the stored password alone
//! - Concurrent registrations of one username produce a single account
//! - Login issues a token only for matching credentials
//! - Malformed bodies are answered in the `{message}` envelope

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use bookshelf::{create_router_with_stores, BookStore, TokenAuth, UserStore};

use super::test_utils::{
    json_request, send, test_config, test_router, MockBookFeed, TEST_SECRET,
};

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_success() {
    let router = test_router();

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/register",
            json!({ "username": "alice", "password": "pw" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "User registered successfully" }));
}

#[tokio::test]
async fn test_duplicate_registration_rejected_and_password_kept() {
    let router = test_router();

    let first = json!({ "username": "alice", "password": "original" });
    let second = json!({ "username": "alice", "password": "hijack" });

    let (status, _) = send(&router, json_request(Method::POST, "/register", first.clone(), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, json_request(Method::POST, "/register", second.clone(), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));

    // The original password still works; the rejected one does not
    let (status, _) = send(&router, json_request(Method::POST, "/login", first, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, json_request(Method::POST, "/login", second, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_registration_single_winner() {
    let users = Arc::new(UserStore::new());
    let router = create_router_with_stores(
        MockBookFeed::ok(json!([])),
        Arc::new(BookStore::seeded()),
        Arc::clone(&users),
        test_config(),
    );

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let router = router.clone();
            tokio::spawn(async move {
                let request = json_request(
                    Method::POST,
                    "/register",
                    json!({ "username": "racer", "password": format!("pw{}", i) }),
                    None,
                );
                send(&router, request).await.0
            })
        })
        .collect();

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_REQUEST => conflict += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflict, 31);
    assert_eq!(users.len().await, 1);
}

#[tokio::test]
async fn test_register_missing_field() {
    let router = test_router();

    let (status, body) = send(
        &router,
        json_request(Method::POST, "/register", json!({ "username": "alice" }), None),
    )
    .await;

    assert!(status.is_client_error());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_register_without_json_content_type() {
    let router = test_router();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/register")
        .body(axum::body::Body::from(r#"{"username":"a","password":"b"}"#))
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["message"].is_string());
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_returns_verifiable_token() {
    let router = test_router();
    let credentials = json!({ "username": "alice", "password": "pw" });

    send(&router, json_request(Method::POST, "/register", credentials.clone(), None)).await;

    let (status, body) = send(&router, json_request(Method::POST, "/login", credentials, None)).await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let claims = TokenAuth::new(TEST_SECRET).verify(token).unwrap();
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let router = test_router();

    send(
        &router,
        json_request(
            Method::POST,
            "/register",
            json!({ "username": "alice", "password": "pw" }),
            None,
        ),
    )
    .await;

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/login",
            json!({ "username": "alice", "password": "nope" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid credentials" }));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let router = test_router();

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/login",
            json!({ "username": "ghost", "password": "pw" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}
