//! Token gate integration tests.
//!
//! Tests verify:
//! - Missing or empty `Authorization` header is 401 `Access denied`
//! - Malformed, forged or tampered tokens are 403 `Invalid token`
//! - Tokens are stateless: any token signed with the secret is accepted
//! - Reading reviews needs no token

use axum::http::{Method, StatusCode};
use serde_json::json;

use bookshelf::TokenAuth;

use super::test_utils::{
    delete, get, json_request, post_review, register_and_login, send, test_router, TEST_SECRET,
};

// =============================================================================
// Missing Token
// =============================================================================

#[tokio::test]
async fn test_post_review_without_token() {
    let router = test_router();

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/books/reviews/12345",
            json!({ "review": "hi" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Access denied" }));
}

#[tokio::test]
async fn test_delete_review_without_token() {
    let router = test_router();

    let (status, body) = send(&router, delete("/books/reviews/12345", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn test_empty_authorization_header_is_missing() {
    let router = test_router();

    let (status, body) = post_review(&router, "12345", "hi", "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn test_gate_runs_before_book_lookup() {
    let router = test_router();

    // Unknown book, but the missing token is reported first
    let (status, _) = send(&router, delete("/books/reviews/00000", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Invalid Token
// =============================================================================

#[tokio::test]
async fn test_garbage_token_rejected() {
    let router = test_router();

    let (status, body) = post_review(&router, "12345", "hi", "not-a-token").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Invalid token" }));
}

#[tokio::test]
async fn test_bearer_prefix_is_not_stripped() {
    let router = test_router();
    let token = register_and_login(&router, "alice", "pw").await;

    let (status, _) = post_review(&router, "12345", "hi", &format!("Bearer {}", token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_altered_signature_rejected() {
    let router = test_router();
    let token = register_and_login(&router, "alice", "pw").await;

    // Flip the last hex digit of the signature
    let mut forged = token.clone();
    let last = forged.pop().unwrap();
    forged.push(if last == '0' { '1' } else { '0' });

    let (status, body) = post_review(&router, "12345", "hi", &forged).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_altered_payload_rejected() {
    let router = test_router();
    let token = register_and_login(&router, "alice", "pw").await;
    let (_, signature) = token.split_once('.').unwrap();

    let payload = hex::encode(br#"{"username":"mallory","iat":0}"#);
    let forged = format!("{}.{}", payload, signature);

    let (status, _) = post_review(&router, "12345", "hi", &forged).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nothing was written under either name
    let (_, reviews) = send(&router, get("/books/reviews/12345")).await;
    assert_eq!(reviews, json!([]));
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let router = test_router();
    let token = TokenAuth::new("some-other-secret").issue("alice");

    let (status, _) = send(&router, delete("/books/reviews/12345", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Valid Token
// =============================================================================

#[tokio::test]
async fn test_login_token_is_accepted() {
    let router = test_router();
    let token = register_and_login(&router, "alice", "pw").await;

    let (status, body) = post_review(&router, "12345", "hi", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Review added" }));
}

#[tokio::test]
async fn test_minted_token_needs_no_session() {
    let router = test_router();

    // Never registered: validity depends only on the signature
    let token = TokenAuth::new(TEST_SECRET).issue("carol");

    let (status, _) = post_review(&router, "67890", "stateless", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, reviews) = send(&router, get("/books/reviews/67890")).await;
    assert_eq!(reviews, json!([{ "username": "carol", "review": "stateless" }]));
}

#[tokio::test]
async fn test_reading_reviews_is_public() {
    let router = test_router();

    let (status, _) = send(&router, get("/books/reviews/12345")).await;
    assert_eq!(status, StatusCode::OK);
}
