//! Tests for the delayed listing, upstream proxy and static endpoints.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use bookshelf::{create_router, HttpBookFeed, UpstreamError};

use super::test_utils::{get, send, test_config, test_router, MockBookFeed};

// =============================================================================
// /async-books
// =============================================================================

#[tokio::test]
async fn test_async_books_matches_listing() {
    let router = test_router();

    let (_, listing) = send(&router, get("/books")).await;
    let (status, delayed) = send(&router, get("/async-books")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(delayed, listing);
}

#[tokio::test]
async fn test_async_books_waits_for_configured_delay() {
    let router = create_router(
        MockBookFeed::ok(json!([])),
        test_config().with_async_delay(Duration::from_millis(150)),
    );

    let start = Instant::now();
    let (status, _) = send(&router, get("/async-books")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(start.elapsed() >= Duration::from_millis(150));
}

// =============================================================================
// /fetch-books
// =============================================================================

#[tokio::test]
async fn test_fetch_books_relays_upstream_body() {
    let upstream = json!([{ "isbn": "111", "title": "Remote", "author": "Far Away" }]);
    let feed = MockBookFeed::ok(upstream.clone());
    let calls = feed.call_counter();
    let router = create_router(feed, test_config());

    let (status, body) = send(&router, get("/fetch-books")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_books_upstream_failures_are_500() {
    for err in [
        UpstreamError::Request("connection refused".to_string()),
        UpstreamError::Status { status: 503 },
        UpstreamError::Decode("expected value".to_string()),
    ] {
        let router = create_router(MockBookFeed::failing(err), test_config());

        let (status, body) = send(&router, get("/fetch-books")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Error fetching books" }));
    }
}

#[tokio::test]
async fn test_fetch_books_over_http_maps_error_status_to_500() {
    let upstream = axum::Router::new().route(
        "/books",
        axum::routing::get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(json!({ "message": "down" })),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let feed = HttpBookFeed::new(format!("http://{}/books", addr)).unwrap();
    let router = create_router(feed, test_config());

    let (status, body) = send(&router, get("/fetch-books")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error fetching books" }));
}

// =============================================================================
// Static Endpoints
// =============================================================================

#[tokio::test]
async fn test_submission_message() {
    let router = test_router();

    let (status, body) = send(&router, get("/submission")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "Submit your project GitHub link here." })
    );
}

#[tokio::test]
async fn test_health() {
    let router = test_router();

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_404() {
    let router = test_router();

    let (status, _) = send(&router, get("/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsupported_method_on_reviews_is_405() {
    let router = test_router();

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/books/reviews/12345")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
