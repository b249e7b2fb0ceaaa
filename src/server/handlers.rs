//! HTTP request handlers for the Bookshelf API.
//!
//! # Endpoints
//!
//! - `GET /books` - List every book
//! - `GET /books/isbn/{isbn}` - Book by ISBN
//! - `GET /books/author/{author}` - Books by exact author
//! - `GET /books/title/{title}` - Books whose title contains a fragment
//! - `GET /books/reviews/{isbn}` - Reviews for a book
//! - `POST /books/reviews/{isbn}` - Add a review (authenticated)
//! - `DELETE /books/reviews/{isbn}` - Delete the caller's reviews (authenticated)
//! - `POST /register` - Register a user
//! - `POST /login` - Exchange credentials for a token
//! - `GET /async-books` - List every book after an artificial delay
//! - `GET /fetch-books` - Proxy the upstream book API
//! - `GET /submission` - Static submission message
//! - `GET /health` - Health check

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::catalog::{Book, BookStore, Review, UserStore};
use crate::error::{CatalogError, UpstreamError};
use crate::upstream::BookFeed;

use super::auth::{AuthenticatedUser, TokenAuth};

/// Default delay applied by `GET /async-books`.
pub const DEFAULT_ASYNC_DELAY: Duration = Duration::from_millis(1000);

/// Text returned by `GET /submission`.
pub const SUBMISSION_MESSAGE: &str = "Submit your project GitHub link here.";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<F: BookFeed> {
    /// Book catalog and reviews
    pub books: Arc<BookStore>,

    /// Registered users
    pub users: Arc<UserStore>,

    /// Token issuer used by the login handler
    pub auth: TokenAuth,

    /// Upstream catalog behind `/fetch-books`
    pub feed: Arc<F>,

    /// Artificial latency for `/async-books`
    pub async_delay: Duration,
}

impl<F: BookFeed> AppState<F> {
    /// Create state with the seeded catalog, no users, and the default delay.
    pub fn new(auth: TokenAuth, feed: F) -> Self {
        Self {
            books: Arc::new(BookStore::seeded()),
            users: Arc::new(UserStore::new()),
            auth,
            feed: Arc::new(feed),
            async_delay: DEFAULT_ASYNC_DELAY,
        }
    }

    /// Use the given stores instead of fresh ones.
    pub fn with_stores(mut self, books: Arc<BookStore>, users: Arc<UserStore>) -> Self {
        self.books = books;
        self.users = users;
        self
    }

    /// Set the delay for `/async-books`.
    pub fn with_async_delay(mut self, delay: Duration) -> Self {
        self.async_delay = delay;
        self
    }
}

impl<F: BookFeed> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            books: Arc::clone(&self.books),
            users: Arc::clone(&self.users),
            auth: self.auth.clone(),
            feed: Arc::clone(&self.feed),
            async_delay: self.async_delay,
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of `POST /register` and `POST /login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /books/reviews/{isbn}`.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub review: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// `{ "message": ... }` body used for confirmations and every error.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert CatalogError to HTTP response.
///
/// Client errors are logged at DEBUG, except failed logins which are logged
/// at WARN.
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CatalogError::BookNotFound { .. } => (StatusCode::NOT_FOUND, "Book not found"),
            CatalogError::UserExists { .. } => (StatusCode::BAD_REQUEST, "User already exists"),
            CatalogError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
        };

        match &self {
            CatalogError::InvalidCredentials => {
                warn!(status = status.as_u16(), "Client error: {}", self);
            }
            _ => {
                debug!(status = status.as_u16(), "Client error: {}", self);
            }
        }

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// Every upstream failure collapses to the same 500.
impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        error!(status = status.as_u16(), "Upstream error: {}", self);

        (status, Json(MessageResponse::new("Error fetching books"))).into_response()
    }
}

/// Wrapper for handler errors to implement IntoResponse.
#[derive(Debug)]
pub enum HandlerError {
    Catalog(CatalogError),
    Upstream(UpstreamError),
    /// Request body missing, not JSON, or missing fields
    Body(JsonRejection),
    /// Path segment could not be decoded
    Path(PathRejection),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::Catalog(err) => err.into_response(),
            HandlerError::Upstream(err) => err.into_response(),
            HandlerError::Body(rejection) => {
                let status = rejection.status();
                let message = rejection.body_text();
                debug!(status = status.as_u16(), "Rejected request body: {}", message);
                (status, Json(MessageResponse::new(message))).into_response()
            }
            HandlerError::Path(rejection) => {
                let status = rejection.status();
                let message = rejection.body_text();
                debug!(status = status.as_u16(), "Rejected request path: {}", message);
                (status, Json(MessageResponse::new(message))).into_response()
            }
        }
    }
}

impl From<CatalogError> for HandlerError {
    fn from(err: CatalogError) -> Self {
        HandlerError::Catalog(err)
    }
}

impl From<UpstreamError> for HandlerError {
    fn from(err: UpstreamError) -> Self {
        HandlerError::Upstream(err)
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        HandlerError::Body(rejection)
    }
}

impl From<PathRejection> for HandlerError {
    fn from(rejection: PathRejection) -> Self {
        HandlerError::Path(rejection)
    }
}

// =============================================================================
// Catalog Handlers
// =============================================================================

/// Handle `GET /books`.
pub async fn list_books_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
) -> Json<Vec<Book>> {
    Json(state.books.all().await)
}

/// Handle `GET /books/isbn/{isbn}`.
///
/// # Errors
///
/// - `404 Not Found`: no book with that ISBN
pub async fn book_by_isbn_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Book>, HandlerError> {
    let Path(isbn) = path?;
    Ok(Json(state.books.by_isbn(&isbn).await?))
}

/// Handle `GET /books/author/{author}`.
///
/// Exact match. An unknown author yields `200` with an empty array.
pub async fn books_by_author_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Book>>, HandlerError> {
    let Path(author) = path?;
    Ok(Json(state.books.by_author(&author).await))
}

/// Handle `GET /books/title/{title}`.
///
/// Case-sensitive substring match. No match yields `200` with an empty array.
pub async fn books_by_title_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Book>>, HandlerError> {
    let Path(title) = path?;
    Ok(Json(state.books.by_title(&title).await))
}

/// Handle `GET /books/reviews/{isbn}`.
///
/// # Errors
///
/// - `404 Not Found`: no book with that ISBN
pub async fn book_reviews_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Review>>, HandlerError> {
    let Path(isbn) = path?;
    Ok(Json(state.books.reviews(&isbn).await?))
}

/// Handle `GET /async-books`.
///
/// Same body as `GET /books`, returned after `state.async_delay`. The catalog
/// is read after the delay, so it reflects writes made while waiting.
pub async fn async_books_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
) -> Json<Vec<Book>> {
    tokio::time::sleep(state.async_delay).await;
    Json(state.books.all().await)
}

/// Handle `GET /fetch-books`.
///
/// # Errors
///
/// - `500 Internal Server Error`: any upstream failure, as
///   `{"message":"Error fetching books"}`
pub async fn fetch_books_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
) -> Result<Json<Value>, HandlerError> {
    let books = state.feed.fetch_books().await?;
    debug!(upstream = state.feed.identifier(), "Fetched upstream books");
    Ok(Json(books))
}

/// Handle `GET /submission`.
pub async fn submission_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new(SUBMISSION_MESSAGE))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Account Handlers
// =============================================================================

/// Handle `POST /register`.
///
/// # Errors
///
/// - `400 Bad Request`: username already registered
pub async fn register_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, HandlerError> {
    let Json(body) = payload?;

    state.users.register(&body.username, &body.password).await?;
    info!(username = %body.username, "User registered");

    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// Handle `POST /login`.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown user or wrong password
pub async fn login_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, HandlerError> {
    let Json(body) = payload?;

    state
        .users
        .authenticate(&body.username, &body.password)
        .await?;

    let token = state.auth.issue(&body.username);
    info!(username = %body.username, "User logged in");

    Ok(Json(TokenResponse { token }))
}

// =============================================================================
// Review Handlers (authenticated)
// =============================================================================

/// Handle `POST /books/reviews/{isbn}`.
///
/// Appends a review by the caller. Repeated calls append repeatedly.
///
/// # Errors
///
/// - `404 Not Found`: no book with that ISBN
pub async fn add_review_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    user: AuthenticatedUser,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, HandlerError> {
    let Path(isbn) = path?;
    let Json(body) = payload?;

    state
        .books
        .add_review(&isbn, &user.username, &body.review)
        .await?;

    Ok(Json(MessageResponse::new("Review added")))
}

/// Handle `DELETE /books/reviews/{isbn}`.
///
/// Removes every review by the caller on this book. Succeeds even when the
/// caller had none.
///
/// # Errors
///
/// - `404 Not Found`: no book with that ISBN
pub async fn delete_review_handler<F: BookFeed>(
    State(state): State<AppState<F>>,
    user: AuthenticatedUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, HandlerError> {
    let Path(isbn) = path?;
    let removed = state.books.remove_reviews(&isbn, &user.username).await?;
    debug!(isbn = %isbn, username = %user.username, removed, "Delete review request");

    Ok(Json(MessageResponse::new("Review deleted")))
}

// =============================================================================
// Tests
// =============================================================================
