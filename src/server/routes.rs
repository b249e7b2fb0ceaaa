//! Router configuration for Bookshelf.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /books                         GET     - List books (public)
//! /books/isbn/{isbn}             GET     - Book by ISBN (public)
//! /books/author/{author}         GET     - Books by author (public)
//! /books/title/{title}           GET     - Books by title fragment (public)
//! /books/reviews/{isbn}          GET     - Reviews (public)
//! /books/reviews/{isbn}          POST    - Add review (token)
//! /books/reviews/{isbn}          DELETE  - Delete own reviews (token)
//! /register                      POST    - Register (public)
//! /login                         POST    - Login (public)
//! /async-books                   GET     - Delayed listing (public)
//! /fetch-books                   GET     - Upstream proxy (public)
//! /submission                    GET     - Static message (public)
//! /health                        GET     - Health check (public)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bookshelf::server::routes::{create_router, RouterConfig};
//! use bookshelf::upstream::HttpBookFeed;
//!
//! let feed = HttpBookFeed::new("https://api.example.com/books")?;
//! let config = RouterConfig::new("my-secret-key")
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(feed, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, TokenAuth};
use super::handlers::{
    add_review_handler, async_books_handler, book_by_isbn_handler, book_reviews_handler,
    books_by_author_handler, books_by_title_handler, delete_review_handler, fetch_books_handler,
    health_handler, list_books_handler, login_handler, register_handler, submission_handler,
    AppState, DEFAULT_ASYNC_DELAY,
};
use crate::catalog::{BookStore, UserStore};
use crate::upstream::BookFeed;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Shared secret for signing and verifying tokens
    pub token_secret: String,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Delay applied by `/async-books`
    pub async_delay: Duration,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given token secret.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - `/async-books` waits one second
    /// - Tracing is enabled
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            cors_origins: None,
            async_delay: DEFAULT_ASYNC_DELAY,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the delay applied by `/async-books`.
    pub fn with_async_delay(mut self, delay: Duration) -> Self {
        self.async_delay = delay;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router with fresh stores.
///
/// The book store starts from the seed catalog and the user store is empty.
pub fn create_router<F>(feed: F, config: RouterConfig) -> Router
where
    F: BookFeed + 'static,
{
    create_router_with_stores(
        feed,
        Arc::new(BookStore::seeded()),
        Arc::new(UserStore::new()),
        config,
    )
}

/// Create the application router over existing stores.
///
/// Useful when the caller needs to inspect or pre-populate state.
pub fn create_router_with_stores<F>(
    feed: F,
    books: Arc<BookStore>,
    users: Arc<UserStore>,
    config: RouterConfig,
) -> Router
where
    F: BookFeed + 'static,
{
    let auth = TokenAuth::new(&config.token_secret);

    let app_state = AppState::new(auth.clone(), feed)
        .with_stores(books, users)
        .with_async_delay(config.async_delay);

    let cors = build_cors_layer(&config);

    // Only POST and DELETE pass through the token gate; GET on the same path
    // is registered after the route layer and stays public.
    let gate = middleware::from_fn_with_state(auth, auth_middleware);

    let router = Router::new()
        .route("/books", get(list_books_handler::<F>))
        .route("/books/isbn/{isbn}", get(book_by_isbn_handler::<F>))
        .route("/books/author/{author}", get(books_by_author_handler::<F>))
        .route("/books/title/{title}", get(books_by_title_handler::<F>))
        .route(
            "/books/reviews/{isbn}",
            post(add_review_handler::<F>)
                .delete(delete_review_handler::<F>)
                .route_layer(gate)
                .get(book_reviews_handler::<F>),
        )
        .route("/register", post(register_handler::<F>))
        .route("/login", post(login_handler::<F>))
        .route("/async-books", get(async_books_handler::<F>))
        .route("/fetch-books", get(fetch_books_handler::<F>))
        .route("/submission", get(submission_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
