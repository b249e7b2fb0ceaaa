//! # Bookshelf
//!
//! A small HTTP service exposing a book catalog with user registration,
//! signed-token login and per-user reviews.
//!
//! ## Features
//!
//! - **Catalog queries**: list books, look up by ISBN, search by author or title
//! - **Accounts**: register and log in to receive a stateless HMAC-SHA256 token
//! - **Reviews**: authenticated users add reviews and delete their own
//! - **Upstream proxy**: `/fetch-books` relays a remote book API
//!
//! All data lives in memory for the lifetime of the process.
//!
//! ## Architecture
//!
//! - [`catalog`] - In-memory book and user stores
//! - [`upstream`] - Remote book feed used by `/fetch-books`
//! - [`server`] - Axum handlers, token gate and router
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use bookshelf::{create_router, HttpBookFeed, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let feed = HttpBookFeed::new("https://api.example.com/books").unwrap();
//!     let router = create_router(feed, RouterConfig::new("change-me"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod server;
pub mod upstream;

// Re-export commonly used types
pub use catalog::{seed_books, Book, BookStore, Review, User, UserStore};
pub use config::{Cli, Command, ServeConfig, TokenConfig, TokenOutputFormat};
pub use error::{CatalogError, UpstreamError};
pub use server::{
    auth_middleware, create_router, create_router_with_stores, AppState, AuthError,
    AuthenticatedUser, HandlerError, MessageResponse, RouterConfig, TokenAuth, TokenClaims,
};
pub use upstream::{BookFeed, HttpBookFeed};
