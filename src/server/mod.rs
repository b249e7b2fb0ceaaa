//! HTTP server layer for Bookshelf.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │       /books/*   /register   /login   /fetch-books  ...         │
//! │                                                                 │
//! │  ┌─────────────┐  ┌──────────────┐  ┌─────────────────────────┐ │
//! │  │  handlers   │  │     auth     │  │         routes          │ │
//! │  │ (requests)  │  │ (HMAC token) │  │    (router config)      │ │
//! │  └─────────────┘  └──────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{auth_middleware, AuthError, AuthenticatedUser, TokenAuth, TokenClaims};
pub use handlers::{
    AppState, CredentialsRequest, HandlerError, HealthResponse, MessageResponse, ReviewRequest,
    TokenResponse, DEFAULT_ASYNC_DELAY, SUBMISSION_MESSAGE,
};
pub use routes::{create_router, create_router_with_stores, RouterConfig};
