//! Catalog data layer.
//!
//! Two in-memory stores back the service. Both live for the lifetime of the
//! process and are shared between handlers through `Arc`.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └───────────┬─────────────────┬───────────┘
//!             │                 │
//!             ▼                 ▼
//! ┌──────────────────┐ ┌──────────────────┐
//! │    BookStore     │ │    UserStore     │
//! │ (books, reviews) │ │  (credentials)   │
//! └──────────────────┘ └──────────────────┘
//! ```

mod books;
mod model;
mod users;

pub use books::BookStore;
pub use model::{seed_books, Book, Review, User};
pub use users::UserStore;
