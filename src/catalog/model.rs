use serde::Serialize;

/// A book in the catalog.
///
/// Books are seeded at startup and never created or removed at runtime; only
/// their review list changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Unique key
    pub isbn: String,

    pub title: String,

    pub author: String,

    /// Reviews in submission order
    pub reviews: Vec<Review>,
}

impl Book {
    /// Create a book with no reviews.
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            reviews: Vec::new(),
        }
    }
}

/// A free-text review attributed to a user.
///
/// The text travels as `review` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub username: String,

    #[serde(rename = "review")]
    pub text: String,
}

impl Review {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
        }
    }
}

/// Stored credentials for a registered user.
///
/// Not `Serialize`: passwords never leave the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// The fixed catalog every process starts with.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new("12345", "Book One", "Author One"),
        Book::new("67890", "Book Two", "Author Two"),
    ]
}
