//! In-memory book store.
//!
//! Books are kept in seed order so listings are stable. Lookups are linear
//! scans; the catalog is small and fixed.

use tokio::sync::RwLock;
use tracing::debug;

use super::model::{seed_books, Book, Review};
use crate::error::CatalogError;

/// Ordered collection of books guarded by a single lock.
///
/// Review mutations take the write lock for the whole read-modify-write so
/// concurrent submissions and deletions never lose entries.
///
/// # Example
///
/// ```
/// use bookshelf::catalog::BookStore;
///
/// #[tokio::main]
/// async fn main() {
///     let store = BookStore::seeded();
///
///     store.add_review("12345", "alice", "Great read").await.unwrap();
///     let reviews = store.reviews("12345").await.unwrap();
///     assert_eq!(reviews.len(), 1);
/// }
/// ```
pub struct BookStore {
    books: RwLock<Vec<Book>>,
}

impl BookStore {
    /// Create a store holding the given books, in order.
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// Create a store holding the fixed seed catalog.
    pub fn seeded() -> Self {
        Self::new(seed_books())
    }

    /// Snapshot of every book, in catalog order.
    pub async fn all(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    /// Find a book by exact ISBN.
    pub async fn by_isbn(&self, isbn: &str) -> Result<Book, CatalogError> {
        self.books
            .read()
            .await
            .iter()
            .find(|b| b.isbn == isbn)
            .cloned()
            .ok_or_else(|| not_found(isbn))
    }

    /// All books whose author equals `author` exactly. May be empty.
    pub async fn by_author(&self, author: &str) -> Vec<Book> {
        self.books
            .read()
            .await
            .iter()
            .filter(|b| b.author == author)
            .cloned()
            .collect()
    }

    /// All books whose title contains `fragment` (case-sensitive). May be empty.
    pub async fn by_title(&self, fragment: &str) -> Vec<Book> {
        self.books
            .read()
            .await
            .iter()
            .filter(|b| b.title.contains(fragment))
            .cloned()
            .collect()
    }

    /// Reviews attached to the book with this ISBN.
    pub async fn reviews(&self, isbn: &str) -> Result<Vec<Review>, CatalogError> {
        self.books
            .read()
            .await
            .iter()
            .find(|b| b.isbn == isbn)
            .map(|b| b.reviews.clone())
            .ok_or_else(|| not_found(isbn))
    }

    /// Append a review by `username`.
    ///
    /// Always appends, even if the user already reviewed this book.
    pub async fn add_review(
        &self,
        isbn: &str,
        username: &str,
        text: &str,
    ) -> Result<(), CatalogError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|b| b.isbn == isbn)
            .ok_or_else(|| not_found(isbn))?;

        book.reviews.push(Review::new(username, text));
        debug!(isbn, username, total = book.reviews.len(), "Review added");
        Ok(())
    }

    /// Remove every review by `username` from the book.
    ///
    /// Returns how many were removed; zero is not an error.
    pub async fn remove_reviews(&self, isbn: &str, username: &str) -> Result<usize, CatalogError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|b| b.isbn == isbn)
            .ok_or_else(|| not_found(isbn))?;

        let before = book.reviews.len();
        book.reviews.retain(|r| r.username != username);
        let removed = before - book.reviews.len();

        debug!(isbn, username, removed, "Reviews removed");
        Ok(removed)
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::seeded()
    }
}

fn not_found(isbn: &str) -> CatalogError {
    CatalogError::BookNotFound {
        isbn: isbn.to_string(),
    }
}
