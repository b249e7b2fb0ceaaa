use thiserror::Error;

/// Errors raised by the in-memory catalog stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No book carries the requested ISBN
    #[error("Book not found: {isbn}")]
    BookNotFound { isbn: String },

    /// Registration attempted with a username that is already taken
    #[error("User already exists: {username}")]
    UserExists { username: String },

    /// Login attempted with an unknown username or a wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Errors that can occur when fetching books from the upstream API
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure before a response arrived
    #[error("Request error: {0}")]
    Request(String),

    /// Upstream answered with a non-success status code
    #[error("Upstream returned status {status}")]
    Status { status: u16 },

    /// Response body was not valid JSON
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status {
                status: status.as_u16(),
            }
        } else {
            UpstreamError::Request(err.to_string())
        }
    }
}
