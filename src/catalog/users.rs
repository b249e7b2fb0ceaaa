//! In-memory user store.

use tokio::sync::RwLock;
use tracing::debug;

use super::model::User;
use crate::error::CatalogError;

/// Registered users in registration order.
///
/// Registration checks for an existing username and inserts under one write
/// lock, so concurrent registrations of the same name yield exactly one
/// success.
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }

    /// Register a new user.
    ///
    /// Fails with [`CatalogError::UserExists`] if the username is taken; the
    /// existing record is left untouched.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), CatalogError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(CatalogError::UserExists {
                username: username.to_string(),
            });
        }

        users.push(User {
            username: username.to_string(),
            password: password.to_string(),
        });
        debug!(username, total = users.len(), "User registered");
        Ok(())
    }

    /// Check a username/password pair against stored credentials.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), CatalogError> {
        let users = self.users.read().await;
        if users
            .iter()
            .any(|u| u.username == username && u.password == password)
        {
            Ok(())
        } else {
            Err(CatalogError::InvalidCredentials)
        }
    }

    // Inspection helpers for callers that share the store with a router
    // built by `create_router_with_stores`.

    /// Whether a user with this name is registered.
    pub async fn contains(&self, username: &str) -> bool {
        self.users.read().await.iter().any(|u| u.username == username)
    }

    /// Number of registered users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether no user has registered yet.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
