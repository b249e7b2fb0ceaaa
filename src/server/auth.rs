//! Token authentication for the review endpoints.
//!
//! Tokens are stateless: the server keeps no sessions and accepts any token
//! whose HMAC-SHA256 signature verifies against the shared secret.
//!
//! # Token Format
//!
//! ```text
//! claims    = {"username":"alice","iat":1735689600}
//! signature = HMAC-SHA256(secret_key, claims)
//! token     = hex(claims) "." hex(signature)
//! ```
//!
//! Tokens carry no expiry. Anyone holding the secret can mint a token for any
//! username.
//!
//! # Header
//!
//! Clients send the raw token as the whole `Authorization` header value, with
//! no `Bearer ` prefix.
//!
//! # Example
//!
//! ```rust
//! use bookshelf::server::auth::TokenAuth;
//!
//! let auth = TokenAuth::new("my-secret-key");
//! let token = auth.issue("alice");
//!
//! let claims = auth.verify(&token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::MessageResponse;

// =============================================================================
// Types
// =============================================================================

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Authentication error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header, or an empty one
    MissingToken,

    /// Token is not `hex.hex`, or its claims do not decode
    MalformedToken,

    /// Signature does not match the claims
    InvalidSignature,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing authorization token"),
            AuthError::MalformedToken => write!(f, "Malformed token"),
            AuthError::InvalidSignature => write!(f, "Invalid token signature"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Access denied"),
            AuthError::MalformedToken | AuthError::InvalidSignature => {
                (StatusCode::FORBIDDEN, "Invalid token")
            }
        };

        // A bad signature may be a forgery attempt
        match &self {
            AuthError::InvalidSignature => {
                warn!(status = status.as_u16(), "Authentication failed: {}", self);
            }
            _ => {
                debug!(status = status.as_u16(), "Authentication failed: {}", self);
            }
        }

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// Claims carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Identity the token was issued to
    pub username: String,

    /// Issue time (Unix epoch seconds)
    pub iat: u64,
}

// =============================================================================
// Token Issuer / Verifier
// =============================================================================

/// Issues and verifies HMAC-SHA256 signed tokens.
#[derive(Clone)]
pub struct TokenAuth {
    /// Secret key for HMAC computation
    secret_key: Vec<u8>,
}

impl TokenAuth {
    /// Create a new authenticator with the given secret key.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
        }
    }

    /// Issue a token for `username`, stamped with the current time.
    pub fn issue(&self, username: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.issue_at(username, now)
    }

    /// Issue a token with an explicit issue time.
    ///
    /// Deterministic for a given secret, username and `iat`.
    pub fn issue_at(&self, username: &str, iat: u64) -> String {
        let claims = TokenClaims {
            username: username.to_string(),
            iat,
        };
        self.encode(&claims)
    }

    /// Sign arbitrary claims.
    pub fn encode(&self, claims: &TokenClaims) -> String {
        // Serializing a struct of a String and a u64 cannot fail
        let payload = serde_json::to_vec(claims).unwrap_or_default();
        let signature = self.compute_signature(&payload);

        format!("{}.{}", hex::encode(&payload), hex::encode(signature))
    }

    /// Verify a token and return its claims.
    ///
    /// The signature is checked before the claims are parsed, and compared in
    /// constant time.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (payload_hex, signature_hex) =
            token.split_once('.').ok_or(AuthError::MalformedToken)?;

        if signature_hex.contains('.') {
            return Err(AuthError::MalformedToken);
        }

        let payload = hex::decode(payload_hex).map_err(|_| AuthError::MalformedToken)?;
        let provided_sig = hex::decode(signature_hex).map_err(|_| AuthError::MalformedToken)?;

        let expected_sig = self.compute_signature(&payload);
        if !bool::from(provided_sig.ct_eq(&expected_sig)) {
            return Err(AuthError::InvalidSignature);
        }

        serde_json::from_slice(&payload).map_err(|_| AuthError::MalformedToken)
    }

    /// Compute the raw HMAC-SHA256 over `payload`.
    fn compute_signature(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Identity of the caller, attached to the request by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Axum middleware gating a route behind a valid token.
///
/// Reads the raw `Authorization` header, verifies it, and stores the
/// [`AuthenticatedUser`] in the request extensions before calling the handler.
///
/// - absent or empty header: `401 {"message":"Access denied"}`
/// - anything that fails verification: `403 {"message":"Invalid token"}`
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::post};
/// use bookshelf::server::auth::{TokenAuth, auth_middleware};
///
/// let auth = TokenAuth::new("secret-key");
/// let app = Router::new()
///     .route("/books/reviews/{isbn}", post(add_review_handler))
///     .layer(middleware::from_fn_with_state(auth, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(auth): State<TokenAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = match request.headers().get(AUTHORIZATION) {
        None => return Err(AuthError::MissingToken),
        Some(value) => value.to_str().map_err(|_| AuthError::MalformedToken)?,
    };

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let claims = auth.verify(token)?;
    debug!(username = %claims.username, "Token accepted");

    request.extensions_mut().insert(AuthenticatedUser {
        username: claims.username,
    });

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

// =============================================================================
// Tests
// =============================================================================
