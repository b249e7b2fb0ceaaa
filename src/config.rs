//! Configuration management for Bookshelf.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `BOOKSHELF_` prefix
//! - Sensible defaults (port 3000, one-second `/async-books` delay)
//!
//! # Environment Variables
//!
//! - `BOOKSHELF_HOST` - Server bind address (default: 0.0.0.0)
//! - `BOOKSHELF_PORT` - Server port (default: 3000)
//! - `BOOKSHELF_TOKEN_SECRET` - HMAC secret for login tokens
//! - `BOOKSHELF_UPSTREAM_URL` - Remote book API for `/fetch-books`
//! - `BOOKSHELF_UPSTREAM_TIMEOUT` - Upstream request timeout in seconds (default: 10)
//! - `BOOKSHELF_ASYNC_DELAY_MS` - Delay for `/async-books` in milliseconds (default: 1000)
//! - `BOOKSHELF_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::upstream::DEFAULT_UPSTREAM_URL;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Secret used when none is configured. Startup warns when it is in effect.
pub const DEFAULT_TOKEN_SECRET: &str = "your_secret_key";

/// Default upstream request timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Default `/async-books` delay in milliseconds.
pub const DEFAULT_ASYNC_DELAY_MS: u64 = 1000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Bookshelf - a book catalog with accounts and reviews.
#[derive(Parser, Debug, Clone)]
#[command(name = "bookshelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Consume the parsed CLI and return the selected subcommand.
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeConfig),

    /// Mint a login token for a username using the shared secret.
    Token(TokenConfig),
}

/// Options for `bookshelf serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "BOOKSHELF_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "BOOKSHELF_PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Shared secret used to sign and verify login tokens.
    #[arg(long, default_value = DEFAULT_TOKEN_SECRET, env = "BOOKSHELF_TOKEN_SECRET")]
    pub token_secret: String,

    // =========================================================================
    // Upstream Configuration
    // =========================================================================
    /// Remote book API proxied by `/fetch-books`.
    #[arg(long, default_value = DEFAULT_UPSTREAM_URL, env = "BOOKSHELF_UPSTREAM_URL")]
    pub upstream_url: String,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS, env = "BOOKSHELF_UPSTREAM_TIMEOUT")]
    pub upstream_timeout: u64,

    // =========================================================================
    // Handler Configuration
    // =========================================================================
    /// Artificial delay for `/async-books`, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_ASYNC_DELAY_MS, env = "BOOKSHELF_ASYNC_DELAY_MS")]
    pub async_delay_ms: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "BOOKSHELF_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_secret.is_empty() {
            return Err(
                "Token secret must not be empty. Set --token-secret or BOOKSHELF_TOKEN_SECRET"
                    .to_string(),
            );
        }

        if self.upstream_url.is_empty() {
            return Err(
                "Upstream URL is required. Set --upstream-url or BOOKSHELF_UPSTREAM_URL"
                    .to_string(),
            );
        }
        url::Url::parse(&self.upstream_url)
            .map_err(|e| format!("Invalid upstream URL '{}': {}", self.upstream_url, e))?;

        if self.upstream_timeout == 0 {
            return Err("upstream_timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the built-in default secret is in effect.
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    pub fn async_delay(&self) -> Duration {
        Duration::from_millis(self.async_delay_ms)
    }
}

/// Output format for `bookshelf token`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenOutputFormat {
    /// Only the token
    #[default]
    Raw,
    /// JSON object with token and claims
    Json,
}

/// Options for `bookshelf token`.
#[derive(Args, Debug, Clone)]
pub struct TokenConfig {
    /// Username to embed in the token.
    pub username: String,

    /// Shared secret; must match the server's.
    #[arg(long, default_value = DEFAULT_TOKEN_SECRET, env = "BOOKSHELF_TOKEN_SECRET")]
    pub token_secret: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = TokenOutputFormat::Raw)]
    pub format: TokenOutputFormat,
}

impl TokenConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.is_empty() {
            return Err("Username must not be empty".to_string());
        }
        if self.token_secret.is_empty() {
            return Err("Token secret must not be empty".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
