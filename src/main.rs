//! Bookshelf - a book catalog with accounts and reviews.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::{
    config::{Cli, Command, ServeConfig, TokenConfig, TokenOutputFormat},
    create_router, HttpBookFeed, RouterConfig, TokenAuth,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Token(config) => run_token(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Bookshelf v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Upstream: {} (timeout {}s)", config.upstream_url, config.upstream_timeout);
    info!("  /async-books delay: {}ms", config.async_delay_ms);

    if config.uses_default_secret() {
        warn!("  Token secret: DEFAULT - anyone can mint valid tokens");
        warn!("        Set one for real use: --token-secret=<secret>");
    } else {
        info!("  Token secret: configured");
    }

    let feed = match HttpBookFeed::with_timeout(&config.upstream_url, config.upstream_timeout()) {
        Ok(feed) => feed,
        Err(e) => {
            error!("Failed to create upstream client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let router = create_router(feed, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server running on http://{}", addr);
    info!("  curl http://{}/books", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "bookshelf=debug,tower_http=debug"
    } else {
        "bookshelf=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new(config.token_secret.clone())
        .with_async_delay(config.async_delay())
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

// =============================================================================
// Token Command
// =============================================================================

fn run_token(config: TokenConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let auth = TokenAuth::new(&config.token_secret);
    let token = auth.issue(&config.username);

    match config.format {
        TokenOutputFormat::Raw => {
            println!("{}", token);
        }
        TokenOutputFormat::Json => {
            let claims = match auth.verify(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    eprintln!("Error: freshly issued token failed to verify: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            let json = serde_json::json!({
                "token": token,
                "username": claims.username,
                "iat": claims.iat,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
