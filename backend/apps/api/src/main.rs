//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `identity::IdentityError` / `kernel::error::AppError`.

use anyhow::{Context, bail};
use axum::{
    Router, http,
    http::{Method, header},
};
use identity::{
    IdentityConfig, IdentityService, InMemoryIdentityStore, PgIdentityRepository, SigningKey,
    identity_router,
};
use platform::clock::Clock;
use platform::clock::SystemClock;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 31113;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,identity=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = identity_config()?;
    tracing::info!(config = ?config, "Identity configuration loaded");

    let signing_key = signing_key()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Store selection: PostgreSQL when DATABASE_URL is set, in-memory otherwise
    let identity = match env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()) {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let repo = Arc::new(PgIdentityRepository::new(pool));
            let service = IdentityService::new(repo.clone(), repo, signing_key, clock, config)?;
            identity_router(Arc::new(service))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");

            let store = Arc::new(InMemoryIdentityStore::new());
            let service = IdentityService::new(store.clone(), store, signing_key, clock, config)?;
            identity_router(Arc::new(service))
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .nest("/api", identity)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = match env::var("API_PORT") {
        Ok(raw) => raw.parse().context("API_PORT must be a port number")?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Identity configuration from the environment, on top of the build profile defaults
fn identity_config() -> anyhow::Result<IdentityConfig> {
    let mut config = if cfg!(debug_assertions) {
        IdentityConfig::development()
    } else {
        IdentityConfig::default()
    };

    if let Ok(raw) = env::var("IDENTITY_TOKEN_TTL_SECS") {
        let secs: u64 = raw
            .parse()
            .context("IDENTITY_TOKEN_TTL_SECS must be a number of seconds")?;
        if secs == 0 {
            bail!("IDENTITY_TOKEN_TTL_SECS must be positive");
        }
        config.token_ttl = Duration::from_secs(secs);
    }

    if let Ok(raw) = env::var("IDENTITY_REQUEST_TIMEOUT_MS") {
        let millis: u64 = raw
            .parse()
            .context("IDENTITY_REQUEST_TIMEOUT_MS must be a number of milliseconds")?;
        config.request_timeout = Duration::from_millis(millis);
    }

    if let Ok(pepper) = env::var("IDENTITY_PASSWORD_PEPPER") {
        if !pepper.is_empty() {
            config.password_pepper = Some(pepper.into_bytes());
        }
    }

    Ok(config)
}

/// Token signing key: base64 secret from the environment, random in debug builds
fn signing_key() -> anyhow::Result<SigningKey> {
    match env::var("IDENTITY_TOKEN_SECRET") {
        Ok(secret) => {
            SigningKey::from_base64(&secret).context("IDENTITY_TOKEN_SECRET is not a usable key")
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("IDENTITY_TOKEN_SECRET not set, using a random key (tokens die with the process)");
            Ok(SigningKey::generate())
        }
        Err(_) => bail!("IDENTITY_TOKEN_SECRET must be set in production"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
