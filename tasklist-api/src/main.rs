//! # Tasklist API Server
//!
//! Per-user task list over HTTP. Every task route requires an RS256 bearer
//! token from the configured issuer; the token's email claim selects the
//! user whose tasks are read or written.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/tasklist \
//! AUTH_ISSUER=https://issuer.example.com/ \
//! AUTH_AUDIENCE=https://tasks.example.com/ \
//! AUTH_IDENTITY_CLAIM=https://tasks.example.com/email \
//! cargo run -p tasklist-api
//! ```

use std::{sync::Arc, time::Duration};

use tasklist_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasklist_shared::{
    auth::{identity::IdentityResolver, jwks::JwksKeyResolver, validator::TokenValidator},
    db::{migrations::run_migrations, pool},
    store::PgStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist_api=debug,tasklist_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Tasklist API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(config.pool_config()).await?;
    run_migrations(&db).await?;

    let resolver = JwksKeyResolver::new(
        &config.auth.jwks_url,
        Duration::from_secs(config.auth.jwks_fetch_timeout_seconds),
    )?
    .with_cache_ttl(Duration::from_secs(config.auth.jwks_cache_ttl_seconds));
    tracing::info!(
        jwks_url = %config.auth.jwks_url,
        cache_ttl_seconds = config.auth.jwks_cache_ttl_seconds,
        "Key resolver configured"
    );

    let validator = TokenValidator::new(Arc::new(resolver), &config.auth.issuer, &config.auth.audience);
    let identity = IdentityResolver::new(&config.auth.identity_claim);

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgStore::new(db.clone())), validator, identity, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool...");
    pool::close_pool(db).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
