/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
/// use tasklist_api::{app::AppState, config::Config};
/// use tasklist_shared::auth::{identity::IdentityResolver, jwks::JwksKeyResolver, validator::TokenValidator};
/// use tasklist_shared::store::PgStore;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let resolver = JwksKeyResolver::new(&config.auth.jwks_url, Duration::from_secs(10))?;
/// let validator = TokenValidator::new(Arc::new(resolver), &config.auth.issuer, &config.auth.audience);
/// let identity = IdentityResolver::new(&config.auth.identity_claim);
///
/// let state = AppState::new(Arc::new(PgStore::new(pool)), validator, identity, config);
/// let app = tasklist_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::{sync::Arc, time::Duration};
use tasklist_shared::{
    auth::{identity::IdentityResolver, middleware::require_bearer_token, validator::TokenValidator},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Every field is behind an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// User and task storage
    pub store: Arc<dyn Store>,

    /// Bearer token validator
    pub validator: Arc<TokenValidator>,

    /// Claim to user ID resolution
    pub identity: Arc<IdentityResolver>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        store: Arc<dyn Store>,
        validator: TokenValidator,
        identity: IdentityResolver,
        config: Config,
    ) -> Self {
        Self {
            store,
            validator: Arc::new(validator),
            identity: Arc::new(identity),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health              # Health check (public)
/// └── /list                       # Task routes (bearer token required)
///     ├── GET    /
///     ├── POST   /add
///     ├── DELETE /delete/:id
///     ├── PUT    /edit/:id
///     └── PUT    /done/:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Bearer token validation (task routes only)
/// 2. Request deadline (tower-http TimeoutLayer, 408 on expiry)
/// 3. Logging (tower-http TraceLayer)
/// 4. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Task routes; claims are attached by the bearer middleware and turned
    // into a user ID by the CurrentUser extractor
    let task_routes = Router::new()
        .route("/list", get(routes::tasks::list_tasks))
        .route("/list/add", post(routes::tasks::add_task))
        .route("/list/delete/:id", delete(routes::tasks::delete_task))
        .route("/list/edit/:id", put(routes::tasks::edit_task))
        .route("/list/done/:id", put(routes::tasks::toggle_task))
        .layer(middleware::from_fn_with_state(
            state.validator.clone(),
            require_bearer_token,
        ));

    let cors = cors_layer(&state.config.api.cors_origins);
    let timeout = Duration::from_secs(state.config.api.request_timeout_seconds);

    Router::new()
        .merge(health_routes)
        .merge(task_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS policy from the configured origin list
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
